//! Rewriting `hmtx`+`hhea` (and `vmtx`+`vhea`, same shape) together, since
//! `hhea.numberOfLongMetrics` must match the rebuilt `hmtx`'s length.

use font_read::tables::hvhea::HVhea;
use font_read::tables::hvmtx::HVmtx;
use font_write::tables::hhea::HheaTable;
use font_write::tables::hmtx::MtxTable;

use crate::plan::SubsetPlan;

pub struct SubsetMetrics {
    pub mtx: MtxTable,
    pub hhea: HheaTable,
}

pub fn subset_metrics(hvhea: &HVhea<'_>, hvmtx: &HVmtx<'_>, plan: &SubsetPlan) -> SubsetMetrics {
    let mtx = MtxTable::subset(hvmtx, plan.new_to_old());
    let mut hhea = HheaTable::from_parsed(hvhea);
    hhea.number_of_long_metrics = mtx.metrics.len() as u16;
    SubsetMetrics { mtx, hhea }
}
