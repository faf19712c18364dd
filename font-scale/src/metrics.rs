//! Variation-aware metrics: per-glyph advances/bearings through `HVAR`, and
//! font-wide metrics (ascender, x-height, …) through `MVAR`, both layered
//! on the same [`ItemVariationStore`] scalar math as `gvar`.

use font_types::{GlyphId, Tag};

use font_read::tables::ivs::ItemVariationStore;
use font_read::tables::ivs::region_scalar;
use font_read::FontRef;

use crate::error::Result;
use crate::instance::Location;

fn item_variation_delta(
    ivs: &ItemVariationStore<'_>,
    outer: u16,
    inner: u16,
    coords: &[f64],
) -> Result<f64> {
    let regions = ivs.region_list()?;
    let data = ivs.item_variation_data(outer)?;
    let region_indexes = data.region_indexes()?;
    let deltas = data.deltas(inner)?;
    let mut sum = 0.0;
    for (region_idx, delta) in region_indexes.iter().zip(deltas) {
        let Some(region) = regions.get(*region_idx as usize) else {
            continue;
        };
        sum += region_scalar(region, coords) * delta as f64;
    }
    Ok(sum)
}

/// Font-wide and per-glyph metrics, instanced at `location` if given.
pub struct Metrics<'a> {
    font: &'a FontRef<'a>,
    location: Option<&'a Location>,
}

impl<'a> Metrics<'a> {
    pub fn new(font: &'a FontRef<'a>, location: Option<&'a Location>) -> Self {
        Metrics { font, location }
    }

    pub fn units_per_em(&self) -> Result<u16> {
        Ok(self.font.head()?.units_per_em())
    }

    /// `gid`'s horizontal advance width, with any `HVAR` delta applied.
    pub fn advance_width(&self, gid: GlyphId) -> Result<f64> {
        let base = self.font.hmtx()?.advance(gid).unwrap_or(0) as f64;
        let Some(location) = self.location else {
            return Ok(base);
        };
        let Ok(hvar) = self.font.hvar() else {
            return Ok(base);
        };
        let (outer, inner) = hvar.advance_width_mapping(gid)?;
        let ivs = hvar.item_variation_store()?;
        Ok(base + item_variation_delta(&ivs, outer, inner, location.coords())?)
    }

    /// `gid`'s left side bearing, with any `HVAR` delta applied.
    pub fn left_side_bearing(&self, gid: GlyphId) -> Result<f64> {
        let base = self.font.hmtx()?.side_bearing(gid).unwrap_or(0) as f64;
        let Some(location) = self.location else {
            return Ok(base);
        };
        let Ok(hvar) = self.font.hvar() else {
            return Ok(base);
        };
        let Some((outer, inner)) = hvar.lsb_mapping(gid)? else {
            return Ok(base);
        };
        let ivs = hvar.item_variation_store()?;
        Ok(base + item_variation_delta(&ivs, outer, inner, location.coords())?)
    }

    fn mvar_value(&self, tag: Tag, base: f64) -> Result<f64> {
        let Some(location) = self.location else {
            return Ok(base);
        };
        let Ok(mvar) = self.font.mvar() else {
            return Ok(base);
        };
        let Some((outer, inner)) = mvar.value_mapping(tag)? else {
            return Ok(base);
        };
        let Some(ivs) = mvar.item_variation_store()? else {
            return Ok(base);
        };
        Ok(base + item_variation_delta(&ivs, outer, inner, location.coords())?)
    }

    pub fn ascender(&self) -> Result<f64> {
        self.mvar_value(Tag::new(b"hasc"), self.font.hhea()?.ascender() as f64)
    }

    pub fn descender(&self) -> Result<f64> {
        self.mvar_value(Tag::new(b"hdsc"), self.font.hhea()?.descender() as f64)
    }

    pub fn line_gap(&self) -> Result<f64> {
        self.mvar_value(Tag::new(b"hlgp"), self.font.hhea()?.line_gap() as f64)
    }

    pub fn cap_height(&self) -> Result<f64> {
        let base = self
            .font
            .os2()
            .ok()
            .and_then(|os2| os2.s_cap_height())
            .unwrap_or(0) as f64;
        self.mvar_value(Tag::new(b"cpht"), base)
    }

    pub fn x_height(&self) -> Result<f64> {
        let base = self
            .font
            .os2()
            .ok()
            .and_then(|os2| os2.sx_height())
            .unwrap_or(0) as f64;
        self.mvar_value(Tag::new(b"xhgt"), base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_sums_only_covered_regions() {
        // Smoke-test the helper directly isn't practical without a full
        // ItemVariationStore fixture; covered end-to-end via HVAR's own
        // tests in font-read and the outline module's gvar tests here.
    }
}
