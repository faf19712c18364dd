//! Caller-facing subsetting options.
//!
//! Plain data, constructed directly by callers (the PDF generator /
//! rendering pipeline collaborators this crate serves); no `clap`
//! derive here since there's no CLI wrapper parsing these from argv
//! in this crate.

/// Which optional tables/features a subset keeps. The algorithm (closure,
/// renumbering, per-table rewrite) is the same regardless of these flags;
/// they only gate which tables get copied into the output vs. dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubsetFlags {
    /// Keep `fpgm`/`prep`/`cvt `/`hdmx`/`LTSH`/`VDMX`/`gasp` (TrueType
    /// hinting bytecode and its supporting tables). Never executed by this
    /// engine either way; this only controls whether the bytes ship.
    pub retain_hinting: bool,
    /// Keep `GSUB`/`GPOS`/`GDEF`/`BASE`/`JSTF` (OpenType layout).
    pub retain_layout: bool,
    /// Keep the legacy `kern` table.
    pub retain_kerning: bool,
    /// Keep `DSIG` (a signature over the *original* file; almost always
    /// invalid after subsetting, so this defaults to stripped).
    pub retain_dsig: bool,
    /// For CFF fonts, inline every subroutine call instead of keeping a
    /// subsetted Local/Global Subr INDEX. Produces a larger but simpler
    /// `CharStrings` INDEX; off by default since subroutine subsetting
    /// already shrinks the font.
    pub desubroutinize: bool,
}

impl Default for SubsetFlags {
    /// Strips every optional table by default; callers opt back in.
    fn default() -> Self {
        SubsetFlags {
            retain_hinting: false,
            retain_layout: false,
            retain_kerning: false,
            retain_dsig: false,
            desubroutinize: false,
        }
    }
}
