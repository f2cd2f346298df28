//! Board layer names used by footprint elements.
//!
//! Layers are plain strings in the record output so downstream importers can
//! map them onto their own layer tables. The constants below are the names
//! the element constructors use as defaults.

/// Front silkscreen.
pub const F_SILKS: &str = "F.SilkS";
/// Front courtyard.
pub const F_CRTYD: &str = "F.CrtYd";
/// Front fabrication drawing.
pub const F_FAB: &str = "F.Fab";
/// Front solder paste.
pub const F_PASTE: &str = "F.Paste";
/// Front solder mask.
pub const F_MASK: &str = "F.Mask";
/// Front copper.
pub const F_CU: &str = "F.Cu";
/// Copper on every layer, used by through-hole pads.
pub const ALL_CU: &str = "*.Cu";
/// Solder mask on both sides, used by through-hole pads.
pub const ALL_MASK: &str = "*.Mask";

/// Default layer set of a surface-mount pad: copper, paste and mask on the front side.
pub fn smd_layers() -> Vec<String> {
    [F_CU, F_PASTE, F_MASK].map(String::from).to_vec()
}

/// Default layer set of a through-hole pad or hole.
pub fn through_hole_layers() -> Vec<String> {
    [ALL_CU, ALL_MASK].map(String::from).to_vec()
}
