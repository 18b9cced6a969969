#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use std::sync::OnceLock;

/// Smallest normal length accepted when deriving a plane from three points.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-6;
/// Smallest normal length accepted when deriving a plane from three points.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-10;

/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

/// Tolerances used across the crate.
///
/// Each geometric test has its own knob since their roles differ: classifying
/// a vertex against a plane is not the same question as "are these two
/// vertices the same point" or "is this corner straight".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Half-thickness of a plane when classifying vertices in `split_polygon`.
    pub split: Real,
    /// Approximate plane equality, applied to both the offset and `1 - n₀·n₁`.
    pub plane: Real,
    /// Distance under which two polygon vertices are treated as coincident.
    pub weld: Real,
    /// Cross-product magnitude under which a polygon corner is treated as straight.
    pub colinear: Real,
    /// Colinear threshold used by the cleanup graph.
    pub cleanup_colinear: Real,
    /// Per-component threshold used by vertex deduplication.
    pub cleanup_weld: Real,
    /// Position weld used when looking for coincident faces.
    pub internal_face_weld: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            split: 1e-3,
            plane: 1e-3,
            weld: 2.5e-3,
            colinear: 2.5e-3,
            cleanup_colinear: 3.33e-3,
            cleanup_weld: 1e-3,
            internal_face_weld: 1e-2,
        }
    }
}

/// Lazily-initialized tolerances used across the crate.
/// Defaults can be overridden once, at program start, with [`set_tolerances`].
static TOLERANCES_CELL: OnceLock<Tolerances> = OnceLock::new();

/// Returns the active tolerances.
pub fn tolerances() -> &'static Tolerances {
    TOLERANCES_CELL.get_or_init(Tolerances::default)
}

/// Set the tolerances programmatically once (subsequent calls are ignored).
///
/// Returns `false` when the tolerances were already fixed, either by an
/// earlier call or because the library already read them.
pub fn set_tolerances(value: Tolerances) -> bool {
    let accepted = TOLERANCES_CELL.set(value).is_ok();
    if !accepted {
        log::warn!("tolerances already initialized, ignoring {value:?}");
    }
    accepted
}
