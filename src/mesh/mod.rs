//! Polygon solids and the BSP machinery behind their boolean operations.
//!
//! Leaf-first: [`vertex`] → [`polygon`] / [`plane`] → [`bsp`] → [`solid`]
//! (with [`simplify`] run on every boolean result and [`shapes`] for
//! primitives).

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod simplify;
pub mod solid;
pub mod vertex;

pub use solid::Solid;
