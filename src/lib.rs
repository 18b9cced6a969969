//! **Constructive Solid Geometry (CSG)** on polygon solids, built around the
//! Boolean operations *union*, *difference* and *intersection* on sets of
//! convex polygons stored in [BSP](mesh::bsp) trees.
//!
//! A [`Solid`] is a list of planar convex [`Polygon`]s, each carrying an
//! opaque `shared` tag (a material handle, for example) that survives every
//! operation. Solids come in and go out as flat [`TriangleMesh`] buffers, and
//! the [`cleanup`] passes tidy up what the booleans leave behind.
//!
//! ```
//! use meshcsg::{CSGOps, Solid};
//!
//! let a: Solid<()> = Solid::cube(1.0, None);
//! let b = a.translate(0.5, 0.0, 0.0);
//! let union = a.union(&b);
//! assert!((union.volume() - 1.5).abs() < 1e-9);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod cleanup;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use io::TriangleMesh;
pub use mesh::plane::Plane;
pub use mesh::polygon::Polygon;
pub use mesh::solid::Solid;
pub use mesh::vertex::Vertex;
pub use traits::CSGOps;
