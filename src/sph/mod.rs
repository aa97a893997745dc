//! The SPH building blocks: smoothing kernels, the neighbor grid and the interpolated fields.

pub mod field;
pub mod grid;
pub mod kernels;

pub use field::{ColorField, DensityField, Field, Fields, Neighborhood, PressureField};
pub use grid::{Grid, NeighborQuery};
