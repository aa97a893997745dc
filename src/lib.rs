//! A smoothed-particle-hydrodynamics fluid simulator built around a particle system.
//!
//! A [`System`] owns the particles, the forces acting on them and the SPH fields. Each step,
//! a pluggable [`Solver`] integrates the system's state vector using [`System::deriv_eval`] as
//! the right-hand side, and the result is corrected against the container walls before it is
//! written back.

pub mod collisions;
pub mod constraint;
pub mod draw;
pub mod force;
pub mod initial_condition;
pub mod params;
pub mod particle;
pub mod solver;
pub mod sph;
pub mod statistics;
pub mod system;
pub mod util;

extern crate nalgebra as na;

pub type Scalar = f64;
pub type Vec3 = na::Vector3<Scalar>;
/// The flattened state of every particle, 6 entries per particle.
pub type StateVector = na::DVector<Scalar>;

pub use params::SphParameters;
pub use particle::Particle;
pub use solver::Solver;
pub use system::{StepMode, System};
