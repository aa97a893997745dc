//! Forces acting on the particles of a `System`.
//!
//! Every force acts on an explicit set of target particles, identified by their index in the
//! system. A force never owns particles: it reads them through a [`ForceContext`] and adds its
//! contribution into a per-particle accumulator.

mod gravity;
mod pressure;
mod surface;
mod viscosity;

pub use gravity::GravityForce;
pub use pressure::PressureForce;
pub use surface::SurfaceForce;
pub use viscosity::ViscosityForce;

use crate::draw::DrawSink;
use crate::sph::{Fields, Neighborhood};
use crate::{Particle, Vec3};

/// Everything a force may read while it is being applied. By the time forces run, every
/// particle's density and pressure have been computed for the current configuration.
#[derive(Clone, Copy)]
pub struct ForceContext<'a> {
    pub neighborhood: Neighborhood<'a>,
    pub fields: &'a Fields,
}

impl<'a> ForceContext<'a> {
    pub fn particles(&self) -> &'a [Particle] {
        self.neighborhood.particles
    }
}

pub trait Force {
    fn targets(&self) -> &[usize];

    fn targets_mut(&mut self) -> &mut Vec<usize>;

    /// Replaces the set of particles this force acts on.
    fn set_target(&mut self, targets: Vec<usize>) {
        *self.targets_mut() = targets;
    }

    fn add_target(&mut self, index: usize) {
        self.targets_mut().push(index);
    }

    /// Adds this force's contribution for every target `i` into `forces[i]`.
    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut [Vec3]);

    fn draw(&self, _particles: &[Particle], _sink: &mut dyn DrawSink) {}
}
