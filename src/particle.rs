use crate::{Scalar, Vec3};

/// Density a particle starts out with, before the first density evaluation.
pub const INITIAL_DENSITY: Scalar = 1.;

/// A single SPH particle.
///
/// `density` is always strictly positive, since it is used as a divisor when computing the
/// acceleration. Immovable particles ignore every state write from the `System`, which makes
/// them useful as fixed anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Force accumulator, cleared at the start of every derivative evaluation.
    pub force: Vec3,
    pub mass: Scalar,
    pub density: Scalar,
    pub pressure: Scalar,
    pub movable: bool,
    initial_position: Vec3,
}

impl Particle {
    /// Creates a movable particle at rest.
    pub fn new(position: Vec3, mass: Scalar) -> Self {
        Particle {
            position,
            velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            mass,
            density: INITIAL_DENSITY,
            pressure: 0.,
            movable: true,
            initial_position: position,
        }
    }

    /// Creates a particle that never moves, no matter what forces act on it.
    pub fn fixed(position: Vec3, mass: Scalar) -> Self {
        Particle {
            movable: false,
            ..Particle::new(position, mass)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Puts the particle back where it was created, at rest, and clears all derived quantities.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = Vec3::zeros();
        self.force = Vec3::zeros();
        self.density = INITIAL_DENSITY;
        self.pressure = 0.;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_initial_state() {
        let mut p = Particle::new(Vec3::new(0.1, 0.2, 0.3), 0.5).with_velocity(Vec3::x());
        p.position = Vec3::new(1., 1., 1.);
        p.force = Vec3::y();
        p.density = 42.;
        p.pressure = 3.;

        p.reset();

        assert_eq!(p.position, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(p.velocity, Vec3::zeros());
        assert_eq!(p.force, Vec3::zeros());
        assert_eq!(p.density, INITIAL_DENSITY);
        assert_eq!(p.pressure, 0.);
        assert_eq!(p.mass, 0.5);
    }

    #[test]
    fn fixed_particles_are_immovable() {
        let p = Particle::fixed(Vec3::zeros(), 1.);
        assert!(!p.movable);
        assert!(Particle::new(Vec3::zeros(), 1.).movable);
    }
}
