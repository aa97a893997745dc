use crate::{Scalar, System, Vec3};
use itertools::izip;

/// Conserved (or nearly conserved) quantities, for sanity-checking a run.
pub trait SimulationStatistics {
    fn total_time(&self) -> Scalar;
    fn total_mass(&self) -> Scalar;
    fn total_linear_momentum(&self) -> Vec3;
    fn total_angular_momentum(&self) -> Vec3;
    fn total_energy(&self) -> Scalar;
    fn total_volume(&self) -> Scalar;
}

impl SimulationStatistics for System {
    fn total_time(&self) -> Scalar {
        self.time()
    }

    fn total_mass(&self) -> Scalar {
        self.particles().iter().map(|p| p.mass).sum()
    }

    fn total_linear_momentum(&self) -> Vec3 {
        self.particles().iter().map(|p| p.mass * p.velocity).sum()
    }

    fn total_angular_momentum(&self) -> Vec3 {
        let particles = self.particles();
        izip!(
            particles.iter().map(|p| p.mass),
            particles.iter().map(|p| &p.velocity),
            particles.iter().map(|p| &p.position)
        )
        .map(|(m, v, x)| m * x.cross(v))
        .sum()
    }

    /// Kinetic energy only.
    fn total_energy(&self) -> Scalar {
        self.particles()
            .iter()
            .map(|p| 0.5 * p.mass * p.velocity.dot(&p.velocity))
            .sum()
    }

    fn total_volume(&self) -> Scalar {
        self.particles().iter().map(|p| p.mass / p.density).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Euler;
    use crate::{Particle, SphParameters};
    use std::rc::Rc;

    #[test]
    fn totals_of_two_particles() {
        let mut s = System::new(Rc::new(Euler), SphParameters::default());
        s.add_particle(Particle::new(Vec3::new(0.1, 0., 0.), 2.).with_velocity(Vec3::y()));
        s.add_particle(Particle::new(Vec3::new(-0.1, 0., 0.), 1.).with_velocity(-Vec3::y()));

        assert_eq!(s.total_time(), 0.);
        assert_eq!(s.total_mass(), 3.);
        assert_eq!(s.total_linear_momentum(), Vec3::new(0., 1., 0.));
        assert!((s.total_angular_momentum() - Vec3::new(0., 0., 0.3)).magnitude() < 1e-12);
        assert_eq!(s.total_energy(), 1.5);
        assert_eq!(s.total_volume(), 3.);
    }
}
