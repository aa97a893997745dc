use crate::util::RangeExt;
use crate::{Particle, Scalar, System, Vec3};
use itertools::iproduct;
use na::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::Range;

/// Seeds a system with particles. Every particle gets `System::params.particle_mass`.
pub trait InitialCondition {
    fn add_particles(&self, s: &mut System);
}

/// A jittered lattice of particles filling an axis aligned box.
pub struct Block {
    pub size: Range<Vec3>,
    pub spacing: Scalar,
    pub jitter: Vec3,
}

impl Default for Block {
    fn default() -> Self {
        Block {
            size: Vec3::new(-0.15, -1.9, -0.15)..Vec3::new(0.15, -1.6, 0.15),
            spacing: 0.03,
            jitter: Vec3::from_element(0.03 / 8.),
        }
    }
}

impl InitialCondition for Block {
    fn add_particles(&self, s: &mut System) {
        let mut rng = StdRng::from_seed([0; 32]);
        let mass = s.params.particle_mass;

        let min = self.size.start;
        let counts = (self.size.size() / self.spacing).map(|x| x.ceil() as usize);

        for (i, j, k) in iproduct!(0..counts.x, 0..counts.y, 0..counts.z) {
            let idx = Vector3::new(i, j, k);
            let pos = idx.cast::<Scalar>() * self.spacing + min;

            let rand: Vec3 = rng.gen::<[Scalar; 3]>().into();
            let jitter = rand.component_mul(&self.jitter) - self.jitter / 2.;

            s.add_particle(Particle::new(pos + jitter, mass));
        }
    }
}

/// Particles scattered uniformly inside a ball.
pub struct Sphere {
    pub num_particles: usize,
    pub center: Vec3,
    pub radius: Scalar,
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere {
            num_particles: 500,
            center: Vec3::new(0., -1., 0.),
            radius: 0.15,
        }
    }
}

impl InitialCondition for Sphere {
    fn add_particles(&self, s: &mut System) {
        let mut rng = StdRng::from_seed([0; 32]);
        let mass = s.params.particle_mass;

        for _ in 0..self.num_particles {
            let pos = loop {
                let rand: Vec3 = rng.gen::<[Scalar; 3]>().into();
                let pos = rand * 2. - Vec3::from_element(1.);

                if pos.magnitude_squared() < 1. {
                    break pos * self.radius + self.center;
                }
            };

            s.add_particle(Particle::new(pos, mass));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Euler;
    use crate::SphParameters;
    use std::rc::Rc;

    fn system() -> System {
        System::new(Rc::new(Euler), SphParameters::default())
    }

    #[test]
    fn block_fills_lattice_inside_container() {
        let mut s = system();
        let block = Block {
            size: Vec3::new(-0.125, -1., -0.125)..Vec3::new(0.125, -0.875, 0.),
            spacing: 0.0625,
            jitter: Vec3::zeros(),
        };
        block.add_particles(&mut s);

        assert_eq!(s.particles().len(), 4 * 2 * 2);
        for p in s.particles() {
            assert!(block.size.contains_point(&p.position));
            assert!(s.params.container.contains(&p.position));
            assert_eq!(p.mass, s.params.particle_mass);
        }
    }

    #[test]
    fn sphere_stays_inside_radius() {
        let mut s = system();
        let sphere = Sphere::default();
        sphere.add_particles(&mut s);

        assert_eq!(s.particles().len(), sphere.num_particles);
        for p in s.particles() {
            assert!((p.position - sphere.center).magnitude() < sphere.radius);
        }
    }

    #[test]
    fn seeding_is_deterministic() {
        let mut a = system();
        let mut b = system();
        Block::default().add_particles(&mut a);
        Block::default().add_particles(&mut b);
        assert_eq!(a.state(), b.state());
    }
}
