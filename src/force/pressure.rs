use super::{Force, ForceContext};
use crate::sph::kernels::{SmoothingKernel, SpikyKernel};
use crate::sph::Field;
use crate::Vec3;

/// The pressure gradient force, symmetrized so that every pair pushes each other apart equally:
///
/// `f_i = -Σ_j m_j (p_i + p_j) / (2 ρ_j) ∇W(x_i - x_j)`
///
/// The `p_j` half of the sum is the gradient of the pressure field.
#[derive(Clone, Debug, Default)]
pub struct PressureForce {
    targets: Vec<usize>,
}

impl PressureForce {
    pub fn new(targets: Vec<usize>) -> Self {
        PressureForce { targets }
    }
}

impl Force for PressureForce {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn targets_mut(&mut self) -> &mut Vec<usize> {
        &mut self.targets
    }

    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut [Vec3]) {
        let pressure = &ctx.fields.pressure;
        let h = pressure.h;
        let particles = ctx.particles();

        for &i in &self.targets {
            let pi = &particles[i];
            let grad_p = pressure.d_eval(&ctx.neighborhood, pi.position);
            let grad_volume = ctx
                .neighborhood
                .near(pi.position)
                .filter(|&(j, _)| j != i)
                .map(|(_, pj)| {
                    pj.mass / pj.density * SpikyKernel::gradient(pi.position - pj.position, h)
                })
                .sum::<Vec3>();

            forces[i] -= (pi.pressure * grad_volume + grad_p) / 2.;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::test_util::with_context;
    use crate::Particle;

    #[test]
    fn positive_pressure_pushes_particles_apart() {
        let mut particles = vec![
            Particle::new(Vec3::zeros(), 1.),
            Particle::new(Vec3::new(0.02, 0., 0.), 1.),
        ];
        particles[0].pressure = 1.;
        particles[1].pressure = 1.;

        let forces = with_context(&mut particles, 0.05, |ctx| {
            let mut forces = vec![Vec3::zeros(); 2];
            PressureForce::new(vec![0, 1]).apply(ctx, &mut forces);
            forces
        });

        assert!(forces[0].x < 0.);
        assert!(forces[1].x > 0.);
        assert!((forces[0] + forces[1]).magnitude() < 1e-9 * forces[0].magnitude());
    }

    #[test]
    fn only_targets_receive_force() {
        let mut particles = vec![
            Particle::new(Vec3::zeros(), 1.),
            Particle::new(Vec3::new(0.02, 0., 0.), 1.),
        ];
        particles[0].pressure = 1.;
        particles[1].pressure = 1.;

        let forces = with_context(&mut particles, 0.05, |ctx| {
            let mut forces = vec![Vec3::zeros(); 2];
            PressureForce::new(vec![1]).apply(ctx, &mut forces);
            forces
        });

        assert_eq!(forces[0], Vec3::zeros());
        assert!(forces[1].x > 0.);
    }

    #[test]
    fn matches_the_pairwise_sum() {
        let h = 0.05;
        let mut particles = vec![
            Particle::new(Vec3::zeros(), 0.02),
            Particle::new(Vec3::new(0.02, 0.01, 0.), 0.03),
            Particle::new(Vec3::new(-0.01, 0.02, 0.015), 0.01),
        ];
        particles[0].pressure = 2.;
        particles[1].pressure = -0.5;
        particles[2].pressure = 1.;

        let (forces, expected) = with_context(&mut particles, h, |ctx| {
            let mut forces = vec![Vec3::zeros(); 3];
            PressureForce::new(vec![0, 1, 2]).apply(ctx, &mut forces);

            let ps = ctx.particles();
            let expected: Vec<Vec3> = (0..3)
                .map(|i| {
                    let mut f = Vec3::zeros();
                    for j in (0..3).filter(|&j| j != i) {
                        f -= ps[j].mass * (ps[i].pressure + ps[j].pressure) / (2. * ps[j].density)
                            * SpikyKernel::gradient(ps[i].position - ps[j].position, h);
                    }
                    f
                })
                .collect();
            (forces, expected)
        });

        for (f, e) in forces.iter().zip(&expected) {
            assert!(e.magnitude() > 0.);
            assert!((f - e).magnitude() < 1e-9 * e.magnitude());
        }
    }
}
