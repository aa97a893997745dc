use super::{Force, ForceContext};
use crate::sph::kernels::{SmoothingKernel, ViscosityKernel};
use crate::{Scalar, Vec3};

/// Viscous drag between neighboring particles:
///
/// `f_i = μ Σ_j m_j (v_j - v_i) / ρ_j ∇²W(x_i - x_j)`
///
/// The sum runs over every neighbor, so each one pulls `v_i` towards its own velocity.
#[derive(Clone, Debug)]
pub struct ViscosityForce {
    targets: Vec<usize>,
    /// The viscosity coefficient μ.
    pub mu: Scalar,
    /// Support radius of the viscosity kernel.
    pub h: Scalar,
}

impl ViscosityForce {
    pub fn new(targets: Vec<usize>, mu: Scalar, h: Scalar) -> Self {
        ViscosityForce { targets, mu, h }
    }
}

impl Force for ViscosityForce {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn targets_mut(&mut self) -> &mut Vec<usize> {
        &mut self.targets
    }

    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut [Vec3]) {
        let h = self.h;
        let particles = ctx.particles();

        for &i in &self.targets {
            let pi = &particles[i];
            let force_viscosity = self.mu
                * ctx
                    .neighborhood
                    .near(pi.position)
                    .filter(|&(j, _)| j != i)
                    .map(|(_, pj)| {
                        let vdiff = pj.velocity - pi.velocity;
                        pj.mass * vdiff / pj.density
                            * ViscosityKernel::laplacian(pi.position - pj.position, h)
                    })
                    .sum::<Vec3>();

            forces[i] += force_viscosity;
        }
    }
}
