use super::{Force, ForceContext};
use crate::sph::Field;
use crate::{Scalar, Vec3};

/// Surface tension from the curvature of the color field.
///
/// Where the color gradient `n` is large enough the particle is considered to be on the surface
/// and receives `-σ ∇²c n / |n|`. Deep inside the fluid `n` vanishes and nothing is added.
#[derive(Clone, Debug)]
pub struct SurfaceForce {
    targets: Vec<usize>,
    /// The tension coefficient σ.
    pub sigma: Scalar,
    /// Minimum `|n|` for a particle to count as being on the surface.
    pub threshold: Scalar,
}

impl SurfaceForce {
    pub fn new(targets: Vec<usize>, sigma: Scalar, threshold: Scalar) -> Self {
        SurfaceForce {
            targets,
            sigma,
            threshold,
        }
    }
}

impl Force for SurfaceForce {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn targets_mut(&mut self) -> &mut Vec<usize> {
        &mut self.targets
    }

    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut [Vec3]) {
        let color = &ctx.fields.color;
        let particles = ctx.particles();

        for &i in &self.targets {
            let x = particles[i].position;
            let n = color.d_eval(&ctx.neighborhood, x);
            let n_mag = n.magnitude();
            if n_mag > self.threshold {
                let curvature = color.dd_eval(&ctx.neighborhood, x);
                forces[i] += -self.sigma * curvature * n / n_mag;
            }
        }
    }
}
