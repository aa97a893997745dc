use super::{Force, ForceContext};
use crate::Vec3;

/// Uniform gravity. Since the system divides force by density to get acceleration, the force is
/// scaled by density so that every target accelerates at exactly `gravity`.
#[derive(Clone, Debug)]
pub struct GravityForce {
    targets: Vec<usize>,
    pub gravity: Vec3,
}

impl GravityForce {
    pub fn new(targets: Vec<usize>, gravity: Vec3) -> Self {
        GravityForce { targets, gravity }
    }
}

impl Force for GravityForce {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn targets_mut(&mut self) -> &mut Vec<usize> {
        &mut self.targets
    }

    fn apply(&self, ctx: &ForceContext<'_>, forces: &mut [Vec3]) {
        let particles = ctx.particles();
        for &i in &self.targets {
            forces[i] += self.gravity * particles[i].density;
        }
    }
}
