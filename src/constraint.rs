//! Positional constraints between particles.
//!
//! Constraints are only evaluated and drawn. Nothing in the system enforces them; a constraint
//! solver would drive `c` and `c_dot` to zero.

use crate::draw::{DrawSink, CONSTRAINT_COLOR};
use crate::{Particle, Scalar, Vec3};

pub trait Constraint {
    /// Indices of the particles this constraint involves.
    fn targets(&self) -> &[usize];

    /// The constraint function C, zero when the constraint is satisfied.
    fn c(&self, particles: &[Particle]) -> Scalar;

    /// Time derivative of C.
    fn c_dot(&self, particles: &[Particle]) -> Scalar;

    fn draw(&self, _particles: &[Particle], _sink: &mut dyn DrawSink) {}
}

/// Keeps two particles a fixed distance apart.
#[derive(Clone, Debug)]
pub struct RodConstraint {
    targets: [usize; 2],
    pub dist: Scalar,
}

impl RodConstraint {
    pub fn new(p1: usize, p2: usize, dist: Scalar) -> Self {
        RodConstraint {
            targets: [p1, p2],
            dist,
        }
    }
}

impl Constraint for RodConstraint {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// `C = (|x1 - x2|² - d²) / 2`
    fn c(&self, particles: &[Particle]) -> Scalar {
        let delta = particles[self.targets[0]].position - particles[self.targets[1]].position;
        0.5 * (delta.magnitude_squared() - self.dist * self.dist)
    }

    fn c_dot(&self, particles: &[Particle]) -> Scalar {
        let (p1, p2) = (&particles[self.targets[0]], &particles[self.targets[1]]);
        (p1.position - p2.position).dot(&(p1.velocity - p2.velocity))
    }

    fn draw(&self, particles: &[Particle], sink: &mut dyn DrawSink) {
        sink.line(
            particles[self.targets[0]].position,
            particles[self.targets[1]].position,
            CONSTRAINT_COLOR,
        );
    }
}

/// Keeps a particle on a circle of `radius` around `center`, in the plane normal to `axis`.
#[derive(Clone, Debug)]
pub struct CircularWireConstraint {
    targets: [usize; 1],
    pub center: Vec3,
    pub radius: Scalar,
    pub axis: Vec3,
}

impl CircularWireConstraint {
    pub fn new(particle: usize, center: Vec3, radius: Scalar) -> Self {
        CircularWireConstraint {
            targets: [particle],
            center,
            radius,
            axis: Vec3::z(),
        }
    }
}

impl Constraint for CircularWireConstraint {
    fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// `C = (|x - c|² - r²) / 2`
    fn c(&self, particles: &[Particle]) -> Scalar {
        let delta = particles[self.targets[0]].position - self.center;
        0.5 * (delta.magnitude_squared() - self.radius * self.radius)
    }

    fn c_dot(&self, particles: &[Particle]) -> Scalar {
        let p = &particles[self.targets[0]];
        (p.position - self.center).dot(&p.velocity)
    }

    fn draw(&self, _particles: &[Particle], sink: &mut dyn DrawSink) {
        const SEGMENTS: usize = 32;

        let u = self
            .axis
            .cross(&Vec3::x())
            .try_normalize(Scalar::EPSILON)
            .unwrap_or_else(Vec3::y);
        let v = self.axis.normalize().cross(&u);
        let point = |k: usize| {
            let theta = k as Scalar / SEGMENTS as Scalar * std::f64::consts::TAU;
            self.center + self.radius * (theta.cos() * u + theta.sin() * v)
        };

        for k in 0..SEGMENTS {
            sink.line(point(k), point(k + 1), CONSTRAINT_COLOR);
        }
    }
}
