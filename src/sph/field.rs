use super::grid::NeighborQuery;
use super::kernels::{Poly6Kernel, SmoothingKernel, SpikyKernel};
use crate::{Particle, Scalar, Vec3};

/// The particles of a `System` together with a way to find the ones near a point. Fields and
/// forces only ever read particles through this.
#[derive(Clone, Copy)]
pub struct Neighborhood<'a> {
    pub particles: &'a [Particle],
    neighbors: &'a dyn NeighborQuery,
}

impl<'a> Neighborhood<'a> {
    pub fn new(particles: &'a [Particle], neighbors: &'a dyn NeighborQuery) -> Self {
        Neighborhood {
            particles,
            neighbors,
        }
    }

    pub fn near(&self, position: Vec3) -> impl Iterator<Item = (usize, &'a Particle)> + 'a {
        let particles = self.particles;
        self.neighbors
            .query(position)
            .into_iter()
            .map(move |j| (j, &particles[j]))
    }
}

/// A quantity interpolated from the particles with SPH kernels:
///
/// ```text
/// A(x)   = Σ_j w_j W(x - x_j)
/// ∇A(x)  = Σ_j w_j ∇W(x - x_j)
/// ∇²A(x) = Σ_j w_j ∇²W(x - x_j)
/// ```
///
/// where `w_j` is the per-particle `weight`. The kernels used for each derivative order are
/// chosen by the implementor.
pub trait Field {
    type ValueKernel: SmoothingKernel;
    type GradientKernel: SmoothingKernel;
    type LaplacianKernel: SmoothingKernel;

    /// The kernel radius.
    fn h(&self) -> Scalar;

    fn weight(&self, p: &Particle) -> Scalar;

    fn eval(&self, n: &Neighborhood<'_>, x: Vec3) -> Scalar {
        let h = self.h();
        let kernel = <Self::ValueKernel as SmoothingKernel>::value;
        n.near(x)
            .map(|(_, pj)| self.weight(pj) * kernel(x - pj.position, h))
            .sum()
    }

    fn d_eval(&self, n: &Neighborhood<'_>, x: Vec3) -> Vec3 {
        let h = self.h();
        let kernel = <Self::GradientKernel as SmoothingKernel>::gradient;
        n.near(x)
            .map(|(_, pj)| self.weight(pj) * kernel(x - pj.position, h))
            .sum()
    }

    fn dd_eval(&self, n: &Neighborhood<'_>, x: Vec3) -> Scalar {
        let h = self.h();
        let kernel = <Self::LaplacianKernel as SmoothingKernel>::laplacian;
        n.near(x)
            .map(|(_, pj)| self.weight(pj) * kernel(x - pj.position, h))
            .sum()
    }
}

/// Mass density, `Σ m_j W(x - x_j)`.
#[derive(Clone, Debug)]
pub struct DensityField {
    pub h: Scalar,
}

impl Field for DensityField {
    type ValueKernel = Poly6Kernel;
    type GradientKernel = SpikyKernel;
    type LaplacianKernel = Poly6Kernel;

    fn h(&self) -> Scalar {
        self.h
    }

    fn weight(&self, p: &Particle) -> Scalar {
        p.mass
    }
}

/// Pressure, interpolated from the pressures stored on the particles.
#[derive(Clone, Debug)]
pub struct PressureField {
    pub h: Scalar,
}

impl Field for PressureField {
    type ValueKernel = Poly6Kernel;
    type GradientKernel = SpikyKernel;
    type LaplacianKernel = Poly6Kernel;

    fn h(&self) -> Scalar {
        self.h
    }

    fn weight(&self, p: &Particle) -> Scalar {
        p.mass * p.pressure / p.density
    }
}

/// The smoothed color field: 1 inside the fluid, 0 outside. Its gradient is the surface normal
/// and its Laplacian gives the curvature.
#[derive(Clone, Debug)]
pub struct ColorField {
    pub h: Scalar,
}

impl Field for ColorField {
    type ValueKernel = Poly6Kernel;
    type GradientKernel = Poly6Kernel;
    type LaplacianKernel = Poly6Kernel;

    fn h(&self) -> Scalar {
        self.h
    }

    fn weight(&self, p: &Particle) -> Scalar {
        p.mass / p.density
    }
}

/// The three fields a `System` keeps around.
#[derive(Clone, Debug)]
pub struct Fields {
    pub density: DensityField,
    pub pressure: PressureField,
    pub color: ColorField,
}

impl Fields {
    pub fn new(h: Scalar) -> Self {
        Fields {
            density: DensityField { h },
            pressure: PressureField { h },
            color: ColorField { h },
        }
    }
}
