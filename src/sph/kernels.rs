use crate::{Scalar, Vec3};
use std::f64::consts::PI;

/// An SPH smoothing kernel with support radius `h`. `r` is always `x_i - x_j`.
pub trait SmoothingKernel {
    fn value(_r: Vec3, _h: Scalar) -> Scalar {
        0.
    }

    /// dW/d|r|
    fn gradient_mag(_r: Vec3, _h: Scalar) -> Scalar {
        0.
    }

    /// Zero at `r = 0`, where the direction is undefined.
    fn gradient(r: Vec3, h: Scalar) -> Vec3 {
        r.try_normalize(Scalar::EPSILON)
            .map_or_else(Vec3::zeros, |dir| dir * Self::gradient_mag(r, h))
    }

    fn laplacian(_r: Vec3, _h: Scalar) -> Scalar {
        0.
    }
}

/// Müller's spiky kernel. Its gradient doesn't vanish near the center, unlike poly6.
pub struct SpikyKernel;

impl SmoothingKernel for SpikyKernel {
    fn value(r: Vec3, h: Scalar) -> Scalar {
        let r_mag = r.magnitude();
        if r_mag <= h {
            let c = 15. / (PI * h.powi(6));
            let h_sub_r = h - r_mag;
            c * h_sub_r * h_sub_r * h_sub_r
        } else {
            0.
        }
    }

    fn gradient_mag(r: Vec3, h: Scalar) -> Scalar {
        let r_mag = r.magnitude();
        if r_mag <= h {
            let c = 15. * -3. / (PI * h.powi(6));
            let h_sub_r = h - r_mag;
            c * h_sub_r * h_sub_r
        } else {
            0.
        }
    }
}

pub struct Poly6Kernel;

impl Poly6Kernel {
    fn coefficient(h: Scalar) -> Scalar {
        315. / (64. * PI * h.powi(9))
    }
}

impl SmoothingKernel for Poly6Kernel {
    fn value(r: Vec3, h: Scalar) -> Scalar {
        let mag2 = r.magnitude_squared();
        if mag2 <= h * h {
            Self::coefficient(h) * (h * h - mag2).powi(3)
        } else {
            0.
        }
    }

    fn gradient_mag(r: Vec3, h: Scalar) -> Scalar {
        let mag2 = r.magnitude_squared();
        if mag2 <= h * h && mag2 > 0. {
            Self::coefficient(h) * 3. * -2. * mag2.sqrt() * (h * h - mag2) * (h * h - mag2)
        } else {
            0.
        }
    }

    fn laplacian(r: Vec3, h: Scalar) -> Scalar {
        let mag2 = r.magnitude_squared();
        if mag2 <= h * h {
            Self::coefficient(h) * -6. * (h * h - mag2) * (3. * h * h - 7. * mag2)
        } else {
            0.
        }
    }
}

/// Only the Laplacian is defined. It is positive everywhere inside the support.
pub struct ViscosityKernel;

impl SmoothingKernel for ViscosityKernel {
    fn laplacian(r: Vec3, h: Scalar) -> Scalar {
        let c = 45. / (PI * h.powi(6));

        let mag = r.magnitude();
        if mag <= h {
            c * (h - mag)
        } else {
            0.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::diff_test;
    use itertools::iproduct;

    /// Midpoint-rule integral of the kernel over the cube enclosing its support.
    fn integrate<K: SmoothingKernel>(h: Scalar) -> Scalar {
        let n = 60;
        let dx = 2. * h / n as Scalar;
        iproduct!(0..n, 0..n, 0..n)
            .map(|(i, j, k)| {
                let r = Vec3::new(i as Scalar, j as Scalar, k as Scalar).add_scalar(0.5) * dx
                    - Vec3::from_element(h);
                K::value(r, h)
            })
            .sum::<Scalar>()
            * dx
            * dx
            * dx
    }

    #[test]
    fn kernels_are_normalized() {
        let poly6 = integrate::<Poly6Kernel>(0.5);
        assert!((poly6 - 1.).abs() < 0.02, "poly6 integrates to {}", poly6);

        let spiky = integrate::<SpikyKernel>(0.5);
        assert!((spiky - 1.).abs() < 0.02, "spiky integrates to {}", spiky);
    }

    #[test]
    fn kernels_vanish_outside_support() {
        let r = Vec3::new(0.3, 0.3, 0.3);
        let h = 0.5;
        assert_eq!(Poly6Kernel::value(r, h), 0.);
        assert_eq!(Poly6Kernel::laplacian(r, h), 0.);
        assert_eq!(SpikyKernel::gradient(r, h), Vec3::zeros());
        assert_eq!(ViscosityKernel::laplacian(r, h), 0.);
    }

    #[test]
    fn gradient_is_zero_at_center() {
        assert_eq!(Poly6Kernel::gradient(Vec3::zeros(), 1.), Vec3::zeros());
        assert_eq!(SpikyKernel::gradient(Vec3::zeros(), 1.), Vec3::zeros());
    }

    #[test]
    fn spiky_gradient_points_inward() {
        let r = Vec3::new(0.1, 0., 0.);
        let g = SpikyKernel::gradient(r, 0.5);
        assert!(g.x < 0.);
        assert_eq!(g.y, 0.);
        assert_eq!(g.z, 0.);
    }

    #[test]
    fn poly6_gradient_matches_finite_difference() {
        let failures = diff_test(
            |x| Poly6Kernel::value(x, 1.),
            |x| Poly6Kernel::gradient(x, 1.),
            Vec3::from_element(-1.)..Vec3::from_element(1.),
            1e-6,
        );
        assert_eq!(failures, 0);
    }

    #[test]
    fn poly6_laplacian_matches_divergence_of_gradient() {
        let h = 1.;
        let eps = 1e-5;
        for x in &[
            Vec3::new(0.1, 0.2, -0.3),
            Vec3::new(-0.5, 0.1, 0.4),
            Vec3::new(0., 0., 0.05),
        ] {
            let div: Scalar = (0..3)
                .map(|axis| {
                    let dx = Vec3::ith(axis, eps);
                    (Poly6Kernel::gradient(x + dx, h)[axis] - Poly6Kernel::gradient(x - dx, h)[axis])
                        / (2. * eps)
                })
                .sum();
            let lap = Poly6Kernel::laplacian(*x, h);
            assert!((div - lap).abs() < 1e-4 * lap.abs().max(1.), "{} vs {}", div, lap);
        }
    }

    #[test]
    fn viscosity_laplacian_is_positive() {
        for i in 0..10 {
            let r = Vec3::new(i as Scalar * 0.049, 0., 0.);
            assert!(ViscosityKernel::laplacian(r, 0.5) > 0.);
        }
    }
}
