use crate::{StateVector, Vec3};
use std::ops::Range;

/// Number of state-vector entries per particle: 3 for position, 3 for velocity.
pub const STATE_STRIDE: usize = 6;

/// Reads the three components starting at `offset`.
pub fn read3(v: &StateVector, offset: usize) -> Vec3 {
    Vec3::new(v[offset], v[offset + 1], v[offset + 2])
}

/// Writes `x` into the three components starting at `offset`.
pub fn write3(v: &mut StateVector, offset: usize, x: &Vec3) {
    v[offset] = x.x;
    v[offset + 1] = x.y;
    v[offset + 2] = x.z;
}

/// Samples random points in `domain` and checks that `df` is the gradient of `f` with a finite
/// difference of size `eps`. Returns the number of points where the check failed.
#[cfg(test)]
pub fn diff_test<F, DF>(f: F, df: DF, domain: Range<Vec3>, eps: crate::Scalar) -> usize
where
    F: Fn(Vec3) -> crate::Scalar,
    DF: Fn(Vec3) -> Vec3,
{
    use crate::Scalar;

    let mut failures = 0;
    for _ in 0..1000 {
        let x0 = Vec3::new_random().component_mul(&domain.size()) + domain.start;
        let dx = (2. * Vec3::new_random() - Vec3::ones()) * eps;

        let x1 = x0 + dx;

        let a0 = f(x0);
        let a1 = f(x1);

        let d0 = df(x0);
        let d1 = df(x1);

        let u = (a1 - a0) / eps;
        let v = (d0 + d1).dot(&dx) / (2. * eps);

        let err = (u - v).abs();
        let scale = Scalar::max(1., Scalar::max(u.abs(), v.abs()));

        if err > 100. * eps * scale {
            eprintln!(
                "Diff Test Failed: {:?} -- {:?} vs {:?} at {:?}",
                err, u, v, x0
            );
            failures += 1;
        }
    }
    failures
}

pub trait RangeExt {
    fn size(&self) -> Vec3;

    fn center(&self) -> Vec3;

    fn contains_point(&self, x: &Vec3) -> bool;
}

impl RangeExt for Range<Vec3> {
    fn size(&self) -> Vec3 {
        self.end - self.start
    }

    fn center(&self) -> Vec3 {
        0.5 * (self.start + self.end)
    }

    /// Inclusive on both ends, so clamped particles count as inside.
    fn contains_point(&self, x: &Vec3) -> bool {
        self.start.all_le(x) && self.end.all_ge(x)
    }
}

pub trait VecExt {
    fn all_le(&self, other: &Self) -> bool;

    fn all_ge(&self, other: &Self) -> bool;

    fn ones() -> Self;
}

impl VecExt for Vec3 {
    fn all_le(&self, other: &Self) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }

    fn all_ge(&self, other: &Self) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }

    fn ones() -> Self {
        Self::from_element(1.)
    }
}
