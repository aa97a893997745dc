use crate::util::{read3, write3, RangeExt, STATE_STRIDE};
use crate::{Scalar, StateVector, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Axis order in which walls are resolved: X, then Z, then Y.
const AXES: [usize; 3] = [0, 2, 1];

/// An axis-aligned box the particles live in. Leave a bound at `Scalar::MAX` (or `MIN`) for an
/// open side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub bounds: Range<Vec3>,
}

impl Default for Container {
    /// A narrow column, 0.4 wide in X and Z, with a floor at Y = -2 and no ceiling.
    fn default() -> Self {
        Container {
            bounds: Vec3::new(-0.2, -2.0, -0.2)..Vec3::new(0.2, Scalar::MAX, 0.2),
        }
    }
}

impl Container {
    pub fn new(bounds: Range<Vec3>) -> Self {
        Container { bounds }
    }

    pub fn contains(&self, x: &Vec3) -> bool {
        self.bounds.contains_point(x)
    }

    /// Clamps a single particle back inside. On every axis where it was outside, the velocity
    /// component is flipped if it was still pointing out of the box.
    pub fn resolve(&self, position: &mut Vec3, velocity: &mut Vec3) {
        for &i in &AXES {
            if position[i] < self.bounds.start[i] {
                position[i] = self.bounds.start[i];
                if velocity[i] < 0. {
                    velocity[i] = -velocity[i];
                }
            }

            if position[i] > self.bounds.end[i] {
                position[i] = self.bounds.end[i];
                if velocity[i] > 0. {
                    velocity[i] = -velocity[i];
                }
            }
        }
    }

    /// Applies `resolve` to every particle of a state vector.
    pub fn resolve_state(&self, mut state: StateVector) -> StateVector {
        assert_eq!(
            state.len() % STATE_STRIDE,
            0,
            "State vector length {} is not a multiple of {}",
            state.len(),
            STATE_STRIDE
        );

        for offset in (0..state.len()).step_by(STATE_STRIDE) {
            let mut position = read3(&state, offset);
            let mut velocity = read3(&state, offset + 3);
            self.resolve(&mut position, &mut velocity);
            write3(&mut state, offset, &position);
            write3(&mut state, offset + 3, &velocity);
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(position: Vec3, velocity: Vec3) -> StateVector {
        let mut state = StateVector::zeros(STATE_STRIDE);
        write3(&mut state, 0, &position);
        write3(&mut state, 3, &velocity);
        state
    }

    #[test]
    fn reflects_off_the_x_wall() {
        let out = Container::default().resolve_state(single(
            Vec3::new(-0.25, 0., 0.),
            Vec3::new(-1., 0., 0.),
        ));
        assert_eq!(read3(&out, 0), Vec3::new(-0.2, 0., 0.));
        assert_eq!(read3(&out, 3), Vec3::new(1., 0., 0.));
    }

    #[test]
    fn reflects_off_the_floor() {
        let out = Container::default().resolve_state(single(
            Vec3::new(0., -2.5, 0.),
            Vec3::new(0., -1., 0.),
        ));
        assert_eq!(read3(&out, 0), Vec3::new(0., -2., 0.));
        assert_eq!(read3(&out, 3), Vec3::new(0., 1., 0.));
    }

    #[test]
    fn z_wall_reflects_z_velocity() {
        let out = Container::default().resolve_state(single(
            Vec3::new(0., 0., 0.3),
            Vec3::new(0.5, 0., 2.),
        ));
        assert_eq!(read3(&out, 0), Vec3::new(0., 0., 0.2));
        assert_eq!(read3(&out, 3), Vec3::new(0.5, 0., -2.));
    }

    #[test]
    fn inward_velocity_is_kept() {
        let out = Container::default().resolve_state(single(
            Vec3::new(0.3, 0., 0.),
            Vec3::new(-1., 0., 0.),
        ));
        assert_eq!(read3(&out, 0), Vec3::new(0.2, 0., 0.));
        assert_eq!(read3(&out, 3), Vec3::new(-1., 0., 0.));
    }

    #[test]
    fn corner_is_resolved_on_every_axis() {
        let out = Container::default().resolve_state(single(
            Vec3::new(0.5, -3., -0.5),
            Vec3::new(1., -1., -1.),
        ));
        assert_eq!(read3(&out, 0), Vec3::new(0.2, -2., -0.2));
        assert_eq!(read3(&out, 3), Vec3::new(-1., 1., 1.));
    }

    #[test]
    fn no_ceiling() {
        let state = single(Vec3::new(0., 1e6, 0.), Vec3::new(0., 5., 0.));
        assert_eq!(Container::default().resolve_state(state.clone()), state);
    }

    #[test]
    fn particles_inside_are_untouched() {
        let mut state = StateVector::zeros(2 * STATE_STRIDE);
        write3(&mut state, 0, &Vec3::new(0.1, -1., -0.1));
        write3(&mut state, 3, &Vec3::new(3., -4., 5.));
        write3(&mut state, 6, &Vec3::new(-0.2, -2., 0.2));
        write3(&mut state, 9, &Vec3::new(-1., -1., 1.));
        assert_eq!(Container::default().resolve_state(state.clone()), state);
    }

    proptest! {
        #[test]
        fn resolved_state_is_inside_and_stable(
            values in prop::collection::vec(-5.0..5.0f64, 0..40).prop_map(|v| {
                let n = v.len() - v.len() % STATE_STRIDE;
                v[..n].to_vec()
            }),
        ) {
            let container = Container::default();
            let out = container.resolve_state(StateVector::from_vec(values));

            for offset in (0..out.len()).step_by(STATE_STRIDE) {
                prop_assert!(container.contains(&read3(&out, offset)));
            }
            prop_assert_eq!(container.resolve_state(out.clone()), out);
        }
    }
}
