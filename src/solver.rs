//! Numerical integration schemes.
//!
//! A solver only sees the `System` through its state-vector contract: `state`, `deriv_eval`,
//! `set_state_at` for intermediate stages, and `commit_state` for the final result of a step.

use crate::{Scalar, System};
use std::fmt;
use std::str::FromStr;

pub trait Solver {
    /// Advances `system` by `dt`, in place.
    fn simulate_step(&self, system: &mut System, dt: Scalar);
}

/// Forward Euler: `x(t + h) = x(t) + h f(x(t))`
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl Solver for Euler {
    fn simulate_step(&self, s: &mut System, dt: Scalar) {
        let t = s.time();
        let x0 = s.state();
        let k1 = s.deriv_eval();

        s.commit_state(x0 + k1 * dt, t + dt);
    }
}

/// Explicit midpoint method.
#[derive(Clone, Copy, Debug, Default)]
pub struct Midpoint;

impl Solver for Midpoint {
    fn simulate_step(&self, s: &mut System, dt: Scalar) {
        let t = s.time();
        let x0 = s.state();
        let k1 = s.deriv_eval();

        s.set_state_at(&(&x0 + k1 * (dt / 2.)), t + dt / 2.);
        let k2 = s.deriv_eval();

        s.commit_state(x0 + k2 * dt, t + dt);
    }
}

/// Classic fourth order Runge-Kutta.
#[derive(Clone, Copy, Debug, Default)]
pub struct RungeKutta4;

impl Solver for RungeKutta4 {
    fn simulate_step(&self, s: &mut System, dt: Scalar) {
        let t = s.time();
        let x0 = s.state();

        let k1 = s.deriv_eval();

        s.set_state_at(&(&x0 + &k1 * (dt / 2.)), t + dt / 2.);
        let k2 = s.deriv_eval();

        s.set_state_at(&(&x0 + &k2 * (dt / 2.)), t + dt / 2.);
        let k3 = s.deriv_eval();

        s.set_state_at(&(&x0 + &k3 * dt), t + dt);
        let k4 = s.deriv_eval();

        let x1 = x0 + (k1 + k2 * 2. + k3 * 2. + k4) * (dt / 6.);
        s.commit_state(x1, t + dt);
    }
}

/// Names the built-in solvers, so one can be picked from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    Euler,
    Midpoint,
    RungeKutta4,
}

impl SolverKind {
    pub fn build(self) -> Box<dyn Solver> {
        match self {
            SolverKind::Euler => Box::new(Euler),
            SolverKind::Midpoint => Box::new(Midpoint),
            SolverKind::RungeKutta4 => Box::new(RungeKutta4),
        }
    }
}

impl FromStr for SolverKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(SolverKind::Euler),
            "midpoint" => Ok(SolverKind::Midpoint),
            "rk4" | "runge-kutta" => Ok(SolverKind::RungeKutta4),
            other => Err(eyre::eyre!(
                "Unknown solver {:?}, expected one of: euler, midpoint, rk4",
                other
            )),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Euler => write!(f, "euler"),
            SolverKind::Midpoint => write!(f, "midpoint"),
            SolverKind::RungeKutta4 => write!(f, "rk4"),
        }
    }
}
