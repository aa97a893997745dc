use crate::constraint::Constraint;
use crate::draw::{DrawOptions, DrawSink, FORCE_COLOR, PARTICLE_COLOR, VELOCITY_COLOR};
use crate::force::{Force, ForceContext};
use crate::sph::{Field, Fields, Grid, NeighborQuery, Neighborhood};
use crate::util::{read3, write3, STATE_STRIDE};
use crate::{Particle, Scalar, SphParameters, Solver, StateVector, Vec3};
use std::rc::Rc;

/// Exponent applied to `tolerance / error` when rescaling the step size.
const ADAPTIVE_EXPONENT: Scalar = 0.5;

/// Length of drawn velocity and force vectors per unit of magnitude.
const DRAW_SCALE: Scalar = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepMode {
    /// One solver step of the current `dt`.
    Fixed,
    /// Estimate the local error by step doubling and rescale `dt` before stepping.
    Adaptive,
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Fixed
    }
}

/// Owns the particles, the forces and constraints acting on them, and the SPH fields.
///
/// The order of `particles` is fixed: particle `i` occupies entries `6i..6i + 6` of the state
/// vector, as `[px, py, pz, vx, vy, vz]`.
pub struct System {
    particles: Vec<Particle>,
    forces: Vec<Box<dyn Force>>,
    constraints: Vec<Box<dyn Constraint>>,
    fields: Fields,
    neighbors: Box<dyn NeighborQuery>,
    solver: Rc<dyn Solver>,
    pub params: SphParameters,
    time: Scalar,
    dt: Scalar,
}

impl System {
    /// A system that finds neighbors with a uniform `Grid` of cell size `params.h`.
    pub fn new(solver: Rc<dyn Solver>, params: SphParameters) -> Self {
        let grid = Box::new(Grid::new(params.h));
        Self::with_neighbor_query(solver, params, grid)
    }

    pub fn with_neighbor_query(
        solver: Rc<dyn Solver>,
        params: SphParameters,
        neighbors: Box<dyn NeighborQuery>,
    ) -> Self {
        System {
            particles: Vec::new(),
            forces: Vec::new(),
            constraints: Vec::new(),
            fields: Fields::new(params.h),
            neighbors,
            solver,
            time: 0.,
            dt: params.delta_time,
            params,
        }
    }

    /// Adds a particle and makes it a target of every force already in the system. Returns the
    /// particle's index.
    pub fn add_particle(&mut self, p: Particle) -> usize {
        let index = self.particles.len();
        self.particles.push(p);
        for f in &mut self.forces {
            f.add_target(index);
        }
        index
    }

    /// Adds a force. It only acts on the particles it already targets and on particles added
    /// from now on.
    pub fn add_force(&mut self, f: Box<dyn Force>) {
        self.forces.push(f);
    }

    pub fn add_constraint(&mut self, c: Box<dyn Constraint>) {
        self.constraints.push(c);
    }

    /// Removes every particle, force and constraint.
    pub fn free(&mut self) {
        self.particles.clear();
        self.forces.clear();
        self.constraints.clear();
    }

    /// Puts every particle back in its initial state and the clock back to zero.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            p.reset();
        }
        self.time = 0.;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn forces(&self) -> &[Box<dyn Force>] {
        &self.forces
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn set_solver(&mut self, solver: Rc<dyn Solver>) {
        self.solver = solver;
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn dt(&self) -> Scalar {
        self.dt
    }

    pub fn set_dt(&mut self, dt: Scalar) {
        self.dt = dt;
    }

    /// Length of the state vector: 3 position and 3 velocity components per particle.
    pub fn dim(&self) -> usize {
        self.particles.len() * STATE_STRIDE
    }

    pub fn state(&self) -> StateVector {
        let mut r = StateVector::zeros(self.dim());
        for (i, p) in self.particles.iter().enumerate() {
            write3(&mut r, i * STATE_STRIDE, &p.position);
            write3(&mut r, i * STATE_STRIDE + 3, &p.velocity);
        }
        r
    }

    /// Writes positions and velocities into every movable particle. The clock is left alone.
    pub fn set_state(&mut self, src: &StateVector) {
        let t = self.time;
        self.set_state_at(src, t);
    }

    /// Writes positions and velocities into every movable particle and sets the clock to `t`.
    /// Immovable particles keep their current position and velocity.
    pub fn set_state_at(&mut self, src: &StateVector, t: Scalar) {
        assert_eq!(
            src.len(),
            self.dim(),
            "State vector has length {}, expected {}",
            src.len(),
            self.dim()
        );

        for (i, p) in self.particles.iter_mut().enumerate() {
            if p.movable {
                p.position = read3(src, i * STATE_STRIDE);
                p.velocity = read3(src, i * STATE_STRIDE + 3);
            }
        }
        self.time = t;
    }

    /// Accepts `state` as the result of a step: resolves collisions with the container, then
    /// writes it back at time `t`.
    pub fn commit_state(&mut self, state: StateVector, t: Scalar) {
        let state = self.check_collisions(state);
        self.set_state_at(&state, t);
    }

    /// Clamps every particle in `new_state` into the container, reflecting velocities that
    /// still point outwards. Particles themselves are not touched.
    pub fn check_collisions(&self, new_state: StateVector) -> StateVector {
        assert_eq!(
            new_state.len(),
            self.dim(),
            "State vector has length {}, expected {}",
            new_state.len(),
            self.dim()
        );
        self.params.container.resolve_state(new_state)
    }

    /// Time derivative of the state vector for the current configuration.
    ///
    /// Densities, pressures and force accumulators of the particles are recomputed as a side
    /// effect; positions and velocities are not changed.
    pub fn deriv_eval(&mut self) -> StateVector {
        self.clear_forces();
        if self.particles.is_empty() {
            return StateVector::zeros(0);
        }
        self.compute_forces();
        self.compute_derivative()
    }

    /// Advances the system by one step of the solver.
    pub fn step(&mut self, mode: StepMode) {
        if self.particles.is_empty() {
            tracing::trace!("Empty system, nothing to step");
            return;
        }

        let _span = tracing::trace_span!("step", t = self.time, dt = self.dt).entered();
        let solver = Rc::clone(&self.solver);

        if mode == StepMode::Adaptive {
            let before = self.state();
            let t0 = self.time;
            let dt = self.dt;

            solver.simulate_step(self, dt);
            let xa = self.state();
            self.set_state_at(&before, t0);

            solver.simulate_step(self, dt / 2.);
            solver.simulate_step(self, dt / 2.);
            let xb = self.state();
            self.set_state_at(&before, t0);

            let err = (xa - xb).norm();
            self.rescale_dt(err);
        }

        let dt = self.dt;
        solver.simulate_step(self, dt);
    }

    fn rescale_dt(&mut self, err: Scalar) {
        if !err.is_finite() {
            tracing::warn!(err, dt = self.dt, "Non-finite error estimate, keeping step size");
        } else if err > 0. {
            let new_dt = self.dt * (self.params.error_tolerance / err).powf(ADAPTIVE_EXPONENT);
            tracing::debug!(err, old = self.dt, new = new_dt, "Rescaled step size");
            self.dt = new_dt;
        }
    }

    /// Describes the particles, and optionally their velocities, forces and the constraints, to
    /// a renderer.
    pub fn draw(&self, sink: &mut dyn DrawSink, options: DrawOptions) {
        for p in &self.particles {
            sink.point(p.position, PARTICLE_COLOR);
            if options.velocity {
                sink.line(p.position, p.position + p.velocity * DRAW_SCALE, VELOCITY_COLOR);
            }
            if options.force {
                sink.line(p.position, p.position + p.force * DRAW_SCALE, FORCE_COLOR);
            }
        }

        if options.force {
            for f in &self.forces {
                f.draw(&self.particles, sink);
            }
        }

        if options.constraint {
            for c in &self.constraints {
                c.draw(&self.particles, sink);
            }
        }
    }

    fn clear_forces(&mut self) {
        for p in &mut self.particles {
            p.force = Vec3::zeros();
        }
    }

    /// Density, then pressure, then every force in the order they were added.
    fn compute_forces(&mut self) {
        self.neighbors.rebuild(&self.particles);

        let densities: Vec<Scalar> = {
            let n = Neighborhood::new(&self.particles, &*self.neighbors);
            self.particles
                .iter()
                .map(|p| self.fields.density.eval(&n, p.position))
                .collect()
        };

        let min_density = self.params.min_density;
        let clamped = store_densities(&mut self.particles, densities, min_density);
        if clamped > 0 {
            tracing::warn!(clamped, min_density, "Densities below minimum, clamping");
        }

        let num_particles = self.particles.len() as Scalar;
        let rest_density = self.particles.iter().map(|p| p.density).sum::<Scalar>() / num_particles;

        let k = self.params.k;
        for p in &mut self.particles {
            p.pressure = k * (p.density - rest_density);
        }

        let mut accumulated = vec![Vec3::zeros(); self.particles.len()];
        {
            let ctx = ForceContext {
                neighborhood: Neighborhood::new(&self.particles, &*self.neighbors),
                fields: &self.fields,
            };
            for f in &self.forces {
                f.apply(&ctx, &mut accumulated);
            }
        }

        for (p, force) in self.particles.iter_mut().zip(accumulated) {
            p.force += force;
        }
    }

    /// Velocity into the position slots, force over density into the velocity slots.
    fn compute_derivative(&self) -> StateVector {
        let mut dst = StateVector::zeros(self.dim());
        for (i, p) in self.particles.iter().enumerate() {
            write3(&mut dst, i * STATE_STRIDE, &p.velocity);
            write3(&mut dst, i * STATE_STRIDE + 3, &(p.force / p.density));
        }
        dst
    }
}

/// Writes `densities` into `particles`, raising any below `min_density` to it. Returns how many
/// were raised.
fn store_densities(
    particles: &mut [Particle],
    densities: Vec<Scalar>,
    min_density: Scalar,
) -> usize {
    let mut clamped = 0;
    for (p, density) in particles.iter_mut().zip(densities) {
        p.density = if density >= min_density {
            density
        } else {
            clamped += 1;
            min_density
        };
    }
    clamped
}
