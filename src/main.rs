use sph_fluids::force::{GravityForce, PressureForce, SurfaceForce, ViscosityForce};
use sph_fluids::initial_condition::{Block, InitialCondition, Sphere};
use sph_fluids::solver::SolverKind;
use sph_fluids::statistics::SimulationStatistics;
use sph_fluids::{Solver, SphParameters, StepMode, System};

use std::rc::Rc;
use std::str::FromStr;

use structopt::StructOpt;

#[derive(Clone, Copy, Debug)]
enum Scene {
    Block,
    Sphere,
}

impl FromStr for Scene {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(Scene::Block),
            "sphere" => Ok(Scene::Sphere),
            other => Err(eyre::eyre!("Unknown scene {:?}, expected block or sphere", other)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "sph_fluids")]
struct Opt {
    /// JSON file with simulation parameters. Missing fields use the defaults.
    #[structopt(short, long)]
    input_file: Option<std::path::PathBuf>,
    #[structopt(short, long, default_value = "600")]
    frames: usize,
    #[structopt(long, default_value = "10")]
    steps_per_frame: usize,
    /// One of euler, midpoint, rk4
    #[structopt(short, long, default_value = "rk4")]
    solver: SolverKind,
    /// One of block, sphere
    #[structopt(long, default_value = "block")]
    scene: Scene,
    /// Rescale the time step every step based on an error estimate
    #[structopt(short, long)]
    adaptive: bool,
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn build_system(params: SphParameters, solver: Rc<dyn Solver>, scene: Scene) -> System {
    let mut s = System::new(solver, params.clone());

    s.add_force(Box::new(PressureForce::new(vec![])));
    s.add_force(Box::new(ViscosityForce::new(vec![], params.viscosity, params.h)));
    s.add_force(Box::new(SurfaceForce::new(
        vec![],
        params.surface_tension,
        params.surface_threshold,
    )));
    s.add_force(Box::new(GravityForce::new(vec![], params.gravity)));

    match scene {
        Scene::Block => Block::default().add_particles(&mut s),
        Scene::Sphere => Sphere::default().add_particles(&mut s),
    }

    s
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let params = match &opt.input_file {
        Some(path) => SphParameters::from_json_file(path)?,
        None => SphParameters::default(),
    };
    tracing::debug!(?params, "Loaded parameters");

    let mode = if opt.adaptive {
        StepMode::Adaptive
    } else {
        StepMode::Fixed
    };

    let mut s = build_system(params, opt.solver.build().into(), opt.scene);
    tracing::info!(
        particles = s.particles().len(),
        solver = %opt.solver,
        ?mode,
        "Starting simulation"
    );

    for frame in 0..opt.frames {
        for _ in 0..opt.steps_per_frame {
            s.step(mode);
        }

        if s.state().iter().any(|x| !x.is_finite()) {
            return Err(eyre::eyre!(
                "Simulation diverged in frame {} at t = {}",
                frame,
                s.total_time()
            ));
        }

        tracing::info!(
            frame,
            t = s.total_time(),
            dt = s.dt(),
            energy = s.total_energy(),
            volume = s.total_volume(),
            momentum = ?s.total_linear_momentum(),
            "Finished frame"
        );
    }

    Ok(())
}
