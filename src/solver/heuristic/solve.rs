use std::env;
use std::error::Error;
use std::path::Path;
use std::time::Instant;

use dotenv::dotenv;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{
    ASSIGNMENTS_CSV_PATH, DISTANCE_COST_FACTOR, EPSILON, FIXTURE_DEMAND_COUNT, FIXTURE_SITE_COUNT,
    POINTS_JSON_PATH, SOLUTION_JSON_PATH,
};
use crate::config::default_tiers;
use crate::data::loader::load_points;
use crate::distance::matrix::print_dist_matrix;
use crate::domain::solution::Solution;
use crate::domain::types::{ProblemInstance, SolverState};
use crate::fixtures::data_generator::generate_random_points;
use crate::report;
use crate::setup::init::setup;
use crate::solver::heuristic::assembly::assemble;
use crate::solver::heuristic::completion::complete;
use crate::solver::heuristic::construction::construct;
use crate::solver::heuristic::improvement::improve;
use crate::solver::heuristic::ranking::rank_facility_options;

/// Greedy constructive CFLP heuristic with local improvement.
///
/// Phases run in a fixed order over one `SolverState`:
/// rank -> construct -> complete -> assemble -> improve -> assemble.
/// Deterministic: identical inputs give identical solutions.
pub struct HeuristicSolver<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> HeuristicSolver<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    pub fn solve(&self) -> Solution {
        info!("Starting heuristic solution construction");
        let start_time = Instant::now();

        let options = rank_facility_options(self.instance);

        let mut state = SolverState::new(self.instance);
        construct(self.instance, &options, &mut state);

        if state.total_remaining() > EPSILON {
            complete(self.instance, &options, &mut state);
        }

        let before_improvement = assemble(self.instance, &state);
        improve(self.instance, &mut state);

        // Rebuild: the improvement pass may have closed facilities.
        let mut solution = assemble(self.instance, &state);
        let saved = before_improvement.objective_value - solution.objective_value;
        if saved > EPSILON {
            debug!("Local improvement saved {:.2}", saved);
        }

        solution.processing_time = start_time.elapsed().as_secs_f64();
        info!(
            "Heuristic solution found: {} facilities, objective = {:.2}, time = {:.3}s",
            solution.facilities_opened.len(),
            solution.objective_value,
            solution.processing_time
        );
        solution
    }
}

/// Initialize tracing and environment
fn init_tracing_and_env() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    dotenv().ok();
}

pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env();

    let points_path = env::var("CFLP_POINTS_PATH").unwrap_or_else(|_| POINTS_JSON_PATH.to_string());

    let (demand_points, facility_points) = match load_points(Path::new(&points_path)) {
        Ok(points) => points,
        Err(err) => {
            warn!(
                "Could not load {}: {}. Falling back to a generated instance.",
                points_path, err
            );
            generate_random_points(FIXTURE_DEMAND_COUNT, FIXTURE_SITE_COUNT)
        }
    };

    let instance = setup(
        demand_points,
        facility_points,
        default_tiers(),
        DISTANCE_COST_FACTOR,
    )?;
    print_dist_matrix(&instance.distance_matrix);

    let solution = HeuristicSolver::new(&instance).solve();

    report::print_solution(&solution);
    report::save_solution_json(&solution, Path::new(SOLUTION_JSON_PATH))?;
    report::save_assignments_csv(&solution, Path::new(ASSIGNMENTS_CSV_PATH))?;

    Ok(())
}
