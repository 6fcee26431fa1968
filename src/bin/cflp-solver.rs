use cflp::solver::heuristic::solve;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    solve::run()
}
