pub mod assembly;
pub mod assignment;
pub mod completion;
pub mod construction;
pub mod improvement;
pub mod ranking;
pub mod solve;

pub use solve::HeuristicSolver;
