pub mod config;
pub mod data;
pub mod distance;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod setup;
pub mod solver;
