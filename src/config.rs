use crate::domain::types::FacilityTier;

pub mod constant {
    /// Tolerance below which floating residues are treated as zero.
    pub const EPSILON: f64 = 1e-6;
    /// Facilities below this utilization are candidates for closure.
    pub const UTILIZATION_THRESHOLD: f64 = 0.3;
    /// Weight of the average-distance proxy in the cost-benefit score.
    /// Small because the average is a rough estimate, not the true
    /// assignment cost.
    pub const AVG_DISTANCE_WEIGHT: f64 = 0.1;
    pub const DISTANCE_COST_FACTOR: f64 = 1.0;

    pub(crate) const POINTS_JSON_PATH: &str = "map_points.json";
    pub(crate) const SOLUTION_JSON_PATH: &str = "solution.json";
    pub(crate) const ASSIGNMENTS_CSV_PATH: &str = "assignments.csv";

    pub(crate) const SEED: usize = 64;
    pub(crate) const FIXTURE_DEMAND_COUNT: usize = 30;
    pub(crate) const FIXTURE_SITE_COUNT: usize = 8;
}

/// The tier catalog known at configuration time. Capacities are demand
/// units, fixed costs are currency units.
pub fn default_tiers() -> Vec<FacilityTier> {
    vec![
        FacilityTier::new("small", 370.0, 90_000.0),
        FacilityTier::new("medium", 550.0, 110_000.0),
        FacilityTier::new("large", 700.0, 140_000.0),
    ]
}
