use tracing::{debug, info};

use crate::domain::types::{DemandPoint, FacilitySite};

pub fn euclidean_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Build the distance matrix consumed by the solver: one row per demand
/// point, one column per facility site.
pub fn create_dm(demand_points: &[DemandPoint], facility_points: &[FacilitySite]) -> Vec<Vec<f64>> {
    let matrix: Vec<Vec<f64>> = demand_points
        .iter()
        .map(|dp| {
            facility_points
                .iter()
                .map(|fp| euclidean_distance(dp.x, dp.y, fp.x, fp.y))
                .collect()
        })
        .collect();

    info!(
        "Calculated distance matrix ({} demand points x {} sites)",
        demand_points.len(),
        facility_points.len()
    );
    matrix
}

// Print distance matrix for debugging
pub fn print_dist_matrix(dist_m: &[Vec<f64>]) {
    debug!("Distance matrix:");
    for row in dist_m {
        debug!("{:?}", row);
    }
}
