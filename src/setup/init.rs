use tracing::{info, warn};

use crate::config::constant::EPSILON;
use crate::distance::matrix::create_dm;
use crate::domain::types::{DemandPoint, FacilitySite, FacilityTier, ProblemInstance};
use crate::error::CflpError;

/// Build a validated `ProblemInstance`: computes the distance matrix,
/// rejects negative demands, and logs the demand/capacity balance.
pub fn setup(
    demand_points: Vec<DemandPoint>,
    facility_points: Vec<FacilitySite>,
    tiers: Vec<FacilityTier>,
    distance_cost_factor: f64,
) -> Result<ProblemInstance, CflpError> {
    info!(
        "Starting setup with {} demand points, {} sites, {} tiers",
        demand_points.len(),
        facility_points.len(),
        tiers.len()
    );

    for point in &demand_points {
        if point.demand < 0.0 {
            return Err(CflpError::NegativeDemand {
                id: point.id.clone(),
                demand: point.demand,
            });
        }
    }

    let distance_matrix = create_dm(&demand_points, &facility_points);

    let instance = ProblemInstance {
        demand_points,
        facility_points,
        distance_matrix,
        tiers,
        distance_cost_factor,
    };
    validate_matrix(&instance)?;

    let total_demand = instance.total_demand();
    // One tier per site, so the most any site can contribute is its
    // largest tier capacity.
    let max_capacity: f64 = instance
        .tiers
        .iter()
        .map(|t| t.capacity)
        .fold(0.0, f64::max)
        * instance.facility_points.len() as f64;
    if max_capacity + EPSILON < total_demand {
        warn!(
            "Total demand ({:.1}) exceeds maximum openable capacity ({:.1}); \
             the solver will report unserved demand",
            total_demand, max_capacity
        );
    }

    info!("Setup completed successfully");
    Ok(instance)
}

/// A matrix passed in from outside must line up with the point lists:
/// one row per demand point, one column per site.
pub fn validate_matrix(instance: &ProblemInstance) -> Result<(), CflpError> {
    let expected_rows = instance.demand_points.len();
    let expected_cols = instance.facility_points.len();

    let rows = instance.distance_matrix.len();
    if rows != expected_rows {
        return Err(CflpError::MatrixShape {
            rows,
            cols: 0,
            expected_rows,
            expected_cols,
        });
    }
    for row in &instance.distance_matrix {
        if row.len() != expected_cols {
            return Err(CflpError::MatrixShape {
                rows,
                cols: row.len(),
                expected_rows,
                expected_cols,
            });
        }
    }
    Ok(())
}
