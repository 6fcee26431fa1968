use itertools::iproduct;
use tracing::debug;

use crate::config::constant::{AVG_DISTANCE_WEIGHT, EPSILON};
use crate::domain::types::{FacilityOption, ProblemInstance};

/// Score every (site, tier) combination and return them ranked, best
/// (lowest cost-benefit) first.
///
/// The score amortizes fixed cost per unit capacity and adds a
/// down-weighted average-distance proxy for the variable cost a facility
/// at this site would incur. Zero-capacity tiers are skipped rather than
/// dividing by zero.
pub fn rank_facility_options(instance: &ProblemInstance) -> Vec<FacilityOption> {
    let site_count = instance.facility_points.len();
    let mut options: Vec<FacilityOption> =
        iproduct!(0..site_count, instance.tiers.iter().enumerate())
            .filter(|(_, (_, tier))| tier.capacity > EPSILON)
            .map(|(site_idx, (tier_idx, tier))| {
                let avg_distance = average_distance_to_site(instance, site_idx);
                let cost_per_capacity = tier.fixed_cost / tier.capacity;
                let estimated_var_cost = avg_distance * instance.distance_cost_factor;
                FacilityOption {
                    site_idx,
                    tier_idx,
                    capacity: tier.capacity,
                    fixed_cost: tier.fixed_cost,
                    cost_benefit: cost_per_capacity + estimated_var_cost * AVG_DISTANCE_WEIGHT,
                    avg_distance,
                }
            })
            .collect();

    // Stable sort: ties keep enumeration order (site-major, tier-minor).
    options.sort_by(|a, b| a.cost_benefit.total_cmp(&b.cost_benefit));

    debug!("Ranked {} facility options", options.len());
    options
}

/// Mean distance from a site to all demand points; 0 when there are none.
fn average_distance_to_site(instance: &ProblemInstance, site_idx: usize) -> f64 {
    if instance.demand_points.is_empty() {
        return 0.0;
    }
    let sum: f64 = instance
        .distance_matrix
        .iter()
        .map(|row| row[site_idx])
        .sum();
    sum / instance.demand_points.len() as f64
}
