use tracing::debug;

use crate::domain::types::{FacilityOption, ProblemInstance, SolverState};
use crate::solver::heuristic::assignment::assign_demand_to_facility;

/// First greedy pass: walk the ranked options and open facilities while
/// demand remains.
///
/// The first option seen for a site wins its tier; later options for the
/// same site are skipped. A facility is materialized (and its fixed cost
/// paid) only if the greedy assignment actually placed demand on it.
pub fn construct(
    instance: &ProblemInstance,
    options: &[FacilityOption],
    state: &mut SolverState,
) {
    for option in options {
        if state.opened.contains_key(&option.site_idx) {
            continue;
        }

        let assigned = assign_demand_to_facility(
            option.site_idx,
            option.capacity,
            &mut state.remaining_demand,
            &instance.distance_matrix,
        );
        if assigned.is_empty() {
            continue;
        }

        state.open_facility(
            option.site_idx,
            option.tier_idx,
            option.capacity,
            option.fixed_cost,
        );
        state.record_assignments(option.site_idx, &assigned);

        debug!(
            "Opened site {} as tier '{}' with {:.1} demand assigned",
            instance.facility_points[option.site_idx].id,
            instance.tiers[option.tier_idx].name,
            assigned.iter().map(|&(_, a)| a).sum::<f64>()
        );
    }
}
