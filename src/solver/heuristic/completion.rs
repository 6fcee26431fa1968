use tracing::{debug, warn};

use crate::config::constant::EPSILON;
use crate::domain::types::{FacilityOption, ProblemInstance, SolverState};
use crate::solver::heuristic::assignment::assign_demand_to_facility;

/// Second pass over the ranked options, run when construction left
/// demand uncovered.
///
/// Already-open sites contribute their spare capacity (always measured
/// against the tier they were opened at, whatever tier the visiting
/// option carries); unopened sites are opened under the same
/// only-pay-when-used rule as construction. Stops as soon as total
/// remaining demand drops within tolerance. If the option list runs out
/// first, the residual is left in `state.remaining_demand` for assembly
/// to surface as unserved demand.
pub fn complete(
    instance: &ProblemInstance,
    options: &[FacilityOption],
    state: &mut SolverState,
) {
    let mut total_remaining = state.total_remaining();
    if total_remaining <= EPSILON {
        return;
    }
    debug!(
        "Coverage completion pass: {:.2} demand still unmet",
        total_remaining
    );

    for option in options {
        match state.opened.get(&option.site_idx) {
            Some(facility) => {
                let spare = facility.spare_capacity();
                if spare <= EPSILON {
                    continue;
                }
                let assigned = assign_demand_to_facility(
                    option.site_idx,
                    spare,
                    &mut state.remaining_demand,
                    &instance.distance_matrix,
                );
                if !assigned.is_empty() {
                    state.record_assignments(option.site_idx, &assigned);
                }
            }
            None => {
                let assigned = assign_demand_to_facility(
                    option.site_idx,
                    option.capacity,
                    &mut state.remaining_demand,
                    &instance.distance_matrix,
                );
                if !assigned.is_empty() {
                    state.open_facility(
                        option.site_idx,
                        option.tier_idx,
                        option.capacity,
                        option.fixed_cost,
                    );
                    state.record_assignments(option.site_idx, &assigned);
                }
            }
        }

        total_remaining = state.total_remaining();
        if total_remaining <= EPSILON {
            return;
        }
    }

    warn!(
        "Option list exhausted with {:.2} demand unserved; instance is infeasible",
        total_remaining
    );
}
