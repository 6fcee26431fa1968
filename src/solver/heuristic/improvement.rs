use tracing::debug;

use crate::config::constant::{EPSILON, UTILIZATION_THRESHOLD};
use crate::domain::types::{ProblemInstance, SolverState};

/// Try to close facilities running under the utilization threshold.
///
/// A closure needs a single other open facility whose spare capacity can
/// absorb the whole load. The load is actually moved: the closed
/// facility's assignment records transfer to the absorber and its
/// `used_capacity` grows by the moved amount. Among feasible absorbers
/// the one with the smallest variable-cost increase is chosen (ties go
/// to the lower site index), and the closure is only taken when that
/// increase stays below the fixed cost saved, so the objective never
/// goes up.
pub fn improve(instance: &ProblemInstance, state: &mut SolverState) {
    let candidates: Vec<usize> = state
        .opened
        .iter()
        .filter(|(_, facility)| facility.utilization() < UTILIZATION_THRESHOLD)
        .map(|(&site_idx, _)| site_idx)
        .collect();

    for site_idx in candidates {
        try_close(instance, state, site_idx);
    }
}

fn try_close(instance: &ProblemInstance, state: &mut SolverState, site_idx: usize) {
    let Some(facility) = state.opened.get(&site_idx) else {
        return;
    };
    let load = facility.used_capacity;
    let fixed_cost_saved = facility.fixed_cost;
    let records = state.assignments.get(&site_idx).cloned().unwrap_or_default();

    // Cost of re-serving each moved slice from the absorber instead.
    let variable_delta = |absorber_idx: usize| -> f64 {
        records
            .iter()
            .map(|&(demand_idx, amount)| {
                let old = instance.distance_matrix[demand_idx][site_idx];
                let new = instance.distance_matrix[demand_idx][absorber_idx];
                (new - old) * instance.distance_cost_factor * amount
            })
            .sum()
    };

    let mut best: Option<(usize, f64)> = None;
    for (&other_idx, other) in &state.opened {
        if other_idx == site_idx {
            continue;
        }
        if other.spare_capacity() + EPSILON < load {
            continue;
        }
        let delta = variable_delta(other_idx);
        if best.map_or(true, |(_, best_delta)| delta < best_delta) {
            best = Some((other_idx, delta));
        }
    }

    let Some((absorber_idx, delta)) = best else {
        return;
    };
    if delta > fixed_cost_saved + EPSILON {
        debug!(
            "Keeping low-utilization site {}: moving its load would cost {:.2} \
             against {:.2} fixed savings",
            instance.facility_points[site_idx].id, delta, fixed_cost_saved
        );
        return;
    }

    // Commit: move the records, grow the absorber, drop the facility.
    let moved: f64 = records.iter().map(|&(_, amount)| amount).sum();
    state.assignments.remove(&site_idx);
    state
        .assignments
        .entry(absorber_idx)
        .or_default()
        .extend(records);
    if let Some(absorber) = state.opened.get_mut(&absorber_idx) {
        absorber.used_capacity += moved;
    }
    state.total_fixed_cost -= fixed_cost_saved;
    state.opened.remove(&site_idx);

    debug!(
        "Closed low-utilization site {} ({:.1} demand moved to {}), saving {:.2}",
        instance.facility_points[site_idx].id,
        moved,
        instance.facility_points[absorber_idx].id,
        fixed_cost_saved - delta
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DemandPoint, FacilitySite, FacilityTier};

    fn instance(
        demand: Vec<(f64, f64, f64)>,
        sites: Vec<(f64, f64)>,
        tiers: Vec<FacilityTier>,
    ) -> ProblemInstance {
        let demand_points: Vec<DemandPoint> = demand
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, d))| DemandPoint {
                id: format!("{}", i + 1),
                x,
                y,
                demand: d,
            })
            .collect();
        let facility_points: Vec<FacilitySite> = sites
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| FacilitySite {
                id: format!("S{}", i + 1),
                x,
                y,
            })
            .collect();
        let distance_matrix = crate::distance::matrix::create_dm(&demand_points, &facility_points);
        ProblemInstance {
            demand_points,
            facility_points,
            distance_matrix,
            tiers,
            distance_cost_factor: 1.0,
        }
    }

    /// Two nearby sites; site 1 runs at 10%, site 0 has plenty of spare.
    fn low_utilization_state(inst: &ProblemInstance) -> SolverState {
        let mut state = SolverState::new(inst);
        state.open_facility(0, 0, 200.0, 1000.0);
        state.record_assignments(0, &[(0, 100.0)]);
        state.open_facility(1, 0, 200.0, 1000.0);
        state.record_assignments(1, &[(1, 20.0)]);
        state.remaining_demand = vec![0.0, 0.0];
        state
    }

    #[test]
    fn closes_and_reassigns_a_low_utilization_facility() {
        let inst = instance(
            vec![(0.0, 0.0, 100.0), (1.0, 0.0, 20.0)],
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![FacilityTier::new("only", 200.0, 1000.0)],
        );
        let mut state = low_utilization_state(&inst);

        improve(&inst, &mut state);

        assert_eq!(state.opened.len(), 1);
        assert!(state.opened.contains_key(&0));
        // Fixed cost drops by exactly the closed facility's cost.
        assert!((state.total_fixed_cost - 1000.0).abs() < EPSILON);
        // The load really moved.
        assert!((state.opened[&0].used_capacity - 120.0).abs() < EPSILON);
        let moved: f64 = state.assignments[&0].iter().map(|&(_, a)| a).sum();
        assert!((moved - 120.0).abs() < EPSILON);
        assert!(!state.assignments.contains_key(&1));
    }

    #[test]
    fn keeps_facility_when_no_absorber_has_room() {
        let inst = instance(
            vec![(0.0, 0.0, 195.0), (1.0, 0.0, 20.0)],
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![FacilityTier::new("only", 200.0, 1000.0)],
        );
        let mut state = SolverState::new(&inst);
        state.open_facility(0, 0, 200.0, 1000.0);
        state.record_assignments(0, &[(0, 195.0)]);
        state.open_facility(1, 0, 200.0, 1000.0);
        state.record_assignments(1, &[(1, 20.0)]);
        state.remaining_demand = vec![0.0, 0.0];

        improve(&inst, &mut state);

        // Spare at site 0 is 5 < 20, nothing can close.
        assert_eq!(state.opened.len(), 2);
        assert!((state.total_fixed_cost - 2000.0).abs() < EPSILON);
    }

    #[test]
    fn keeps_facility_when_move_costs_more_than_it_saves() {
        // The only absorber is 10_000 units away: moving 20 units costs
        // ~200_000 in variable cost against 1000 of fixed savings.
        let inst = instance(
            vec![(0.0, 0.0, 100.0), (10_000.0, 0.0, 20.0)],
            vec![(0.0, 0.0), (10_000.0, 0.0)],
            vec![FacilityTier::new("only", 200.0, 1000.0)],
        );
        let mut state = low_utilization_state(&inst);

        improve(&inst, &mut state);

        assert_eq!(state.opened.len(), 2);
        assert!((state.total_fixed_cost - 2000.0).abs() < EPSILON);
    }

    #[test]
    fn well_utilized_facilities_are_left_alone() {
        let inst = instance(
            vec![(0.0, 0.0, 100.0), (1.0, 0.0, 80.0)],
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![FacilityTier::new("only", 200.0, 1000.0)],
        );
        let mut state = SolverState::new(&inst);
        state.open_facility(0, 0, 200.0, 1000.0);
        state.record_assignments(0, &[(0, 100.0)]);
        state.open_facility(1, 0, 200.0, 1000.0);
        state.record_assignments(1, &[(1, 80.0)]);
        state.remaining_demand = vec![0.0, 0.0];

        improve(&inst, &mut state);

        assert_eq!(state.opened.len(), 2);
    }

    #[test]
    fn capacity_is_respected_after_the_move() {
        let inst = instance(
            vec![(0.0, 0.0, 100.0), (1.0, 0.0, 20.0)],
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![FacilityTier::new("only", 200.0, 1000.0)],
        );
        let mut state = low_utilization_state(&inst);

        improve(&inst, &mut state);

        for facility in state.opened.values() {
            assert!(facility.used_capacity <= facility.capacity + EPSILON);
        }
    }
}
