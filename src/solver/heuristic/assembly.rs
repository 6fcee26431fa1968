use std::collections::BTreeMap;

use crate::config::constant::EPSILON;
use crate::domain::solution::{AssignmentRecord, OpenedFacilitySummary, Solution};
use crate::domain::types::{ProblemInstance, SolverState};

/// Flatten the solver bookkeeping into the external solution schema.
///
/// Pure: called once after construction+completion and again after the
/// improvement pass, since the opened-facility set may have changed in
/// between. Variable cost is recomputed from scratch here; the fixed
/// total is carried by the state.
pub fn assemble(instance: &ProblemInstance, state: &SolverState) -> Solution {
    let facilities_opened: Vec<OpenedFacilitySummary> = state
        .opened
        .iter()
        .map(|(&site_idx, facility)| {
            let site = &instance.facility_points[site_idx];
            OpenedFacilitySummary {
                location: site.id.clone(),
                tier: instance.tiers[facility.tier_idx].name.clone(),
                coordinates: (site.x, site.y),
                fixed_cost: facility.fixed_cost,
            }
        })
        .collect();

    // Every demand id gets an entry, assigned or not.
    let mut assignments: BTreeMap<String, Vec<AssignmentRecord>> = instance
        .demand_points
        .iter()
        .map(|point| (point.id.clone(), Vec::new()))
        .collect();

    let mut total_variable_cost = 0.0;
    for (&site_idx, site_assignments) in &state.assignments {
        let facility_id = &instance.facility_points[site_idx].id;
        for &(demand_idx, assigned_amount) in site_assignments {
            let point = &instance.demand_points[demand_idx];
            let distance = instance.distance_matrix[demand_idx][site_idx];
            let variable_cost = distance * instance.distance_cost_factor * assigned_amount;
            total_variable_cost += variable_cost;

            let fraction = if point.demand > EPSILON {
                assigned_amount / point.demand
            } else {
                0.0
            };
            assignments
                .entry(point.id.clone())
                .or_default()
                .push(AssignmentRecord {
                    facility: facility_id.clone(),
                    fraction,
                    assigned_demand: assigned_amount,
                    variable_cost,
                });
        }
    }

    let unserved_demand = state.total_remaining();
    let status = if unserved_demand > EPSILON {
        "infeasible"
    } else {
        "heuristic"
    };

    Solution {
        status: status.to_string(),
        solver_name: "heuristic".to_string(),
        facilities_opened,
        assignments,
        total_fixed_cost: state.total_fixed_cost,
        total_variable_cost,
        objective_value: state.total_fixed_cost + total_variable_cost,
        unserved_demand,
        processing_time: 0.0,
        gap: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DemandPoint, FacilitySite, FacilityTier};

    fn instance() -> ProblemInstance {
        let demand_points = vec![
            DemandPoint {
                id: "1".to_string(),
                x: 0.0,
                y: 0.0,
                demand: 100.0,
            },
            DemandPoint {
                id: "2".to_string(),
                x: 10.0,
                y: 0.0,
                demand: 40.0,
            },
        ];
        let facility_points = vec![
            FacilitySite {
                id: "A".to_string(),
                x: 5.0,
                y: 0.0,
            },
            FacilitySite {
                id: "B".to_string(),
                x: 10.0,
                y: 0.0,
            },
        ];
        let distance_matrix = crate::distance::matrix::create_dm(&demand_points, &facility_points);
        ProblemInstance {
            demand_points,
            facility_points,
            distance_matrix,
            tiers: vec![FacilityTier::new("only", 150.0, 2000.0)],
            distance_cost_factor: 2.0,
        }
    }

    #[test]
    fn flattens_state_into_the_solution_schema() {
        let inst = instance();
        let mut state = SolverState::new(&inst);
        state.open_facility(0, 0, 150.0, 2000.0);
        state.record_assignments(0, &[(0, 100.0), (1, 40.0)]);
        state.remaining_demand = vec![0.0, 0.0];

        let solution = assemble(&inst, &state);

        assert_eq!(solution.facilities_opened.len(), 1);
        let facility = &solution.facilities_opened[0];
        assert_eq!(facility.location, "A");
        assert_eq!(facility.tier, "only");
        assert_eq!(facility.coordinates, (5.0, 0.0));

        // dist(1,A)=5, factor 2: 5*2*100 = 1000; dist(2,A)=5: 5*2*40 = 400.
        assert!((solution.total_variable_cost - 1400.0).abs() < 1e-9);
        assert!((solution.objective_value - 3400.0).abs() < 1e-9);
        assert_eq!(solution.status, "heuristic");
        assert!(solution.is_feasible());

        let records = &solution.assignments["1"];
        assert_eq!(records.len(), 1);
        assert!((records[0].fraction - 1.0).abs() < 1e-9);
        assert!((records[0].variable_cost - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn objective_is_exactly_fixed_plus_variable() {
        let inst = instance();
        let mut state = SolverState::new(&inst);
        state.open_facility(1, 0, 150.0, 2000.0);
        state.record_assignments(1, &[(1, 40.0)]);
        state.remaining_demand = vec![100.0, 0.0];

        let solution = assemble(&inst, &state);
        assert_eq!(
            solution.objective_value,
            solution.total_fixed_cost + solution.total_variable_cost
        );
    }

    #[test]
    fn unserved_demand_marks_the_solution_infeasible() {
        let inst = instance();
        let mut state = SolverState::new(&inst);
        state.open_facility(1, 0, 150.0, 2000.0);
        state.record_assignments(1, &[(1, 40.0)]);
        state.remaining_demand = vec![100.0, 0.0];

        let solution = assemble(&inst, &state);
        assert_eq!(solution.status, "infeasible");
        assert!((solution.unserved_demand - 100.0).abs() < 1e-9);
        assert!(!solution.is_feasible());
        // Unassigned points still appear, with empty record lists.
        assert!(solution.assignments["1"].is_empty());
    }

    #[test]
    fn empty_state_yields_a_degenerate_but_well_formed_solution() {
        let inst = ProblemInstance {
            demand_points: vec![],
            facility_points: vec![],
            distance_matrix: vec![],
            tiers: vec![],
            distance_cost_factor: 1.0,
        };
        let state = SolverState::new(&inst);

        let solution = assemble(&inst, &state);
        assert!(solution.facilities_opened.is_empty());
        assert!(solution.assignments.is_empty());
        assert_eq!(solution.objective_value, 0.0);
        assert_eq!(solution.status, "heuristic");
    }
}
