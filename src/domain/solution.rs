use std::collections::BTreeMap;

use serde::Serialize;

/// One opened facility as reported to callers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenedFacilitySummary {
    pub location: String,
    pub tier: String,
    pub coordinates: (f64, f64),
    pub fixed_cost: f64,
}

/// One slice of a demand point's load served by a facility. A demand
/// point may carry several of these when its load is split.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssignmentRecord {
    pub facility: String,
    /// assigned_demand / original demand of the point.
    pub fraction: f64,
    pub assigned_demand: f64,
    pub variable_cost: f64,
}

/// The externally visible solution schema. Produced by assembly, shared
/// with exact-solver callers for comparison.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Solution {
    pub status: String,
    pub solver_name: String,
    pub facilities_opened: Vec<OpenedFacilitySummary>,
    /// demand id -> assignment records, every demand id present.
    pub assignments: BTreeMap<String, Vec<AssignmentRecord>>,
    pub total_fixed_cost: f64,
    pub total_variable_cost: f64,
    pub objective_value: f64,
    /// Demand left uncovered after the completer exhausted all options.
    /// Zero (within epsilon) for feasible solutions.
    pub unserved_demand: f64,
    pub processing_time: f64,
    /// Optimality gap. Always `None` here: a heuristic has no dual bound.
    pub gap: Option<f64>,
}

impl Solution {
    pub fn is_feasible(&self) -> bool {
        self.unserved_demand <= crate::config::constant::EPSILON
    }

    /// Total demand actually assigned, per demand id.
    pub fn assigned_total(&self, demand_id: &str) -> f64 {
        self.assignments
            .get(demand_id)
            .map(|records| records.iter().map(|r| r.assigned_demand).sum())
            .unwrap_or(0.0)
    }
}
