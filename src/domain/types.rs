use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A point that generates demand. Immutable input.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DemandPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub demand: f64,
}

/// A candidate location where a facility may be built. Immutable input.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FacilitySite {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// A discrete capacity/cost configuration a site can be built as.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityTier {
    pub name: String,
    pub capacity: f64,
    pub fixed_cost: f64,
}

impl FacilityTier {
    pub fn new(name: &str, capacity: f64, fixed_cost: f64) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            fixed_cost,
        }
    }
}

/// A scored (site, tier) pair. Lives only during ranking; recomputed per
/// solve.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityOption {
    pub site_idx: usize,
    pub tier_idx: usize,
    pub capacity: f64,
    pub fixed_cost: f64,
    /// Lower is better.
    pub cost_benefit: f64,
    /// Mean distance from this site to all demand points.
    pub avg_distance: f64,
}

/// Run-time record for a site that has been opened at some tier.
/// At most one per site.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedFacility {
    pub tier_idx: usize,
    pub capacity: f64,
    pub used_capacity: f64,
    pub fixed_cost: f64,
}

impl OpenedFacility {
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.used_capacity / self.capacity
    }

    pub fn spare_capacity(&self) -> f64 {
        self.capacity - self.used_capacity
    }
}

#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub demand_points: Vec<DemandPoint>,
    pub facility_points: Vec<FacilitySite>,
    /// `distance_matrix[i][j]` = distance from demand point i to site j.
    pub distance_matrix: Vec<Vec<f64>>,
    pub tiers: Vec<FacilityTier>,
    pub distance_cost_factor: f64,
}

impl ProblemInstance {
    pub fn total_demand(&self) -> f64 {
        self.demand_points.iter().map(|p| p.demand).sum()
    }
}

/// Mutable bookkeeping threaded through the solver phases
/// (constructing -> completing -> improving). Assembly flattens it into
/// the external `Solution`. Maps are keyed by site index so iteration
/// order is stable across runs.
#[derive(Debug, Clone)]
pub struct SolverState {
    pub opened: BTreeMap<usize, OpenedFacility>,
    /// Unmet demand per demand point, indexed like `demand_points`.
    pub remaining_demand: Vec<f64>,
    /// Per opened site: list of (demand index, assigned amount).
    pub assignments: BTreeMap<usize, Vec<(usize, f64)>>,
    pub total_fixed_cost: f64,
}

impl SolverState {
    pub fn new(instance: &ProblemInstance) -> Self {
        Self {
            opened: BTreeMap::new(),
            remaining_demand: instance.demand_points.iter().map(|p| p.demand).collect(),
            assignments: BTreeMap::new(),
            total_fixed_cost: 0.0,
        }
    }

    pub fn total_remaining(&self) -> f64 {
        self.remaining_demand.iter().sum()
    }

    /// Open `site_idx` at the given tier and record the assignments the
    /// greedy pass produced for it.
    pub fn open_facility(
        &mut self,
        site_idx: usize,
        tier_idx: usize,
        capacity: f64,
        fixed_cost: f64,
    ) {
        self.opened.insert(
            site_idx,
            OpenedFacility {
                tier_idx,
                capacity,
                used_capacity: 0.0,
                fixed_cost,
            },
        );
        self.total_fixed_cost += fixed_cost;
    }

    pub fn record_assignments(&mut self, site_idx: usize, assigned: &[(usize, f64)]) {
        let facility = self
            .opened
            .get_mut(&site_idx)
            .expect("assignments recorded against a site that was never opened");
        let entries = self.assignments.entry(site_idx).or_default();
        for &(demand_idx, amount) in assigned {
            facility.used_capacity += amount;
            entries.push((demand_idx, amount));
        }
    }
}
