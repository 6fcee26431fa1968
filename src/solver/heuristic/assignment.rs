use crate::config::constant::EPSILON;

/// Assign as much unmet demand to one site as `available_capacity`
/// allows, nearest demand points first.
///
/// Walks points with remaining demand in ascending distance to the site
/// and gives each `min(remaining, available)` until capacity runs out.
/// `remaining_demand` is decremented in place; the returned pairs are
/// (demand index, assigned amount). Empty when nothing was assignable.
pub fn assign_demand_to_facility(
    site_idx: usize,
    mut available_capacity: f64,
    remaining_demand: &mut [f64],
    distance_matrix: &[Vec<f64>],
) -> Vec<(usize, f64)> {
    if available_capacity <= EPSILON {
        return vec![];
    }

    let mut demand_distances: Vec<(usize, f64)> = remaining_demand
        .iter()
        .enumerate()
        .filter(|(_, &rem)| rem > EPSILON)
        .map(|(i, _)| (i, distance_matrix[i][site_idx]))
        .collect();
    // Stable sort: equidistant points keep input order.
    demand_distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut assignments = Vec::new();
    for (i, _distance) in demand_distances {
        if available_capacity <= EPSILON {
            break;
        }

        let assign_amount = remaining_demand[i].min(available_capacity);
        remaining_demand[i] -= assign_amount;
        available_capacity -= assign_amount;
        assignments.push((i, assign_amount));
    }

    assignments
}
