use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::constant::SEED;
use crate::domain::types::{DemandPoint, FacilitySite};

/// Generates random demand points on a square map.
///
/// Demands are drawn from [50, 250] so a handful of default-catalog
/// facilities can cover a few dozen points.
fn generate_demand_points(count: usize, rng: &mut ChaCha8Rng) -> Vec<DemandPoint> {
    (0..count)
        .map(|i| DemandPoint {
            id: format!("{}", i + 1),
            x: rng.gen_range(0.0..1000.0),
            y: rng.gen_range(0.0..1000.0),
            demand: rng.gen_range(50.0..=250.0),
        })
        .collect()
}

/// Generates random candidate facility sites, labelled A, B, C, ...
fn generate_facility_sites(count: usize, rng: &mut ChaCha8Rng) -> Vec<FacilitySite> {
    (0..count)
        .map(|i| FacilitySite {
            id: site_label(i),
            x: rng.gen_range(0.0..1000.0),
            y: rng.gen_range(0.0..1000.0),
        })
        .collect()
}

fn site_label(index: usize) -> String {
    let mut label = String::new();
    let mut n = index;
    loop {
        label.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    label
}

/// Generate a random problem instance for testing. Seeded, so repeated
/// calls with the same arguments produce identical points.
pub fn generate_random_points(
    demand_count: usize,
    site_count: usize,
) -> (Vec<DemandPoint>, Vec<FacilitySite>) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED as u64);

    let demand_points = generate_demand_points(demand_count, &mut rng);
    let facility_points = generate_facility_sites(site_count, &mut rng);

    let total_demand: f64 = demand_points.iter().map(|p| p.demand).sum();
    info!(
        "Generated {} demand points (total demand {:.1}) and {} candidate sites",
        demand_count, total_demand, site_count
    );

    (demand_points, facility_points)
}
