use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::types::{DemandPoint, FacilitySite};
use crate::error::CflpError;

/// Struct to match the point-file JSON structure. `numeric_points` carry
/// demand, `alpha_points` are candidate facility locations.
#[derive(Debug, Deserialize)]
struct MapPoints {
    #[serde(default)]
    numeric_points: Vec<DemandPoint>,
    #[serde(default)]
    alpha_points: Vec<FacilitySite>,
}

/// Parse a point file's contents. Missing keys default to empty lists so
/// a demand-only or site-only file still loads.
pub fn parse_points(raw: &str) -> Result<(Vec<DemandPoint>, Vec<FacilitySite>), CflpError> {
    let points: MapPoints = serde_json::from_str(raw)?;
    Ok((points.numeric_points, points.alpha_points))
}

/// Load demand and facility points from the JSON file.
pub fn load_points(path: &Path) -> Result<(Vec<DemandPoint>, Vec<FacilitySite>), CflpError> {
    let raw = fs::read_to_string(path).map_err(|source| CflpError::PointsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let (demand_points, facility_points) = parse_points(&raw)?;
    info!(
        "Loaded {} demand points and {} facility location points from {}",
        demand_points.len(),
        facility_points.len(),
        path.display()
    );

    Ok((demand_points, facility_points))
}
