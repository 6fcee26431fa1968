use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CflpError {
    #[error("failed to read points file {path}: {source}")]
    PointsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid points JSON: {0}")]
    PointsJson(#[from] serde_json::Error),

    #[error("distance matrix is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    MatrixShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("demand point {id} has negative demand {demand}")]
    NegativeDemand { id: String, demand: f64 },
}
