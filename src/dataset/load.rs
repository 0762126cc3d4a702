use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::types::Dataset;

const SAMPLE_DATASET: &str = include_str!("../../demos/sample.json");

/// Reads a graph snapshot from `path`, or the bundled sample when no path is
/// given.
pub fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    let Some(path) = path else {
        return Dataset::from_json_str(SAMPLE_DATASET).context("bundled sample dataset is invalid");
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let dataset = Dataset::from_json_str(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;

    info!(
        path = %path.display(),
        nodes = dataset.nodes.len(),
        links = dataset.links.len(),
        "dataset loaded"
    );
    Ok(dataset)
}
