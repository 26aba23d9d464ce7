//! Android density buckets and the launcher icon size for each.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// One resource folder and the pixel size of the launcher icon it holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Density {
    pub folder: String,
    pub size: u32,
}

const DEFAULT_DENSITIES_JSON: &str = r#"
[
  { "folder": "mipmap-mdpi", "size": 48 },
  { "folder": "mipmap-hdpi", "size": 72 },
  { "folder": "mipmap-xhdpi", "size": 96 },
  { "folder": "mipmap-xxhdpi", "size": 144 },
  { "folder": "mipmap-xxxhdpi", "size": 192 }
]
"#;

/// The five standard launcher icon tiers, mdpi through xxxhdpi.
pub fn default_densities() -> Result<Vec<Density>> {
    parse_densities(DEFAULT_DENSITIES_JSON).context("Built-in density table is invalid")
}

/// Load a density table from a JSON file holding an array of
/// `{ "folder": ..., "size": ... }` objects.
pub fn load_densities(path: &Path) -> Result<Vec<Density>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read density table {}", path.display()))?;
    parse_densities(&json)
        .with_context(|| format!("Invalid density table {}", path.display()))
}

pub fn parse_densities(json: &str) -> Result<Vec<Density>> {
    let densities: Vec<Density> =
        serde_json::from_str(json).context("Failed to parse density table JSON")?;

    ensure!(!densities.is_empty(), "Density table is empty");
    for density in &densities {
        ensure!(
            !density.folder.trim().is_empty(),
            "Density folder name must not be empty"
        );
        ensure!(
            density.size > 0,
            "Icon size for {} must be greater than zero",
            density.folder
        );
    }
    Ok(densities)
}
