use crate::types::LanguagePolygonMap;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Writes the final artifact: language code -> list of polygons, each an
/// ordered list of [x, y] pairs.
pub fn write_language_polygons(
    path: &Path,
    language_polygons: &LanguagePolygonMap,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &coordinate_pairs(language_polygons))
        .context("Failed to serialize language polygons")?;

    Ok(())
}

fn coordinate_pairs(
    language_polygons: &LanguagePolygonMap,
) -> BTreeMap<&String, Vec<Vec<[f64; 2]>>> {
    language_polygons
        .iter()
        .map(|(language, polygons)| {
            let polygons = polygons
                .iter()
                .map(|polygon| polygon.iter().map(|c| [c.x, c.y]).collect())
                .collect();
            (language, polygons)
        })
        .collect()
}
