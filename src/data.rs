use crate::config::AppConfig;
use crate::types::{BoundaryFeature, LanguageFractions};
use anyhow::{anyhow, Context, Result};
use geo::MultiPolygon;
use geojson::GeoJson;
use shapefile::Reader;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

pub fn load_boundaries(config: &AppConfig) -> Result<Vec<BoundaryFeature>> {
    println!("Loading boundary data...");

    let path = &config.input.boundary_file;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s: &str| s.to_lowercase())
        .ok_or_else(|| anyhow!("Boundary file has no extension"))?;

    let features = match extension.as_str() {
        "shp" => load_shapefile(path)?,
        "json" | "geojson" => load_geojson(path)?,
        _ => return Err(anyhow!("Unsupported boundary format: {}", extension)),
    };

    println!("Loaded {} country features", features.len());

    Ok(features)
}

fn load_shapefile(path: &Path) -> Result<Vec<BoundaryFeature>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open Shapefile: {:?}", path))?;

    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let name = match string_field(&record, "NAME") {
            Some(name) => name,
            None => {
                warn!("Skipping feature without a NAME field");
                continue;
            }
        };
        let code = match string_field(&record, "ISO_A3") {
            Some(code) => code,
            None => {
                warn!("Skipping {}: no ISO_A3 field", name);
                continue;
            }
        };

        let geometry = match shape {
            shapefile::Shape::Polygon(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e))?;
                geo_polygon
            }
            shapefile::Shape::PolygonM(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e))?;
                geo_polygon
            }
            shapefile::Shape::PolygonZ(polygon) => {
                let geo_polygon: MultiPolygon<f64> = polygon
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e))?;
                geo_polygon
            }
            _ => {
                warn!("Unsupported geometry type for {}", name);
                continue;
            }
        };

        features.push(BoundaryFeature { code, name, geometry });
    }

    Ok(features)
}

fn string_field(record: &shapefile::dbase::Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(shapefile::dbase::FieldValue::Character(Some(s))) => Some(s.clone()),
        _ => None,
    }
}

fn load_geojson(path: &Path) -> Result<Vec<BoundaryFeature>> {
    println!("Loading GeoJSON from {:?}...", path);
    let file =
        File::open(path).with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let reader = BufReader::new(file);

    // Parses the whole file into memory.
    let geojson = GeoJson::from_reader(reader).context("Failed to parse GeoJSON")?;
    features_from_geojson(geojson)
}

pub(crate) fn features_from_geojson(geojson: GeoJson) -> Result<Vec<BoundaryFeature>> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut features = Vec::new();

    for feature in collection.features {
        let name = match property_string(&feature, "NAME") {
            Some(name) => name,
            None => {
                warn!("Skipping feature without a NAME property");
                continue;
            }
        };
        let code = match property_string(&feature, "ISO_A3") {
            Some(code) => code,
            None => {
                warn!("Skipping {}: no ISO_A3 property", name);
                continue;
            }
        };

        let geometry = match feature.geometry {
            Some(geometry) => {
                let valid_geo: geo::Geometry<f64> = geometry
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;

                match valid_geo {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => {
                        warn!("Unsupported geometry type for {}", name);
                        continue;
                    }
                }
            }
            None => continue,
        };

        features.push(BoundaryFeature { code, name, geometry });
    }

    Ok(features)
}

fn property_string(feature: &geojson::Feature, key: &str) -> Option<String> {
    match feature.properties.as_ref().and_then(|props| props.get(key)) {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Loads the externally computed country -> language -> fraction table.
pub fn load_language_distribution(
    path: &Path,
) -> Result<BTreeMap<String, LanguageFractions>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open language distribution: {:?}", path))?;
    let reader = BufReader::new(file);
    let distribution = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse language distribution: {:?}", path))?;
    Ok(distribution)
}
