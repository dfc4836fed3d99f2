use crate::config::AppConfig;
use crate::projection::{self, Crs, Projector};
use crate::sampling;
use crate::seed::{derive_seed, SAMPLING_STREAM};
use crate::triangulation;
use crate::types::{BoundaryFeature, CountryOutcome, SubPolygon};
use anyhow::{Context, Result};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::BooleanOps;
use geo::{Coord, MultiPolygon, Polygon, Rect};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::warn;

/// Runs the per-country subdivision pipeline: exclusion, latitude clipping,
/// CRS reprojection, canvas projection, grid sampling and triangulation.
/// Returns the polygon set per country code together with a per-country
/// outcome record; outline failures are recorded and skipped rather than
/// aborting the run.
pub fn build_country_polygons(
    config: &AppConfig,
    features: Vec<BoundaryFeature>,
) -> Result<(BTreeMap<String, Vec<SubPolygon>>, Vec<CountryOutcome>)> {
    let out = &config.output;
    let crs = Crs::parse(&out.map_projection)?;

    let mut features: Vec<BoundaryFeature> = features
        .into_iter()
        .filter(|feature| !out.excluded_countries.contains(&feature.name))
        .collect();

    if features.is_empty() {
        return Ok((BTreeMap::new(), Vec::new()));
    }

    // Clip against the latitude band while still in lon/lat space. The band
    // spans the dataset's full longitude range.
    if let Some(raw_bounds) = total_bounds(features.iter().map(|f| &f.geometry)) {
        if let Some(band) =
            latitude_band(raw_bounds, out.southernmost_latitude, out.northernmost_latitude)
        {
            for feature in &mut features {
                feature.geometry = if band.0.is_empty() {
                    MultiPolygon::new(Vec::new())
                } else {
                    feature.geometry.intersection(&band)
                };
            }
        }
    }

    for feature in &mut features {
        feature.geometry = projection::reproject(&feature.geometry, crs);
    }
    features.retain(|feature| !feature.geometry.0.is_empty());

    let source_bounds = total_bounds(features.iter().map(|f| &f.geometry))
        .context("No countries left after filtering and clipping")?;
    let projector = Projector::new(source_bounds, out.width, out.height)?;

    let mut country_polygons = BTreeMap::new();
    let mut outcomes = Vec::new();

    for feature in features {
        println!("Processing {}...", feature.name);

        let sampling_seed = derive_seed(out.random_seed, &feature.code, SAMPLING_STREAM);
        let mut rng = StdRng::seed_from_u64(sampling_seed);

        let mut polygons = Vec::new();
        let mut skipped_outlines = Vec::new();

        for part in &feature.geometry.0 {
            // Holes are ignored; only the exterior ring is subdivided.
            let outline = Polygon::new(projector.project_ring(part.exterior()), vec![]);
            let samples = sampling::sample_grid(
                &outline,
                out.grid_length,
                out.grid_relative_std_dev,
                out.min_relative_distance,
                &mut rng,
            );

            match triangulation::triangulate_outline(&outline, &samples) {
                Ok(mut triangles) => polygons.append(&mut triangles),
                Err(e) => {
                    warn!("Skipping outline of {}: {}", feature.name, e);
                    skipped_outlines.push(e.to_string());
                }
            }
        }

        println!("Created {} polygons for {}", polygons.len(), feature.name);
        outcomes.push(CountryOutcome {
            code: feature.code.clone(),
            name: feature.name,
            polygons: polygons.len(),
            skipped_outlines,
        });
        country_polygons.insert(feature.code, polygons);
    }

    Ok((country_polygons, outcomes))
}

fn total_bounds<'a>(
    geometries: impl Iterator<Item = &'a MultiPolygon<f64>>,
) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for geometry in geometries {
        if let Some(rect) = geometry.bounding_rect() {
            bounds = Some(match bounds {
                None => rect,
                Some(acc) => Rect::new(
                    Coord {
                        x: acc.min().x.min(rect.min().x),
                        y: acc.min().y.min(rect.min().y),
                    },
                    Coord {
                        x: acc.max().x.max(rect.max().x),
                        y: acc.max().y.max(rect.max().y),
                    },
                ),
            });
        }
    }
    bounds
}

fn latitude_band(
    bounds: Rect<f64>,
    southernmost: Option<f64>,
    northernmost: Option<f64>,
) -> Option<MultiPolygon<f64>> {
    if southernmost.is_none() && northernmost.is_none() {
        return None;
    }
    let min_y = southernmost.map_or(bounds.min().y, |south| bounds.min().y.max(south));
    let max_y = northernmost.map_or(bounds.max().y, |north| bounds.max().y.min(north));
    if min_y >= max_y {
        // band misses the dataset entirely
        return Some(MultiPolygon::new(Vec::new()));
    }
    let band = Rect::new(
        Coord { x: bounds.min().x, y: min_y },
        Coord { x: bounds.max().x, y: max_y },
    );
    Some(MultiPolygon::new(vec![band.to_polygon()]))
}
