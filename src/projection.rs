use anyhow::{anyhow, Result};
use geo::{Coord, LineString, MapCoords, MultiPolygon, Rect};

const EARTH_RADIUS: f64 = 6_378_137.0;

/// Target coordinate reference systems the `map_projection` option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Plain lon/lat passthrough.
    LonLat,
    /// Spherical Web Mercator.
    WebMercator,
}

impl Crs {
    pub fn parse(identifier: &str) -> Result<Self> {
        match identifier {
            "EPSG:4326" => Ok(Crs::LonLat),
            "EPSG:3857" => Ok(Crs::WebMercator),
            other => Err(anyhow!("Unsupported map_projection: {}", other)),
        }
    }
}

/// Reprojects lon/lat geometry into the target CRS.
pub fn reproject(geometry: &MultiPolygon<f64>, crs: Crs) -> MultiPolygon<f64> {
    match crs {
        Crs::LonLat => geometry.clone(),
        Crs::WebMercator => geometry.map_coords(web_mercator),
    }
}

fn web_mercator(coord: Coord<f64>) -> Coord<f64> {
    let lat_rad = coord.y.to_radians();
    Coord {
        x: EARTH_RADIUS * coord.x.to_radians(),
        y: EARTH_RADIUS * (lat_rad.tan() + 1.0 / lat_rad.cos()).ln(),
    }
}

/// Linear map from a source bounding box onto the output canvas. Coordinates
/// outside the source box map outside the canvas; nothing is clamped.
#[derive(Debug, Clone)]
pub struct Projector {
    bounds: Rect<f64>,
    width: f64,
    height: f64,
}

impl Projector {
    pub fn new(bounds: Rect<f64>, width: f64, height: f64) -> Result<Self> {
        if bounds.width() == 0.0 || bounds.height() == 0.0 {
            return Err(anyhow!(
                "Degenerate source bounding box: {:?} has zero width or height",
                bounds
            ));
        }
        Ok(Self { bounds, width, height })
    }

    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.bounds.min().x) * self.width / self.bounds.width(),
            y: (coord.y - self.bounds.min().y) * self.height / self.bounds.height(),
        }
    }

    pub fn project_ring(&self, ring: &LineString<f64>) -> LineString<f64> {
        LineString::new(ring.coords().map(|&c| self.project(c)).collect())
    }
}
