use geo::{Coord, MultiPolygon};
use std::collections::BTreeMap;

/// One simple polygon produced by subdivision. Vertices are in order; the
/// last vertex implicitly connects back to the first.
pub type SubPolygon = Vec<Coord<f64>>;

/// Final output: language code -> polygons assigned to that language,
/// accumulated in country-processing order then assignment order.
pub type LanguagePolygonMap = BTreeMap<String, Vec<SubPolygon>>;

/// Per-country language fractions, summing to 1.0.
pub type LanguageFractions = BTreeMap<String, f64>;

#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub code: String,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Outcome record for one processed country, kept for diagnostics instead of
/// threading skip decisions through error paths.
#[derive(Debug, Clone)]
pub struct CountryOutcome {
    pub code: String,
    pub name: String,
    pub polygons: usize,
    pub skipped_outlines: Vec<String>,
}
