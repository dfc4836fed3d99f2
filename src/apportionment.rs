use crate::config::AppConfig;
use crate::seed::{derive_seed, SHUFFLE_STREAM};
use crate::types::{LanguageFractions, LanguagePolygonMap, SubPolygon};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::warn;

/// D'Hondt divisor method: distributes `n_seats` across the vote map.
///
/// Each round the language with the highest working weight wins a seat and is
/// reweighted to `fraction / (seats + 1)`. Ties go to the lexicographically
/// first language code, the fixed iteration order of the vote map, so results
/// are identical across runs and platforms. The returned counts always sum to
/// `n_seats` for a non-empty vote map.
pub fn dhondt(n_seats: usize, votes: &LanguageFractions) -> BTreeMap<String, usize> {
    let mut seats: BTreeMap<String, usize> =
        votes.keys().map(|code| (code.clone(), 0)).collect();
    if votes.is_empty() {
        return seats;
    }

    let mut weights: BTreeMap<&str, f64> =
        votes.iter().map(|(code, fraction)| (code.as_str(), *fraction)).collect();

    for _ in 0..n_seats {
        let mut winner: Option<(&str, f64)> = None;
        for (code, weight) in &weights {
            match winner {
                Some((_, best)) if *weight <= best => {}
                _ => winner = Some((*code, *weight)),
            }
        }
        let (code, _) = winner.expect("vote map is non-empty");

        let won = seats.get_mut(code).expect("seat entry exists for every vote");
        *won += 1;
        weights.insert(code, votes[code] / (*won as f64 + 1.0));
    }

    seats
}

/// Distributes one country's polygons across its languages: D'Hondt seat
/// counts, then a seeded shuffle of polygon indices partitioned into
/// contiguous runs per language. Every polygon ends up in exactly one
/// language's list.
pub fn assign_country_polygons(
    polygons: Vec<SubPolygon>,
    fractions: &LanguageFractions,
    shuffle_seed: u64,
    language_polygons: &mut LanguagePolygonMap,
) {
    let seats = dhondt(polygons.len(), fractions);

    let mut indices: Vec<usize> = (0..polygons.len()).collect();
    let mut rng = StdRng::seed_from_u64(shuffle_seed);
    indices.shuffle(&mut rng);

    let mut slots: Vec<Option<SubPolygon>> = polygons.into_iter().map(Some).collect();
    let mut next = 0;
    for (language, count) in &seats {
        if *count == 0 {
            continue;
        }
        let assigned = language_polygons.entry(language.clone()).or_default();
        for &index in &indices[next..next + count] {
            // the permutation visits each index exactly once
            assigned.push(slots[index].take().unwrap());
        }
        next += count;
    }
}

/// Drives apportionment over all countries in country-code order. Countries
/// absent from the distribution (or with an empty entry) contribute their
/// whole polygon set to the configured undefined code without an
/// apportionment call.
pub fn assign_language_polygons(
    config: &AppConfig,
    country_polygons: BTreeMap<String, Vec<SubPolygon>>,
    distribution: &BTreeMap<String, LanguageFractions>,
) -> LanguagePolygonMap {
    let mut language_polygons = LanguagePolygonMap::new();

    for (code, polygons) in country_polygons {
        match distribution.get(&code) {
            Some(fractions) if !fractions.is_empty() => {
                let shuffle_seed =
                    derive_seed(config.output.random_seed, &code, SHUFFLE_STREAM);
                assign_country_polygons(
                    polygons,
                    fractions,
                    shuffle_seed,
                    &mut language_polygons,
                );
            }
            _ => {
                warn!(
                    "Country {} not found in language distribution. Assigning to {}.",
                    code, config.output.undefined_code
                );
                language_polygons
                    .entry(config.output.undefined_code.clone())
                    .or_default()
                    .extend(polygons);
            }
        }
    }

    language_polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use std::path::PathBuf;

    fn fractions(entries: &[(&str, f64)]) -> LanguageFractions {
        entries.iter().map(|(code, f)| (code.to_string(), *f)).collect()
    }

    /// Marker polygon whose first x coordinate identifies it.
    fn marker_polygon(id: usize) -> SubPolygon {
        let x = id as f64;
        vec![
            Coord { x, y: 0.0 },
            Coord { x: x + 1.0, y: 0.0 },
            Coord { x, y: 1.0 },
        ]
    }

    fn test_config() -> AppConfig {
        AppConfig {
            input: crate::config::InputConfig {
                boundary_file: PathBuf::from("unused"),
                language_distribution: PathBuf::from("unused"),
            },
            output: crate::config::OutputConfig {
                file: PathBuf::from("unused"),
                excluded_countries: Vec::new(),
                southernmost_latitude: None,
                northernmost_latitude: None,
                map_projection: "EPSG:4326".to_string(),
                random_seed: 42,
                grid_length: 10.0,
                grid_relative_std_dev: 0.2,
                min_relative_distance: 0.1,
                width: 200.0,
                height: 100.0,
                undefined_code: "UND".to_string(),
            },
        }
    }

    #[test]
    fn dhondt_matches_the_divisor_sequence() {
        let seats = dhondt(10, &fractions(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]));
        assert_eq!(seats["A"], 5);
        assert_eq!(seats["B"], 3);
        assert_eq!(seats["C"], 2);
    }

    #[test]
    fn dhondt_seats_always_sum_to_n() {
        for n in [0, 1, 7, 13, 100] {
            let seats = dhondt(n, &fractions(&[("A", 0.61), ("B", 0.25), ("C", 0.14)]));
            assert_eq!(seats.values().sum::<usize>(), n);
        }
    }

    #[test]
    fn dhondt_single_language_takes_everything() {
        let seats = dhondt(17, &fractions(&[("A", 1.0)]));
        assert_eq!(seats["A"], 17);
    }

    #[test]
    fn dhondt_zero_fraction_receives_nothing() {
        let seats = dhondt(5, &fractions(&[("A", 1.0), ("B", 0.0)]));
        assert_eq!(seats["A"], 5);
        assert_eq!(seats["B"], 0);
    }

    #[test]
    fn dhondt_ties_go_to_the_first_code() {
        let seats = dhondt(3, &fractions(&[("aaa", 0.5), ("bbb", 0.5)]));
        assert_eq!(seats["aaa"], 2);
        assert_eq!(seats["bbb"], 1);
    }

    #[test]
    fn dhondt_is_monotone_in_the_fraction() {
        let low = dhondt(10, &fractions(&[("A", 0.2), ("B", 0.8)]));
        let high = dhondt(10, &fractions(&[("A", 0.4), ("B", 0.6)]));
        assert!(high["A"] >= low["A"]);
    }

    #[test]
    fn assignment_conserves_every_polygon_exactly_once() {
        let polygons: Vec<SubPolygon> = (0..10).map(marker_polygon).collect();
        let mut language_polygons = LanguagePolygonMap::new();
        assign_country_polygons(
            polygons,
            &fractions(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]),
            99,
            &mut language_polygons,
        );

        assert_eq!(language_polygons["A"].len(), 5);
        assert_eq!(language_polygons["B"].len(), 3);
        assert_eq!(language_polygons["C"].len(), 2);

        let mut seen: Vec<usize> = language_polygons
            .values()
            .flatten()
            .map(|polygon| polygon[0].x as usize)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn assignment_is_deterministic_for_a_fixed_seed() {
        let run = || {
            let mut language_polygons = LanguagePolygonMap::new();
            assign_country_polygons(
                (0..20).map(marker_polygon).collect(),
                &fractions(&[("A", 0.7), ("B", 0.3)]),
                7,
                &mut language_polygons,
            );
            language_polygons
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn unknown_country_goes_to_the_undefined_bucket() {
        let config = test_config();
        let mut country_polygons = BTreeMap::new();
        country_polygons.insert("XYZ".to_string(), (0..4).map(marker_polygon).collect());

        let distribution = BTreeMap::new();
        let language_polygons =
            assign_language_polygons(&config, country_polygons, &distribution);

        assert_eq!(language_polygons.len(), 1);
        assert_eq!(language_polygons["UND"].len(), 4);
    }

    #[test]
    fn known_countries_are_apportioned_and_merged() {
        let config = test_config();
        let mut country_polygons = BTreeMap::new();
        country_polygons.insert("ONE".to_string(), (0..10).map(marker_polygon).collect());
        country_polygons.insert("TWO".to_string(), (10..16).map(marker_polygon).collect());

        let mut distribution = BTreeMap::new();
        distribution.insert("ONE".to_string(), fractions(&[("eng", 1.0)]));
        distribution.insert("TWO".to_string(), fractions(&[("eng", 0.5), ("fra", 0.5)]));

        let language_polygons =
            assign_language_polygons(&config, country_polygons, &distribution);

        // ONE contributes all 10 to eng, TWO splits 3/3.
        assert_eq!(language_polygons["eng"].len(), 13);
        assert_eq!(language_polygons["fra"].len(), 3);

        let total: usize = language_polygons.values().map(Vec::len).sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn empty_distribution_entry_routes_to_undefined() {
        let config = test_config();
        let mut country_polygons = BTreeMap::new();
        country_polygons.insert("XYZ".to_string(), (0..3).map(marker_polygon).collect());

        let mut distribution = BTreeMap::new();
        distribution.insert("XYZ".to_string(), LanguageFractions::new());

        let language_polygons =
            assign_language_polygons(&config, country_polygons, &distribution);
        assert_eq!(language_polygons["UND"].len(), 3);
    }
}
