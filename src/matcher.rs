use std::collections::{HashMap, HashSet};

use geo::{Distance, Geodesic, Point};
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::{
    gps_data::GpsFix,
    map_data::{osm::OsmNode, store::MapDataStore},
};

/// Fixed matching policy: a node counts as a match strictly under this
/// geodesic distance from the fix.
pub const MATCH_DISTANCE_THRESHOLD_METERS: f64 = 20.0;

/// A GPS fix annotated with every highway node found under the distance
/// threshold, keyed by node id with the distance in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedCoordinate {
    pub lat: f64,
    pub lon: f64,
    pub osm_node_ids: HashMap<String, f64>,
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum MatcherError {
    #[error("Highway node {node_id} is missing from the node store")]
    MissingHighwayNode { node_id: String },
}

/// Matches each GPS fix against the highway node set. Fixes with no node
/// under the threshold produce no output record; output order follows input
/// fix order. The per-fix scans are independent and run in parallel.
pub fn match_fixes(
    gps_fixes: &[GpsFix],
    store: &MapDataStore,
    highway_nodes: &HashSet<String>,
    threshold_meters: f64,
) -> Vec<TaggedCoordinate> {
    gps_fixes
        .par_iter()
        .filter_map(|fix| match_fix(fix, store, highway_nodes, threshold_meters))
        .collect()
}

fn match_fix(
    fix: &GpsFix,
    store: &MapDataStore,
    highway_nodes: &HashSet<String>,
    threshold_meters: f64,
) -> Option<TaggedCoordinate> {
    let fix_point = Point::new(fix.lon, fix.lat);

    let mut nearby_nodes = HashMap::new();
    for node_id in highway_nodes {
        let node = match lookup_node(store, node_id) {
            Ok(node) => node,
            Err(error) => {
                // A highway node with no store entry means the extract has
                // dangling way references. Skip it and keep scanning.
                warn!(error = %error, "Skipping highway node");
                continue;
            }
        };
        let distance = Geodesic::distance(fix_point, Point::new(node.lon, node.lat));
        if distance < threshold_meters {
            nearby_nodes.insert(node.id.clone(), distance);
        }
    }

    if nearby_nodes.is_empty() {
        return None;
    }

    Some(TaggedCoordinate {
        lat: fix.lat,
        lon: fix.lon,
        osm_node_ids: nearby_nodes,
    })
}

fn lookup_node<'a>(store: &'a MapDataStore, node_id: &str) -> Result<&'a OsmNode, MatcherError> {
    store
        .get_node(node_id)
        .ok_or_else(|| MatcherError::MissingHighwayNode {
            node_id: node_id.to_string(),
        })
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use assert_approx_eq::assert_approx_eq;
    use geo::{Distance, Geodesic, Point};

    use crate::{
        gps_data::GpsFix,
        map_data::store::MapDataStore,
        test_utils::{raw_document, raw_node, raw_way},
    };

    use super::{match_fixes, MATCH_DISTANCE_THRESHOLD_METERS};

    // Roughly one meter of latitude at 57 degrees north.
    const LAT_DEG_PER_METER: f64 = 1.0 / 111_359.9;

    const FIX_LAT: f64 = 57.1995635;
    const FIX_LON: f64 = 25.0419124;

    fn store_with_nodes_at(offsets_meters: &[(&str, f64)]) -> MapDataStore {
        let nodes = offsets_meters
            .iter()
            .map(|(id, meters)| raw_node(id, FIX_LAT + meters * LAT_DEG_PER_METER, FIX_LON, None))
            .collect();
        let node_ids = offsets_meters.iter().map(|(id, _)| *id).collect();
        let ways = vec![raw_way(
            "10",
            node_ids,
            Some(vec![("highway", "residential")]),
        )];
        MapDataStore::build(raw_document(nodes, ways)).unwrap()
    }

    #[test]
    fn threshold_boundary_is_strict() {
        let store = store_with_nodes_at(&[("1", 12.0)]);
        let highway_nodes = store.build_highway_nodes();
        let fixes = vec![GpsFix {
            lat: FIX_LAT,
            lon: FIX_LON,
        }];

        let node = store.get_node("1").unwrap();
        let exact_distance = Geodesic::distance(
            Point::new(FIX_LON, FIX_LAT),
            Point::new(node.lon, node.lat),
        );

        let at_threshold = match_fixes(&fixes, &store, &highway_nodes, exact_distance);
        assert_eq!(at_threshold.len(), 0);

        let just_above = match_fixes(&fixes, &store, &highway_nodes, exact_distance + 1e-9);
        assert_eq!(just_above.len(), 1);
        assert_eq!(
            just_above[0].osm_node_ids.get("1"),
            Some(&exact_distance)
        );
    }

    #[test]
    fn all_nodes_under_threshold_are_kept() {
        let store = store_with_nodes_at(&[("A", 5.0), ("B", 10.0), ("C", 25.0)]);
        let highway_nodes = store.build_highway_nodes();
        let fixes = vec![GpsFix {
            lat: FIX_LAT,
            lon: FIX_LON,
        }];

        let tagged = match_fixes(&fixes, &store, &highway_nodes, MATCH_DISTANCE_THRESHOLD_METERS);
        assert_eq!(tagged.len(), 1);

        let nearby = &tagged[0].osm_node_ids;
        assert_eq!(nearby.len(), 2);
        assert_approx_eq!(*nearby.get("A").unwrap(), 5.0, 0.1);
        assert_approx_eq!(*nearby.get("B").unwrap(), 10.0, 0.1);
        assert_eq!(nearby.get("C"), None);
    }

    #[test]
    fn fixes_without_matches_are_dropped_and_order_is_kept() {
        let store = store_with_nodes_at(&[("1", 2.0)]);
        let highway_nodes = store.build_highway_nodes();
        let fixes = vec![
            GpsFix {
                lat: FIX_LAT,
                lon: FIX_LON,
            },
            // Far away from everything.
            GpsFix {
                lat: FIX_LAT + 1.0,
                lon: FIX_LON,
            },
            GpsFix {
                lat: FIX_LAT + 1.0 * LAT_DEG_PER_METER,
                lon: FIX_LON,
            },
        ];

        let tagged = match_fixes(&fixes, &store, &highway_nodes, MATCH_DISTANCE_THRESHOLD_METERS);
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].lat, FIX_LAT);
        assert_eq!(tagged[1].lat, FIX_LAT + 1.0 * LAT_DEG_PER_METER);
    }

    #[test]
    fn dangling_highway_node_is_skipped() {
        let store = store_with_nodes_at(&[("1", 2.0)]);
        let mut highway_nodes = store.build_highway_nodes();
        highway_nodes.insert(String::from("does-not-exist"));

        let fixes = vec![GpsFix {
            lat: FIX_LAT,
            lon: FIX_LON,
        }];
        let tagged = match_fixes(&fixes, &store, &highway_nodes, MATCH_DISTANCE_THRESHOLD_METERS);

        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].osm_node_ids.len(), 1);
        assert!(tagged[0].osm_node_ids.contains_key("1"));
    }

    #[test]
    fn empty_highway_set_produces_no_output() {
        let store = store_with_nodes_at(&[("1", 2.0)]);
        let fixes = vec![GpsFix {
            lat: FIX_LAT,
            lon: FIX_LON,
        }];
        let tagged = match_fixes(
            &fixes,
            &store,
            &HashSet::new(),
            MATCH_DISTANCE_THRESHOLD_METERS,
        );
        assert_eq!(tagged, Vec::new());
    }

    #[test]
    fn residential_way_end_to_end() {
        //  N1 - - N2 - - N3     (W1, highway=residential)
        //          *
        //         fix (~3m south of N2)
        let n2_lat = FIX_LAT + 3.0 * LAT_DEG_PER_METER;
        let document = raw_document(
            vec![
                raw_node("N1", n2_lat, FIX_LON - 0.001, None),
                raw_node("N2", n2_lat, FIX_LON, None),
                raw_node("N3", n2_lat, FIX_LON + 0.001, None),
            ],
            vec![raw_way(
                "W1",
                vec!["N1", "N2", "N3"],
                Some(vec![("highway", "residential")]),
            )],
        );
        let store = MapDataStore::build(document).unwrap();

        let highway_nodes = store.build_highway_nodes();
        assert!(highway_nodes.contains("N2"));

        let node_way_mapping = store.build_node_way_mapping();
        assert_eq!(node_way_mapping.get("N2"), Some(&vec![String::from("W1")]));

        let fixes = vec![GpsFix {
            lat: FIX_LAT,
            lon: FIX_LON,
        }];
        let tagged = match_fixes(&fixes, &store, &highway_nodes, MATCH_DISTANCE_THRESHOLD_METERS);

        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].lat, FIX_LAT);
        assert_eq!(tagged[0].lon, FIX_LON);
        let distance = *tagged[0].osm_node_ids.get("N2").unwrap();
        assert_approx_eq!(distance, 3.0, 0.1);
    }
}
