use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::osm_data::{
    raw::{RawNode, RawOsmDocument, RawRelation, RawWay},
    timestamp::utc_to_epoch,
};

use super::{
    osm::{OsmNode, OsmRelation, OsmWay},
    MapDataError,
};

/// Highway values that do not count as drivable. A way tagged with any of
/// these contributes no nodes to the highway node set.
pub const EXCLUDED_HIGHWAY_VALUES: [&str; 8] = [
    "pedestrian",
    "track",
    "footway",
    "bridleway",
    "steps",
    "path",
    "elevator",
    "cycleway",
];

/// Id-keyed stores for the road network, built once from a raw document and
/// read-only afterwards. Ways additionally keep their document order so the
/// derived indexes iterate them the way they were ingested.
pub struct MapDataStore {
    node_data: HashMap<String, OsmNode>,
    ways: Vec<OsmWay>,
    way_map: HashMap<String, usize>,
    relation_data: Vec<OsmRelation>,
}

impl MapDataStore {
    pub fn build(document: RawOsmDocument) -> Result<Self, MapDataError> {
        let raw_nodes = document
            .node
            .ok_or(MapDataError::MissingSection { section: "node" })?;
        let raw_ways = document
            .way
            .ok_or(MapDataError::MissingSection { section: "way" })?;
        // Older extracts omit relations entirely.
        let raw_relations = document.relation.unwrap_or_default();

        let mut store = Self {
            node_data: HashMap::new(),
            ways: Vec::new(),
            way_map: HashMap::new(),
            relation_data: Vec::new(),
        };

        for raw_node in raw_nodes {
            let node = node_from_raw(raw_node)?;
            store.node_data.insert(node.id.clone(), node);
        }
        for raw_way in raw_ways {
            let way = way_from_raw(raw_way)?;
            store.insert_way(way);
        }
        for raw_relation in raw_relations {
            store.relation_data.push(relation_from_raw(raw_relation)?);
        }

        trace!(
            nodes = store.node_data.len(),
            ways = store.ways.len(),
            relations = store.relation_data.len(),
            "Map data store built"
        );

        Ok(store)
    }

    fn insert_way(&mut self, way: OsmWay) {
        match self.way_map.get(&way.id) {
            Some(&idx) => self.ways[idx] = way,
            None => {
                self.way_map.insert(way.id.clone(), self.ways.len());
                self.ways.push(way);
            }
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&OsmNode> {
        self.node_data.get(id)
    }

    pub fn get_way(&self, id: &str) -> Option<&OsmWay> {
        self.way_map.get(id).map(|&idx| &self.ways[idx])
    }

    /// Ways in the order they were ingested.
    pub fn ways(&self) -> impl Iterator<Item = &OsmWay> {
        self.ways.iter()
    }

    pub fn relations(&self) -> &[OsmRelation] {
        &self.relation_data
    }

    pub fn node_count(&self) -> usize {
        self.node_data.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relation_data.len()
    }

    /// Derives the node id -> way ids index. A way id is appended once per
    /// occurrence of the node id in its node list, so a closed loop whose
    /// first node repeats as the last produces two entries.
    pub fn build_node_way_mapping(&self) -> HashMap<String, Vec<String>> {
        let mut node_way_mapping: HashMap<String, Vec<String>> = HashMap::new();
        for way in self.ways() {
            for node_id in &way.node_ids {
                node_way_mapping
                    .entry(node_id.clone())
                    .or_default()
                    .push(way.id.clone());
            }
        }
        node_way_mapping
    }

    /// Derives the set of nodes belonging to at least one drivable way.
    pub fn build_highway_nodes(&self) -> HashSet<String> {
        let mut highway_nodes = HashSet::new();
        for way in self.ways() {
            if let Some(highway) = way.tags.get("highway") {
                if EXCLUDED_HIGHWAY_VALUES.contains(&highway.as_str()) {
                    continue;
                }
                highway_nodes.extend(way.node_ids.iter().cloned());
            }
        }
        highway_nodes
    }
}

fn node_from_raw(raw: RawNode) -> Result<OsmNode, MapDataError> {
    let id = raw.id.ok_or(MapDataError::MissingAttribute {
        element: "node",
        attribute: "id",
    })?;
    let timestamp = raw.timestamp.ok_or(MapDataError::MissingAttribute {
        element: "node",
        attribute: "timestamp",
    })?;
    let timestamp =
        utc_to_epoch(&timestamp).map_err(|error| MapDataError::Timestamp { error })?;
    let lat = raw.lat.ok_or(MapDataError::MissingAttribute {
        element: "node",
        attribute: "lat",
    })?;
    let lat = lat
        .parse::<f64>()
        .map_err(|error| MapDataError::FailedToParseLat { value: lat.clone(), error })?;
    let lon = raw.lon.ok_or(MapDataError::MissingAttribute {
        element: "node",
        attribute: "lon",
    })?;
    let lon = lon
        .parse::<f64>()
        .map_err(|error| MapDataError::FailedToParseLon { value: lon.clone(), error })?;

    Ok(OsmNode {
        id,
        lat,
        lon,
        timestamp,
        tags: raw.tag.into_tags(),
    })
}

fn way_from_raw(raw: RawWay) -> Result<OsmWay, MapDataError> {
    let id = raw.id.ok_or(MapDataError::MissingAttribute {
        element: "way",
        attribute: "id",
    })?;
    let timestamp = raw.timestamp.ok_or(MapDataError::MissingAttribute {
        element: "way",
        attribute: "timestamp",
    })?;
    let timestamp =
        utc_to_epoch(&timestamp).map_err(|error| MapDataError::Timestamp { error })?;

    Ok(OsmWay {
        id,
        timestamp,
        node_ids: raw.nd,
        tags: raw.tag.into_tags(),
    })
}

fn relation_from_raw(raw: RawRelation) -> Result<OsmRelation, MapDataError> {
    let id = raw
        .attributes
        .get("id")
        .cloned()
        .ok_or(MapDataError::MissingAttribute {
            element: "relation",
            attribute: "id",
        })?;
    Ok(OsmRelation {
        id,
        attributes: raw.attributes,
    })
}
