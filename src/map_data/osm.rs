use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct OsmNode {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: i64,
    pub tags: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmWay {
    pub id: String,
    pub timestamp: i64,
    pub node_ids: Vec<String>,
    pub tags: HashMap<String, String>,
}

/// Relations are kept as-is: an id plus the verbatim attribute bag from the
/// document. Turn restrictions and other member semantics are not modeled.
#[derive(Clone, Debug, PartialEq)]
pub struct OsmRelation {
    pub id: String,
    pub attributes: HashMap<String, String>,
}
