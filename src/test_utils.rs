use crate::osm_data::raw::{RawNode, RawOsmDocument, RawTag, RawTagValue, RawWay};

pub const TEST_TIMESTAMP: &str = "2020-06-15T12:30:00Z";

pub fn raw_node(id: &str, lat: f64, lon: f64, tags: Option<Vec<(&str, &str)>>) -> RawNode {
    RawNode {
        id: Some(id.to_string()),
        timestamp: Some(TEST_TIMESTAMP.to_string()),
        lat: Some(lat.to_string()),
        lon: Some(lon.to_string()),
        tag: raw_tag_value(tags),
    }
}

pub fn raw_way(id: &str, node_ids: Vec<&str>, tags: Option<Vec<(&str, &str)>>) -> RawWay {
    RawWay {
        id: Some(id.to_string()),
        timestamp: Some(TEST_TIMESTAMP.to_string()),
        nd: node_ids.iter().map(|node_id| node_id.to_string()).collect(),
        tag: raw_tag_value(tags),
    }
}

pub fn raw_document(nodes: Vec<RawNode>, ways: Vec<RawWay>) -> RawOsmDocument {
    RawOsmDocument {
        node: Some(nodes),
        way: Some(ways),
        relation: None,
    }
}

fn raw_tag_value(tags: Option<Vec<(&str, &str)>>) -> RawTagValue {
    let mut value = RawTagValue::Absent;
    if let Some(tags) = tags {
        for (k, v) in tags {
            value.push(RawTag {
                k: k.to_string(),
                v: v.to_string(),
            });
        }
    }
    value
}
