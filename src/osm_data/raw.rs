use std::collections::HashMap;

/// A single `<tag k="..." v="..."/>` record as it appears in the document.
#[derive(Debug, PartialEq, Clone)]
pub struct RawTag {
    pub k: String,
    pub v: String,
}

/// The tag attribute of a node or way as the document delivers it: absent,
/// a single record, or a list of records. Resolved into a uniform mapping
/// exactly once via [`RawTagValue::into_tags`]; nothing downstream branches
/// on the shape again.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum RawTagValue {
    #[default]
    Absent,
    Single(RawTag),
    Many(Vec<RawTag>),
}

impl RawTagValue {
    pub fn push(&mut self, tag: RawTag) {
        match std::mem::take(self) {
            RawTagValue::Absent => *self = RawTagValue::Single(tag),
            RawTagValue::Single(first) => *self = RawTagValue::Many(vec![first, tag]),
            RawTagValue::Many(mut tags) => {
                tags.push(tag);
                *self = RawTagValue::Many(tags);
            }
        }
    }

    /// Flattens into a `key -> value` mapping. Repeated keys are not expected
    /// in the source format, but if they occur the last write wins.
    pub fn into_tags(self) -> HashMap<String, String> {
        match self {
            RawTagValue::Absent => HashMap::new(),
            RawTagValue::Single(tag) => HashMap::from([(tag.k, tag.v)]),
            RawTagValue::Many(tags) => tags.into_iter().map(|tag| (tag.k, tag.v)).collect(),
        }
    }
}

/// A node element with all numeric fields still in their string form.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawNode {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub tag: RawTagValue,
}

/// A way element; `nd` holds the referenced node ids in traversal order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawWay {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub nd: Vec<String>,
    pub tag: RawTagValue,
}

/// A relation element kept as an opaque attribute bag. Member lists are not
/// decomposed; relations are pass-through data.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawRelation {
    pub attributes: HashMap<String, String>,
}

/// The parsed document handed to the map data store. A section is `None`
/// when the document contains no elements of that kind.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RawOsmDocument {
    pub node: Option<Vec<RawNode>>,
    pub way: Option<Vec<RawWay>>,
    pub relation: Option<Vec<RawRelation>>,
}
