use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str,
    time::Instant,
};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::trace;

use super::{
    raw::{RawNode, RawOsmDocument, RawRelation, RawTag, RawTagValue, RawWay},
    OsmDataReaderError,
};

enum CurrentElement {
    Node(RawNode),
    Way(RawWay),
    Relation(RawRelation),
}

pub fn read_osm_file(file: &Path) -> Result<RawOsmDocument, OsmDataReaderError> {
    let read_start = Instant::now();

    let f = File::open(file).map_err(|error| OsmDataReaderError::FileOpen { error })?;
    let document = read_osm_document(BufReader::new(f))?;

    let read_duration = read_start.elapsed();
    trace!(
        read_duration_secs = read_duration.as_secs(),
        "OSM file read done"
    );

    Ok(document)
}

/// Reads an OSM XML document into raw element records. Only the attributes
/// the map data store consumes are extracted from nodes and ways; relation
/// attributes are copied verbatim and relation children are skipped.
pub fn read_osm_document<R: BufRead>(input: R) -> Result<RawOsmDocument, OsmDataReaderError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();

    let mut document = RawOsmDocument::default();
    let mut seen_root = false;
    let mut current: Option<CurrentElement> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|error| OsmDataReaderError::Xml { error })?
        {
            Event::Eof => break,
            Event::Start(e) => {
                if let Some(element) = open_element(&e, &mut seen_root, &mut current)? {
                    current = Some(element);
                }
            }
            Event::Empty(e) => {
                if let Some(element) = open_element(&e, &mut seen_root, &mut current)? {
                    commit_element(element, &mut document);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"node" | b"way" | b"relation" => {
                    if let Some(element) = current.take() {
                        commit_element(element, &mut document);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(OsmDataReaderError::MissingOsmRoot);
    }

    Ok(document)
}

fn open_element(
    e: &BytesStart,
    seen_root: &mut bool,
    current: &mut Option<CurrentElement>,
) -> Result<Option<CurrentElement>, OsmDataReaderError> {
    match e.name().as_ref() {
        b"osm" => *seen_root = true,
        b"node" => return Ok(Some(CurrentElement::Node(parse_raw_node(e)?))),
        b"way" => return Ok(Some(CurrentElement::Way(parse_raw_way(e)?))),
        b"relation" => return Ok(Some(CurrentElement::Relation(parse_raw_relation(e)?))),
        b"tag" => {
            if let Some(tag) = parse_raw_tag(e)? {
                match current.as_mut() {
                    Some(CurrentElement::Node(node)) => node.tag.push(tag),
                    Some(CurrentElement::Way(way)) => way.tag.push(tag),
                    _ => {}
                }
            }
        }
        b"nd" => {
            if let Some(CurrentElement::Way(way)) = current.as_mut() {
                if let Some(reference) = attr_value(e, b"ref")? {
                    way.nd.push(reference);
                }
            }
        }
        _ => {}
    }

    Ok(None)
}

fn commit_element(element: CurrentElement, document: &mut RawOsmDocument) {
    match element {
        CurrentElement::Node(node) => document.node.get_or_insert_with(Vec::new).push(node),
        CurrentElement::Way(way) => document.way.get_or_insert_with(Vec::new).push(way),
        CurrentElement::Relation(relation) => {
            document.relation.get_or_insert_with(Vec::new).push(relation)
        }
    }
}

fn parse_raw_node(e: &BytesStart) -> Result<RawNode, OsmDataReaderError> {
    Ok(RawNode {
        id: attr_value(e, b"id")?,
        timestamp: attr_value(e, b"timestamp")?,
        lat: attr_value(e, b"lat")?,
        lon: attr_value(e, b"lon")?,
        tag: RawTagValue::Absent,
    })
}

fn parse_raw_way(e: &BytesStart) -> Result<RawWay, OsmDataReaderError> {
    Ok(RawWay {
        id: attr_value(e, b"id")?,
        timestamp: attr_value(e, b"timestamp")?,
        nd: Vec::new(),
        tag: RawTagValue::Absent,
    })
}

fn parse_raw_relation(e: &BytesStart) -> Result<RawRelation, OsmDataReaderError> {
    let mut attributes = HashMap::new();
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|error| OsmDataReaderError::XmlAttribute { error })?;
        let key = str::from_utf8(attribute.key.as_ref())
            .map_err(|error| OsmDataReaderError::Utf8 { error })?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|error| OsmDataReaderError::Xml { error })?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(RawRelation { attributes })
}

fn parse_raw_tag(e: &BytesStart) -> Result<Option<RawTag>, OsmDataReaderError> {
    let k = attr_value(e, b"k")?;
    let v = attr_value(e, b"v")?;
    if let (Some(k), Some(v)) = (k, v) {
        return Ok(Some(RawTag { k, v }));
    }
    Ok(None)
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>, OsmDataReaderError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|error| OsmDataReaderError::XmlAttribute { error })?;
        if attribute.key.as_ref() == name {
            let value = attribute
                .unescape_value()
                .map_err(|error| OsmDataReaderError::Xml { error })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
