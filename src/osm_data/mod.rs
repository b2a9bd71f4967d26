use std::{io, str::Utf8Error};

use quick_xml::events::attributes::AttrError;

pub mod raw;
pub mod timestamp;
pub mod xml_reader;

#[derive(Debug, thiserror::Error)]
pub enum OsmDataReaderError {
    #[error("Failed to open OSM file: {error}")]
    FileOpen { error: io::Error },

    #[error("XML parse error: {error}")]
    Xml { error: quick_xml::Error },

    #[error("Malformed XML attribute: {error}")]
    XmlAttribute { error: AttrError },

    #[error("Failed to parse UTF-8: {error}")]
    Utf8 { error: Utf8Error },

    #[error("Missing top-level 'osm' element in document")]
    MissingOsmRoot,
}
