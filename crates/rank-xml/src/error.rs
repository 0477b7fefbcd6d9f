use std::path::PathBuf;

use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("attribute error: {0}")]
    Attribute(#[from] AttrError),
    #[error("invalid escape sequence: {0}")]
    Escape(#[from] EscapeError),
    #[error("<{element}> expects a whole number, found {value:?}")]
    InvalidNumber { element: String, value: String },
    #[error("malformed ranks document: {0}")]
    Structure(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to access {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, XmlError>;
