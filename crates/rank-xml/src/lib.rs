//! Reading and writing the game's Ranks.xml.

mod elements;
pub mod error;
pub mod reader;
pub mod writer;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rank_model::RankHierarchy;
use tracing::info;

pub use error::{Result, XmlError};
pub use reader::parse_ranks_xml;
pub use writer::{generate_ranks_xml, write_ranks_xml};

/// Read and parse a ranks file.
pub fn read_ranks_file(path: &Path) -> Result<Vec<RankHierarchy>> {
    let text = fs::read_to_string(path).map_err(|source| XmlError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let ranks = parse_ranks_xml(&text)?;
    info!(path = %path.display(), ranks = ranks.len(), "loaded ranks");
    Ok(ranks)
}

/// Write ranks to `path`, replacing any existing file.
pub fn write_ranks_file(path: &Path, ranks: &[RankHierarchy]) -> Result<()> {
    let file_error = |source| XmlError::File {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(file_error)?;
    let mut writer = BufWriter::new(file);
    write_ranks_xml(&mut writer, ranks)?;
    writer.flush().map_err(file_error)?;
    info!(path = %path.display(), ranks = ranks.len(), "wrote ranks");
    Ok(())
}
