//! Content resolution: turn a declaration's content source into the exact
//! bytes to upload.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use orc_types::ContentSource;
use tracing::debug;

/// Why the content of a declaration could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("error opening file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolve a content source to its complete byte payload.
///
/// Files are read to the end, whatever their size.
pub fn resolve(source: &ContentSource<'_>) -> Result<Vec<u8>, ContentError> {
    let data = match source {
        ContentSource::File(path) => read_file(path)?,
        ContentSource::Inline(contents) => contents.as_bytes().to_vec(),
        ContentSource::Empty => Vec::new(),
    };
    debug!(source = source.kind(), bytes = data.len(), "resolved content");
    Ok(data)
}

fn read_file(path: &Path) -> Result<Vec<u8>, ContentError> {
    let mut file = File::open(path).map_err(|source| ContentError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = match file.metadata() {
        Ok(meta) => Vec::with_capacity(usize::try_from(meta.len()).unwrap_or(0)),
        Err(_) => Vec::new(),
    };
    file.read_to_end(&mut data)
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(data)
}
