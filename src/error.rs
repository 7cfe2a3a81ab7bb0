use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no cover image (cover.<ext>) found in {}", dir.display())]
    MissingCover { dir: PathBuf },

    #[error("no page images found in {}", dir.display())]
    NoPages { dir: PathBuf },

    /// Element 0 of the index labels the cover, so the index cannot be empty.
    #[error("index is empty; the first entry must label the cover")]
    EmptyIndex,

    #[error("read image dir: {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read image: {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("open epub output: {}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write epub entry {entry}")]
    WriteArchive {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("persist epub output: {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
