use std::path::PathBuf;

use crate::classify;
use crate::epub::{self, Publication};
use crate::error::{Error, Result};
use crate::formats::{IndexEntry, PackageMetadata};
use crate::ordering::{NameOrder, natural_cmp};
use crate::package;
use crate::report::{Event, Reporter};
use crate::toc;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Directory holding the cover and page images, nothing else.
    pub images_dir: PathBuf,
    pub out_path: PathBuf,
    pub metadata: PackageMetadata,
    /// Element 0 labels the cover; the rest are candidate TOC entries.
    pub index: Vec<IndexEntry>,
    pub order: NameOrder,
}

impl GenerateRequest {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
        metadata: PackageMetadata,
        index: Vec<IndexEntry>,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            out_path: out_path.into(),
            metadata,
            index,
            order: natural_cmp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub out_path: PathBuf,
    pub pages: usize,
    pub toc_entries: usize,
    pub bytes: u64,
}

/// Builds the package from the current contents of `images_dir`.
///
/// Fatal errors are returned before anything is written to `out_path`.
pub fn generate(request: GenerateRequest, reporter: &dyn Reporter) -> Result<GenerateSummary> {
    let GenerateRequest {
        images_dir,
        out_path,
        metadata,
        index,
        order,
    } = request;

    if index.is_empty() {
        return Err(Error::EmptyIndex);
    }

    tracing::debug!(dir = %images_dir.display(), "classify images");
    let classified = classify::classify_dir(&images_dir, order, reporter)?;

    tracing::debug!(entries = index.len(), "reconcile index");
    let toc = toc::reconcile(&index, &classified.pages, reporter);

    let publication = Publication {
        metadata,
        cover: classified.cover,
        pages: classified.pages,
        index,
        toc,
    };

    tracing::debug!(pages = publication.pages.len(), "render documents");
    let documents = epub::render_all(&publication);

    let bytes = package::write_package(&publication, &documents, &out_path)?;
    reporter.report(Event::ArchiveWritten {
        path: out_path.clone(),
        bytes,
    });

    Ok(GenerateSummary {
        out_path,
        pages: publication.pages.len(),
        toc_entries: publication.toc.len(),
        bytes,
    })
}
