use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};
use rayon::prelude::*;

use crate::assets::{Canvas, CoverAsset, ImageKind, PageAsset};
use crate::error::{Error, Result};
use crate::ordering::NameOrder;
use crate::report::{Event, Reporter, SkipReason};

#[derive(Debug, Clone)]
pub struct Classified {
    pub cover: CoverAsset,
    pub pages: Vec<PageAsset>,
}

#[derive(Debug)]
struct SourceFile {
    file_name: String,
    path: PathBuf,
}

#[derive(Debug)]
struct Probed {
    binary: Vec<u8>,
    kind: ImageKind,
    canvas: Canvas,
    declared_matches: bool,
}

pub fn classify_dir(dir: &Path, order: NameOrder, reporter: &dyn Reporter) -> Result<Classified> {
    let files = list_sorted(dir, order)?;

    let probed = files
        .par_iter()
        .map(|file| -> Result<_> {
            let binary = std::fs::read(&file.path).map_err(|source| Error::ReadFile {
                path: file.path.clone(),
                source,
            })?;
            Ok(probe(&file.file_name, binary))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut cover: Option<CoverAsset> = None;
    let mut pages = Vec::new();
    let mut skipped = 0_usize;

    for (file, probed) in files.into_iter().zip(probed) {
        let probed = match probed {
            Ok(probed) => probed,
            Err(reason) => {
                skipped += 1;
                reporter.report(Event::FileSkipped {
                    file_name: file.file_name,
                    reason,
                });
                continue;
            }
        };

        if !probed.declared_matches {
            reporter.report(Event::ExtensionMismatch {
                file_name: file.file_name.clone(),
                declared: declared_extension(&file.file_name).unwrap_or_default(),
                sniffed: probed.kind.extension.to_owned(),
            });
        }

        if !is_cover_name(&file.file_name) {
            pages.push(PageAsset::new(
                pages.len() + 1,
                file.file_name,
                probed.binary,
                probed.kind,
            ));
            continue;
        }

        if let Some(existing) = &cover {
            skipped += 1;
            reporter.report(Event::FileSkipped {
                file_name: file.file_name,
                reason: SkipReason::DuplicateCover {
                    cover: existing.file_name.clone(),
                },
            });
            continue;
        }

        cover = Some(CoverAsset {
            file_name: file.file_name,
            binary: probed.binary,
            kind: probed.kind,
            canvas: probed.canvas,
        });
    }

    let Some(cover) = cover else {
        return Err(Error::MissingCover {
            dir: dir.to_path_buf(),
        });
    };
    if pages.is_empty() {
        return Err(Error::NoPages {
            dir: dir.to_path_buf(),
        });
    }

    reporter.report(Event::ClassificationComplete {
        cover: cover.file_name.clone(),
        pages: pages.len(),
        skipped,
        width: cover.canvas.width,
        height: cover.canvas.height,
    });

    Ok(Classified { cover, pages })
}

/// `cover.png`, `COVER.jpg` and a bare `cover` all name the cover.
pub fn is_cover_name(file_name: &str) -> bool {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case("cover"))
}

/// Sniffs the media type from content alone.
pub fn sniff(binary: &[u8]) -> Option<(ImageFormat, ImageKind)> {
    let format = image::guess_format(binary).ok()?;
    let extension = *format.extensions_str().first()?;
    Some((
        format,
        ImageKind {
            mime_type: format.to_mime_type(),
            extension,
        },
    ))
}

fn probe(file_name: &str, binary: Vec<u8>) -> std::result::Result<Probed, SkipReason> {
    let (format, kind) = sniff(&binary).ok_or(SkipReason::UnknownType)?;

    let (width, height) = ImageReader::with_format(Cursor::new(binary.as_slice()), format)
        .into_dimensions()
        .map_err(|err| SkipReason::Dimensions(err.to_string()))?;

    let declared_matches = declared_extension(file_name)
        .is_some_and(|ext| format.extensions_str().iter().any(|known| *known == ext));

    Ok(Probed {
        binary,
        kind,
        canvas: Canvas { width, height },
        declared_matches,
    })
}

fn declared_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn list_sorted(dir: &Path, order: NameOrder) -> Result<Vec<SourceFile>> {
    let read_dir_err = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        files.push(SourceFile {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            path,
        });
    }

    files.sort_by(|a, b| order(&a.file_name, &b.file_name));
    Ok(files)
}
