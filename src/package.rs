use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::epub::{self, Publication, RenderedDocuments};
use crate::error::{Error, Result};

/// Writes the package to `out_path`, replacing any existing file, and returns
/// its size in bytes.
pub fn write_package(
    publication: &Publication,
    documents: &RenderedDocuments,
    out_path: &Path,
) -> Result<u64> {
    let open_err = |source| Error::OpenOutput {
        path: out_path.to_path_buf(),
        source,
    };

    let parent = match out_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(open_err)?;
    let temp = tempfile::Builder::new()
        .prefix(".fxlbook-")
        .suffix(".epub.part")
        .tempfile_in(parent)
        .map_err(open_err)?;

    let mut zip = ZipWriter::new(temp);

    let stored = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .unix_permissions(0o644);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    put(&mut zip, "mimetype", stored, epub::MIMETYPE.as_bytes())?;
    put(
        &mut zip,
        epub::CONTAINER_PATH,
        deflated,
        documents.container_xml.as_bytes(),
    )?;
    put(
        &mut zip,
        epub::PACKAGE_PATH,
        deflated,
        documents.package_opf.as_bytes(),
    )?;
    put(&mut zip, epub::NAV_PATH, deflated, documents.nav_xhtml.as_bytes())?;
    put(&mut zip, epub::NCX_PATH, deflated, documents.toc_ncx.as_bytes())?;

    // Images are already compressed.
    put(
        &mut zip,
        &format!("{}/{}", epub::IMAGE_DIR, publication.cover.image_name()),
        stored,
        &publication.cover.binary,
    )?;
    for page in &publication.pages {
        put(
            &mut zip,
            &format!("{}/{}", epub::IMAGE_DIR, page.image_name()),
            stored,
            &page.binary,
        )?;
    }

    put(
        &mut zip,
        epub::STYLE_PATH,
        deflated,
        documents.stylesheet.as_bytes(),
    )?;

    for doc in std::iter::once(&documents.cover_xhtml).chain(&documents.pages) {
        put(
            &mut zip,
            &format!("{}/{}", epub::XHTML_DIR, doc.file_name),
            deflated,
            doc.contents.as_bytes(),
        )?;
    }

    let temp = zip.finish().map_err(|source| Error::WriteArchive {
        entry: "central directory".to_owned(),
        source,
    })?;

    let persist_err = |source| Error::Persist {
        path: out_path.to_path_buf(),
        source,
    };
    temp.as_file().sync_all().map_err(persist_err)?;
    let bytes = temp.as_file().metadata().map_err(persist_err)?.len();
    temp.persist(out_path)
        .map_err(|err| persist_err(err.error))?;

    Ok(bytes)
}

fn put(
    zip: &mut ZipWriter<NamedTempFile>,
    name: &str,
    options: SimpleFileOptions,
    bytes: &[u8],
) -> Result<()> {
    let write_err = |source| Error::WriteArchive {
        entry: name.to_owned(),
        source,
    };
    zip.start_file(name, options).map_err(write_err)?;
    zip.write_all(bytes)
        .map_err(|err| write_err(zip::result::ZipError::Io(err)))?;
    Ok(())
}
