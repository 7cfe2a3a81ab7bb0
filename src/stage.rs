use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::classify::is_cover_name;
use crate::cli::StageArgs;
use crate::formats::{self, IndexEntry};
use crate::ids;
use crate::ordering::{NameOrder, natural_cmp, sort_names};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImages {
    /// `cover.<ext>` inside the output directory.
    pub cover_file_name: String,
    /// The cover is a copy of the first page.
    pub cover_promoted: bool,
    /// Staged page names (`i-001.png`, ...) in order.
    pub pages: Vec<String>,
}

pub fn run(args: StageArgs) -> anyhow::Result<()> {
    let in_dir = PathBuf::from(&args.images);
    let out_dir = PathBuf::from(&args.out);

    let staged = stage_images(&in_dir, &out_dir, natural_cmp)?;
    tracing::info!(
        out = %out_dir.display(),
        pages = staged.pages.len(),
        cover_promoted = staged.cover_promoted,
        "staged images"
    );

    if let Some(index_out) = &args.index_out {
        let index = default_index(&staged, &args.cover_label);
        formats::write_index(Path::new(index_out), &index)?;
    }

    Ok(())
}

pub fn stage_images(in_dir: &Path, out_dir: &Path, order: NameOrder) -> anyhow::Result<StagedImages> {
    let names = list_images(in_dir, order)?;
    if names.is_empty() {
        anyhow::bail!("no images to stage in {}", in_dir.display());
    }

    if out_dir.exists() {
        anyhow::bail!("stage output directory already exists: {}", out_dir.display());
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create stage dir: {}", out_dir.display()))?;

    let cover = names.iter().find(|name| is_cover_name(name));

    let mut pages = Vec::new();
    for name in names.iter().filter(|name| Some(*name) != cover) {
        let staged = format!(
            "{}.{}",
            ids::page_file_id(&ids::page_id(pages.len() + 1)),
            extension_of(name)
        );
        copy(&in_dir.join(name), &out_dir.join(&staged))?;
        pages.push(staged);
    }

    let Some(first_page) = pages.first() else {
        anyhow::bail!("no page images to stage in {}", in_dir.display());
    };

    let (cover_file_name, cover_promoted) = match cover {
        Some(cover) => {
            let staged = format!("{}.{}", ids::COVER_FILE_ID, extension_of(cover));
            copy(&in_dir.join(cover), &out_dir.join(&staged))?;
            (staged, false)
        }
        None => {
            let staged = format!("{}.{}", ids::COVER_FILE_ID, extension_of(first_page));
            copy(&out_dir.join(first_page), &out_dir.join(&staged))?;
            tracing::info!(page = %first_page, "no cover image; using first page as cover");
            (staged, true)
        }
    };

    Ok(StagedImages {
        cover_file_name,
        cover_promoted,
        pages,
    })
}

/// Cover label first, then every staged page labelled with its position.
pub fn default_index(staged: &StagedImages, cover_label: &str) -> Vec<IndexEntry> {
    labelled(&staged.cover_file_name, staged.pages.iter().map(String::as_str), cover_label)
}

/// Default index for a directory that is packed as-is: every non-cover image
/// in name order, labelled with its position.
pub fn index_for_dir(dir: &Path, order: NameOrder, cover_label: &str) -> anyhow::Result<Vec<IndexEntry>> {
    let names = list_images(dir, order)?;
    let cover = names
        .iter()
        .find(|name| is_cover_name(name))
        .cloned()
        .unwrap_or_else(|| ids::COVER_FILE_ID.to_owned());
    let pages = names
        .iter()
        .filter(|name| !is_cover_name(name))
        .map(String::as_str);
    Ok(labelled(&cover, pages, cover_label))
}

fn labelled<'a>(
    cover_file_name: &str,
    pages: impl Iterator<Item = &'a str>,
    cover_label: &str,
) -> Vec<IndexEntry> {
    std::iter::once(IndexEntry::new(cover_file_name, cover_label))
        .chain(
            pages
                .enumerate()
                .map(|(idx, page)| IndexEntry::new(page, (idx + 1).to_string())),
        )
        .collect()
}

fn list_images(dir: &Path, order: NameOrder) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read image dir: {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read image dir entry: {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_file() {
            continue;
        }
        let known = IMAGE_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&extension_of(&name)));
        if known {
            names.push(name);
        }
    }
    sort_names(&mut names, order);
    Ok(names)
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn copy(from: &Path, to: &Path) -> anyhow::Result<()> {
    std::fs::copy(from, to)
        .with_context(|| format!("copy {} -> {}", from.display(), to.display()))?;
    Ok(())
}
