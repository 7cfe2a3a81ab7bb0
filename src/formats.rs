use std::path::Path;

use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "ja";
pub const DEFAULT_COVER_LABEL: &str = "表紙";
pub const DEFAULT_TOC_TITLE: &str = "目次";

/// One `(file_name, label)` pair of the caller's table of contents.
///
/// Index files accept either `[file_name, label]` pairs or
/// `{file_name, label}` maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIndexEntry")]
pub struct IndexEntry {
    pub file_name: String,
    pub label: String,
}

impl IndexEntry {
    pub fn new(file_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndexEntry {
    Pair(String, String),
    Named { file_name: String, label: String },
}

impl From<RawIndexEntry> for IndexEntry {
    fn from(raw: RawIndexEntry) -> Self {
        match raw {
            RawIndexEntry::Pair(file_name, label) | RawIndexEntry::Named { file_name, label } => {
                Self { file_name, label }
            }
        }
    }
}

/// Reads an index file. YAML and JSON are both accepted.
pub fn load_index(path: &Path) -> anyhow::Result<Vec<IndexEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read index: {}", path.display()))?;
    let entries: Vec<IndexEntry> = serde_yaml::from_str(&contents)
        .with_context(|| format!("parse index: {}", path.display()))?;
    Ok(entries)
}

/// Writes an index file; `.json` paths get JSON, anything else YAML.
pub fn write_index(path: &Path, entries: &[IndexEntry]) -> anyhow::Result<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let contents = if is_json {
        let mut json = serde_json::to_string_pretty(entries).context("serialize index json")?;
        json.push('\n');
        json
    } else {
        serde_yaml::to_string(entries).context("serialize index yaml")?
    };
    std::fs::write(path, contents).with_context(|| format!("write index: {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageDirection {
    /// Right to left (manga).
    #[default]
    Rtl,
    Ltr,
}

impl PageDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            PageDirection::Rtl => "rtl",
            PageDirection::Ltr => "ltr",
        }
    }

    pub fn writing_mode(self) -> &'static str {
        match self {
            PageDirection::Rtl => "horizontal-rl",
            PageDirection::Ltr => "horizontal-lr",
        }
    }
}

/// How reading systems should lay pages out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PanelView {
    /// One page at a time.
    #[default]
    Single,
    /// Two-page spreads in landscape orientation.
    Spread,
    /// Left to the reading system.
    Auto,
}

impl PanelView {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelView::Single => "single",
            PanelView::Spread => "spread",
            PanelView::Auto => "auto",
        }
    }

    /// Value of the `rendition:spread` property.
    pub fn rendition_spread(self) -> &'static str {
        match self {
            PanelView::Single => "none",
            PanelView::Spread => "landscape",
            PanelView::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub title: String,
    pub creator1: Option<String>,
    pub creator2: Option<String>,
    pub uuid: Uuid,
    /// `dcterms:modified`, UTC with second precision (`2024-01-02T03:04:05Z`).
    pub modified: String,
    pub language: String,
    pub direction: PageDirection,
    pub panel_view: PanelView,
    pub toc_title: String,
}

impl PackageMetadata {
    /// Metadata stamped with a fresh UUID and the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator1: None,
            creator2: None,
            uuid: Uuid::new_v4(),
            modified: format_modified(Utc::now()),
            language: DEFAULT_LANGUAGE.to_owned(),
            direction: PageDirection::default(),
            panel_view: PanelView::default(),
            toc_title: DEFAULT_TOC_TITLE.to_owned(),
        }
    }

    /// Creators that are present and not blank, in order.
    pub fn creators(&self) -> impl Iterator<Item = &str> {
        [self.creator1.as_deref(), self.creator2.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

pub fn format_modified(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
