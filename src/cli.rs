use clap::{Args, Parser, Subcommand};

use crate::formats::{DEFAULT_COVER_LABEL, DEFAULT_LANGUAGE, DEFAULT_TOC_TITLE, PageDirection, PanelView};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pack a prepared image directory (must contain `cover.<ext>`) into an EPUB.
    Pack(PackArgs),
    /// Copy images into package names, promoting the first page to cover if needed.
    Stage(StageArgs),
    /// Stage then pack in one step.
    Build(BuildArgs),
}

#[derive(Debug, Clone, Args)]
pub struct MetadataArgs {
    /// Book title.
    #[arg(long)]
    pub title: String,

    /// First author.
    #[arg(long)]
    pub creator: Option<String>,

    /// Second author.
    #[arg(long)]
    pub creator2: Option<String>,

    /// Page progression direction.
    #[arg(long, value_enum, default_value_t = PageDirection::Rtl)]
    pub direction: PageDirection,

    /// Panel view mode.
    #[arg(long, value_enum, default_value_t = PanelView::Single)]
    pub panel_view: PanelView,

    /// BCP-47 language tag for package metadata and documents.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Heading of the navigation document.
    #[arg(long, default_value = DEFAULT_TOC_TITLE)]
    pub toc_title: String,

    /// Cover label used when the index is derived from the images.
    #[arg(long, default_value = DEFAULT_COVER_LABEL)]
    pub cover_label: String,

    /// Package identifier (default: a fresh v4 UUID per run).
    #[arg(long)]
    pub uuid: Option<uuid::Uuid>,
}

#[derive(Debug, Args)]
pub struct PackArgs {
    /// Directory with `cover.<ext>` and the page images.
    #[arg(long)]
    pub images: String,

    /// Output EPUB path.
    #[arg(long)]
    pub out: String,

    /// Index file (YAML or JSON list of `[file_name, label]`); the first entry labels the cover.
    #[arg(long)]
    pub index: Option<String>,

    /// Replace an existing output file.
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

#[derive(Debug, Args)]
pub struct StageArgs {
    /// Directory with source images.
    #[arg(long)]
    pub images: String,

    /// Output directory for staged images (must not exist).
    #[arg(long)]
    pub out: String,

    /// Also write a default index to this path (`.json` for JSON, otherwise YAML).
    #[arg(long)]
    pub index_out: Option<String>,

    /// Label of the cover entry in the written index.
    #[arg(long, default_value = DEFAULT_COVER_LABEL)]
    pub cover_label: String,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Directory with source images; a cover is optional.
    #[arg(long)]
    pub images: String,

    /// Output EPUB path.
    #[arg(long)]
    pub out: String,

    /// Replace an existing output file.
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}
