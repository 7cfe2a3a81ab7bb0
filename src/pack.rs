use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::{MetadataArgs, PackArgs};
use crate::formats::{self, PackageMetadata};
use crate::generate::{self, GenerateRequest};
use crate::ordering::natural_cmp;
use crate::report::TracingReporter;
use crate::stage;

pub fn run(args: PackArgs) -> anyhow::Result<()> {
    let images_dir = PathBuf::from(&args.images);
    let out_path = PathBuf::from(&args.out);

    if out_path.exists() && !args.force {
        anyhow::bail!("epub output already exists: {}", out_path.display());
    }
    if !images_dir.is_dir() {
        anyhow::bail!("image directory not found: {}", images_dir.display());
    }

    let index = match &args.index {
        Some(path) => formats::load_index(Path::new(path))?,
        None => stage::index_for_dir(&images_dir, natural_cmp, &args.metadata.cover_label)
            .context("derive default index")?,
    };

    let request = GenerateRequest::new(
        images_dir,
        out_path,
        package_metadata(&args.metadata),
        index,
    );
    let summary = generate::generate(request, &TracingReporter).context("generate epub")?;

    println!("{}", summary.out_path.display());
    Ok(())
}

pub fn package_metadata(args: &MetadataArgs) -> PackageMetadata {
    let mut metadata = PackageMetadata::new(args.title.trim());
    metadata.creator1 = args.creator.clone();
    metadata.creator2 = args.creator2.clone();
    metadata.direction = args.direction;
    metadata.panel_view = args.panel_view;
    metadata.language = args.language.clone();
    metadata.toc_title = args.toc_title.clone();
    if let Some(uuid) = args.uuid {
        metadata.uuid = uuid;
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{PageDirection, PanelView};

    #[test]
    fn metadata_args_override_defaults() {
        let args = MetadataArgs {
            title: "  Title ".to_owned(),
            creator: Some("A".to_owned()),
            creator2: None,
            direction: PageDirection::Ltr,
            panel_view: PanelView::Spread,
            language: "en".to_owned(),
            toc_title: "Contents".to_owned(),
            cover_label: "Cover".to_owned(),
            uuid: Some(uuid::Uuid::nil()),
        };

        let metadata = package_metadata(&args);
        assert_eq!(metadata.title, "Title");
        assert_eq!(metadata.creators().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(metadata.direction, PageDirection::Ltr);
        assert_eq!(metadata.panel_view, PanelView::Spread);
        assert_eq!(metadata.language, "en");
        assert_eq!(metadata.toc_title, "Contents");
        assert!(metadata.uuid.is_nil());
    }
}
