use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{BuildArgs, PackArgs, StageArgs};

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let out_path = PathBuf::from(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("epub output already exists: {}", out_path.display());
    }

    let scratch = tempfile::TempDir::new().context("create scratch dir")?;
    let staged_dir = scratch.path().join("images");
    let index_path = scratch.path().join("index.yaml");

    tracing::info!(images = %args.images, "build: stage");
    crate::stage::run(StageArgs {
        images: args.images.clone(),
        out: staged_dir.to_string_lossy().to_string(),
        index_out: Some(index_path.to_string_lossy().to_string()),
        cover_label: args.metadata.cover_label.clone(),
    })
    .context("stage")?;

    tracing::info!(out = %out_path.display(), "build: pack");
    crate::pack::run(PackArgs {
        images: staged_dir.to_string_lossy().to_string(),
        out: args.out.clone(),
        index: Some(index_path.to_string_lossy().to_string()),
        force: args.force,
        metadata: args.metadata,
    })
    .context("pack")?;

    Ok(())
}
