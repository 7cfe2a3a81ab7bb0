use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = fxlbook::cli::Cli::parse();
    fxlbook::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        fxlbook::cli::Command::Pack(args) => {
            fxlbook::pack::run(args).context("pack")?;
        }
        fxlbook::cli::Command::Stage(args) => {
            fxlbook::stage::run(args).context("stage")?;
        }
        fxlbook::cli::Command::Build(args) => {
            fxlbook::build::run(args).context("build")?;
        }
    }

    Ok(())
}
