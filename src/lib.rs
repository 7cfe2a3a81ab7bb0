#![forbid(unsafe_code)]

pub mod assets;
pub mod build;
pub mod classify;
pub mod cli;
pub mod epub;
pub mod error;
pub mod formats;
pub mod generate;
pub mod ids;
pub mod logging;
pub mod ordering;
pub mod pack;
pub mod package;
pub mod report;
pub mod stage;
pub mod toc;

pub use error::{Error, Result};
pub use generate::{GenerateRequest, GenerateSummary, generate};
