use std::path::PathBuf;
use std::sync::Mutex;

/// Why an input file was left out of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Content matched no known image signature.
    UnknownType,
    /// The format was recognised but its dimensions could not be read.
    Dimensions(String),
    /// A second `cover.*` file; only the first in sort order is used.
    DuplicateCover { cover: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownType => f.write_str("unrecognised image type"),
            SkipReason::Dimensions(err) => write!(f, "unreadable dimensions: {err}"),
            SkipReason::DuplicateCover { cover } => write!(f, "cover already taken by {cover}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FileSkipped {
        file_name: String,
        reason: SkipReason,
    },
    ExtensionMismatch {
        file_name: String,
        declared: String,
        sniffed: String,
    },
    ClassificationComplete {
        cover: String,
        pages: usize,
        skipped: usize,
        width: u32,
        height: u32,
    },
    TocEntryUnmatched {
        position: usize,
        file_name: String,
    },
    ReconciliationComplete {
        entries: usize,
        unmatched: usize,
    },
    ArchiveWritten {
        path: PathBuf,
        bytes: u64,
    },
}

pub trait Reporter {
    fn report(&self, event: Event);
}

/// Default reporter: recoverable conditions as warnings, checkpoints as info.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: Event) {
        match event {
            Event::FileSkipped { file_name, reason } => {
                tracing::warn!(file = %file_name, %reason, "skipping image");
            }
            Event::ExtensionMismatch {
                file_name,
                declared,
                sniffed,
            } => {
                tracing::warn!(
                    file = %file_name,
                    %declared,
                    %sniffed,
                    "file extension does not match content; using sniffed type"
                );
            }
            Event::ClassificationComplete {
                cover,
                pages,
                skipped,
                width,
                height,
            } => {
                tracing::info!(%cover, pages, skipped, width, height, "classified images");
            }
            Event::TocEntryUnmatched {
                position,
                file_name,
            } => {
                tracing::warn!(position, file = %file_name, "index entry has no matching page; dropped");
            }
            Event::ReconciliationComplete { entries, unmatched } => {
                tracing::info!(entries, unmatched, "reconciled table of contents");
            }
            Event::ArchiveWritten { path, bytes } => {
                tracing::info!(path = %path.display(), bytes, "wrote epub");
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.report(Event::ReconciliationComplete {
            entries: 1,
            unmatched: 0,
        });
        reporter.report(Event::TocEntryUnmatched {
            position: 2,
            file_name: "x.png".to_owned(),
        });

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::ReconciliationComplete { .. }));
        assert!(matches!(events[1], Event::TocEntryUnmatched { position: 2, .. }));
    }

    #[test]
    fn skip_reasons_render_readably() {
        let reason = SkipReason::DuplicateCover {
            cover: "cover.png".to_owned(),
        };
        assert_eq!(reason.to_string(), "cover already taken by cover.png");
    }
}
