//! Main sync command

use crate::config::{Config, ReportFormat};
use crate::engine::{sync_all, CancelToken, RunReport, SyncEvent, SyncOptions};
use crate::types::OnewayError;
use crate::ui::{ConsoleReporter, JsonReporter};

/// Run the sync operation described by `config`.
///
/// The returned report carries every per-pair and per-entry outcome;
/// callers decide the process exit status from it.
pub fn run(config: Config) -> Result<RunReport, OnewayError> {
    config.validate()?;

    let options = SyncOptions {
        threads: config.threads,
        cancel: CancelToken::new(),
    };

    let report = match config.report {
        ReportFormat::Text => {
            let reporter = ConsoleReporter::new(config.quiet);
            let callback = move |event: &SyncEvent| reporter.render(event);
            sync_all(&config.pairs, &options, Some(&callback))
        }
        ReportFormat::Json => {
            let reporter = JsonReporter::new();
            let callback = move |event: &SyncEvent| reporter.render(event);
            sync_all(&config.pairs, &options, Some(&callback))
        }
    };

    Ok(report)
}
