use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::cli::InitArgs;
use crate::error::ScaffoldError;
use crate::events::{AbortReason, Event};
use crate::exit_codes::exit;
use crate::guard;
use crate::materialize;
use crate::model::{MaterializeReport, ScaffoldOptions};
use crate::reporter::Reporter;
use crate::resolve;

/// Run `init` against the process working directory.
pub fn init(args: InitArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("cannot read the current working directory")?;
    run(args, &cwd)
}

/// Run `init` with relative paths resolved against `cwd`.
///
/// Scaffold failures become an exit code plus an aborted event; anything
/// else is returned as an error.
pub fn run(args: InitArgs, cwd: &Path) -> Result<i32> {
    let mut reporter = Reporter::new(args.json);
    let run_id = uuid::Uuid::new_v4();
    let started = Instant::now();

    match scaffold(&args, cwd, run_id, &mut reporter) {
        Ok((options, report)) => {
            reporter.record(Event::ScaffoldCompleted {
                run_id,
                destination: options.destination,
                dry_run: options.dry_run,
                report,
                elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            });
            Ok(exit::SUCCESS)
        }
        Err(err) => {
            let failure = err.downcast::<ScaffoldError>()?;
            info!(error = %failure, "scaffold aborted");
            reporter.record(Event::ScaffoldAborted {
                run_id,
                reason: AbortReason::from(&failure),
                message: failure.user_message(),
                partial: failure.may_have_written(),
            });
            Ok(failure.exit_code())
        }
    }
}

fn scaffold(
    args: &InitArgs,
    cwd: &Path,
    run_id: uuid::Uuid,
    reporter: &mut Reporter,
) -> Result<(ScaffoldOptions, MaterializeReport)> {
    let destination = resolve::resolve_destination(cwd, &args.target)?;

    // Nothing below may write before this check.
    if guard::is_initialized(&destination, guard::SENTINEL) {
        return Err(ScaffoldError::AlreadyInitialized {
            destination,
            sentinel: guard::SENTINEL.to_string(),
        }
        .into());
    }

    // Held until the copy finishes; an embedded template lives in a scratch dir.
    let template = resolve::locate_template_root(cwd, args.templates.as_deref())?;

    let mut options = ScaffoldOptions::new(destination, template.path());
    options.dry_run = args.dry_run;
    options.preserve_timestamps = args.preserve_timestamps;

    info!(
        destination = %options.destination.display(),
        template = %options.template_root.display(),
        dry_run = options.dry_run,
        "scaffolding"
    );
    reporter.record(Event::ScaffoldStarted {
        run_id,
        started_at: chrono::Utc::now(),
        destination: options.destination.clone(),
        template: options.template_root.clone(),
        dry_run: options.dry_run,
    });

    let report = materialize::materialize(&options, reporter)?;
    Ok((options, report))
}
