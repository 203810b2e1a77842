use std::io;
use std::path::Path;

use anyhow::Context;
use stoker::report::{AccessReporter, ExitStatus};
use stoker::AccessChecker;
use tracing::info;

use super::common::RunOptions;

pub struct CheckAccess;

impl CheckAccess {
    pub fn execute(dir: &Path, options: &RunOptions) -> anyhow::Result<ExitStatus> {
        let config = options.load_config()?;
        let matcher = config.matcher().context("Failed to build ignore filter")?;
        let walker = RunOptions::open(dir, &matcher)?;
        info!(root = %walker.root().display(), "checking access");

        let checker = AccessChecker::for_current_user();
        let mut reporter = AccessReporter::new(io::stdout().lock(), options.format);
        for issue in checker.audit(&walker) {
            reporter.record(issue).context("Failed to write report")?;
        }
        let summary = reporter.finish().context("Failed to write report")?;

        info!(issues = summary.total, "access check finished");
        Ok(summary.exit_status())
    }
}
