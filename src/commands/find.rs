use std::io;
use std::path::Path;

use anyhow::Context;
use stoker::find::find;
use stoker::report::{ExitStatus, FindMatch, FindReporter};
use stoker::FindCriteria;
use tracing::{info, warn};

use super::common::RunOptions;

pub struct Find;

impl Find {
    pub fn execute(
        dir: &Path,
        criteria: &FindCriteria,
        full_paths: bool,
        options: &RunOptions,
    ) -> anyhow::Result<ExitStatus> {
        if !criteria.is_active() {
            warn!("no extensions or users given; nothing will match");
        }

        let config = options.load_config()?;
        let matcher = config.matcher().context("Failed to build ignore filter")?;
        let walker = RunOptions::open(dir, &matcher)?;
        info!(root = %walker.root().display(), "searching");

        let mut reporter = FindReporter::new(io::stdout().lock(), options.format);
        for obj in find(&walker, criteria) {
            reporter
                .record(FindMatch::from_object(obj, full_paths))
                .context("Failed to write report")?;
        }
        let total = reporter.finish().context("Failed to write report")?;

        info!(matches = total, "search finished");
        Ok(ExitStatus::Clean)
    }
}
