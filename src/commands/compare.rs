use std::io;
use std::path::Path;

use anyhow::Context;
use stoker::report::{ComparisonReporter, ExitStatus};
use stoker::{CompareOptions, Comparison};
use tracing::info;

use super::common::RunOptions;

/// Flags specific to `compare`
pub struct CompareFlags {
    pub all: bool,
    pub compare_times: bool,
    pub checksum_threshold: Option<u64>,
}

pub struct Compare;

impl Compare {
    pub fn execute(
        left: &Path,
        right: &Path,
        flags: &CompareFlags,
        options: &RunOptions,
    ) -> anyhow::Result<ExitStatus> {
        let config = options.load_config()?;
        let matcher = config.matcher().context("Failed to build ignore filter")?;

        let mut compare = CompareOptions::from(&config);
        compare.compare_times |= flags.compare_times;
        if let Some(threshold) = flags.checksum_threshold {
            compare.checksum_threshold = threshold;
        }

        let left = RunOptions::open(left, &matcher)?;
        let right = RunOptions::open(right, &matcher)?;
        info!(
            left = %left.root().display(),
            right = %right.root().display(),
            "comparing trees"
        );

        let mut reporter = ComparisonReporter::new(io::stdout().lock(), options.format, flags.all);
        for result in Comparison::trees(&left, &right, compare) {
            reporter.record(result).context("Failed to write report")?;
        }
        let summary = reporter.finish().context("Failed to write report")?;

        info!(
            total = summary.total,
            differences = summary.differences(),
            "comparison finished"
        );
        Ok(summary.exit_status())
    }
}
