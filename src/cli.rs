use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stoker::report::Format;

/// Directory tree comparison and accessibility audit tool
///
/// Compare two trees for missing, extra and differing objects, or audit one
/// tree for objects the current user cannot read
#[derive(Parser, Debug)]
#[command(name = "stoker")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Skip paths matching a gitignore-style pattern (repeatable)
    #[arg(long, global = true, value_name = "PATTERN")]
    pub ignore: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two directory trees
    Compare {
        /// Reference tree
        left: PathBuf,

        /// Tree compared against the reference
        right: PathBuf,

        /// List matching paths as well as differences
        #[arg(long)]
        all: bool,

        /// Report files whose modification times differ
        #[arg(long)]
        compare_times: bool,

        /// Compare files above this size by SHA-256 (e.g. 4096, 64K, 8M, 1G)
        #[arg(long, value_name = "SIZE", value_parser = parse_size)]
        checksum_threshold: Option<u64>,
    },

    /// Report objects the current user cannot read
    #[command(name = "check_access", visible_alias = "check-access")]
    CheckAccess {
        /// Tree to audit
        dir: PathBuf,
    },

    /// Find objects by type extension and owner
    Find {
        /// Tree to search
        dir: PathBuf,

        /// Comma separated type extensions (e.g. fastq,bam)
        #[arg(short = 'e', long = "extensions", value_name = "EXTS")]
        extensions: Option<String>,

        /// Comma separated owner names
        #[arg(short = 'u', long = "users", value_name = "USERS")]
        users: Option<String>,

        /// Exclude .gz and .bz2 files
        #[arg(long)]
        no_compressed: bool,

        /// Print absolute paths
        #[arg(short = 'f', long)]
        full_paths: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One line per entry plus a summary
    Text,
    /// A single JSON document
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Parse a byte count with an optional K, M or G suffix (powers of 1024)
fn parse_size(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let (digits, multiplier) = match value.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => {
            let multiplier = match c.to_ascii_uppercase() {
                'K' => 1 << 10,
                'M' => 1 << 20,
                'G' => 1 << 30,
                _ => return Err(format!("unknown size suffix '{c}'")),
            };
            (&value[..i], multiplier)
        }
        _ => (value, 1),
    };

    let count: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{value}'"))?;
    let bytes = count
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{value}' is too large"))?;

    if bytes == 0 {
        return Err("size must be greater than zero".to_string());
    }
    Ok(bytes)
}
