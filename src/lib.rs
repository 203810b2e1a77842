//! # stoker
//!
//! Core library for comparing directory trees and auditing them for
//! accessibility problems.
//!
//! A [`scanner::TreeWalker`] enumerates a tree lazily and turns per-node
//! failures into data. [`comparison::Comparison`] merge-joins two walks,
//! [`access::AccessChecker`] audits one walk, and [`find`] searches one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

/// Logging setup
pub mod logging;

/// Lazy, fault-tolerant directory tree walking
pub mod scanner;

/// Merge-join comparison of two walks
pub mod comparison;

/// Permission auditing of a walk
pub mod access;

/// Searching a walk by extension and owner
pub mod find;

/// Configuration file parsing and management
pub mod config;

/// Rendering of results and exit status
pub mod report;

pub use access::{AccessChecker, AccessIssue, IssueReason};
pub use comparison::{Classification, CompareOptions, Comparison, ComparisonResult};
pub use config::{Config, ConfigManager};
pub use error::{Result, StokerError};
pub use find::FindCriteria;
pub use scanner::{AccessReason, FsObject, ObjectKind, ObjectMeta, TreeWalker};
