pub mod check_access;
pub mod common;
pub mod compare;
pub mod find;

pub use check_access::CheckAccess;
pub use common::RunOptions;
pub use compare::{Compare, CompareFlags};
pub use find::Find;
