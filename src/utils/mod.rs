//! Utility modules for common functionality

pub mod exit_codes;

pub use exit_codes::{NO_EXIT_CODE, describe_exit};
