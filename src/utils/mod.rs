//! # utils
//!
//! Utilities

pub mod fmt;
#[cfg(target_family = "unix")]
pub mod smb;
pub mod url;
