//! # mossdb Configuration Module
//!
//! Centralizes the page-format constants and their compile-time invariant
//! checks. Import constants from here rather than redefining them locally;
//! the values are part of the on-disk format.

pub mod constants;
pub use constants::*;
