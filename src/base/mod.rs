//! Foundation types shared by every layer of the compiler:
//! - [`ElementId`] - stable string identifiers (`xmi:id`)
//! - Domain constants (cardinality sentinels, XMI attribute names)
//!
//! This module has NO dependencies on other modules of the crate.

pub mod constants;
mod element_id;

pub use element_id::ElementId;
