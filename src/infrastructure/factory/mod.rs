//! Factory functions that construct configured components.
//!
//! # Submodules
//!
//! - [`pricing`] - Price source and price service construction

pub mod pricing;
