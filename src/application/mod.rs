//! Application services that orchestrate domain types and ports.

pub mod pricing;
