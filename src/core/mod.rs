//! Core library components.

pub mod cache;
pub mod domain;
