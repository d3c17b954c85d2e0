//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration loading, logging setup, and wiring adapters
//! into the pricing service.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions

pub mod config;
pub mod factory;
