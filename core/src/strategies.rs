//! # Strategy Module
//!
//! Defines the `RegistrationStrategy` trait and implementations (e.g. `BeegoStrategy`)
//! to allow emitting registration files for different web frameworks.

/// Strategy trait definition.
pub mod traits;

/// Beego implementation.
pub mod beego;

pub use beego::BeegoStrategy;
pub use traits::RegistrationStrategy;
