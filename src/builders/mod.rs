//! # Builders
//!
//! Builder patterns for validated configuration.
//!
//! ## Modules
//!
//! - [`policy_builder`] - Builder for [`PasswordPolicy`](crate::PasswordPolicy)

pub mod policy_builder;
