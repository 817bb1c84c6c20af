//! Model layer module.
//!
//! This module provides access to schemas, key casing and shared model
//! handles.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "core")]
//! use inkjet::core::{KeyCase, ModelSchema};
//! ```

#[cfg(feature = "core")]
pub use inkjet_core::*;
