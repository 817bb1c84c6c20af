//! Write-payload serialization module.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "serializers")]
//! use inkjet::serializers::{SerializerConfig, WritePayload};
//! ```

#[cfg(feature = "serializers")]
pub use inkjet_serializers::*;
