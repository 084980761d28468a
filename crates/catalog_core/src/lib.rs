//! Shared product-catalog domain primitives.
//!
//! This crate owns the transport envelope, the identity contract released by
//! the token-validation service, and product record validation. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod identity;
pub mod product;
pub mod response;
