//! AWS-oriented adapters and handlers for the product-catalog Lambda
//! functions.
//!
//! This crate owns runtime integration details (Lambda binaries, the
//! token-validator invocation, and the DynamoDB item store) behind seam
//! traits, so the handlers stay pure request/response functions over the
//! contracts in `catalog_core`.

pub mod adapters;
pub mod handlers;
