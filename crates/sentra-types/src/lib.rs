//! Sentra Types - Shared domain types
//!
//! Identity and tenancy types used across Sentra services. A resolved
//! [`Identity`] is produced once per login or refresh and is immutable for
//! the lifetime of the credentials issued from it.

pub mod identity;

pub use identity::*;
