//! Dukkan Core - Shared types and cart reconciliation library.
//!
//! This crate provides common types used across all Dukkan components:
//! - `storefront` - Public-facing e-commerce API
//! - `admin` - Internal dashboard and dispatch API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machinery - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails,
//!   phone numbers, and statuses
//! - [`cart`] - Optimistic cart reconciliation (delta map, invalidation
//!   bus, reconciler)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
