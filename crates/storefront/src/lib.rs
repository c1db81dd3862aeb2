//! Dukkan storefront library.
//!
//! This crate provides the public storefront API as a library, allowing it
//! to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
