//! Dukkan admin dashboard library.
//!
//! This crate provides the store management API as a library, allowing it
//! to be tested and reused (the CLI uses it for operator provisioning).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
