//! Common library for the Artfolio application
//!
//! This crate provides shared functionality used by the API service and the
//! client library: database connectivity, error types, and the JSON models
//! exchanged over the REST surface.

pub mod database;
pub mod error;
pub mod models;
