//! PDF Split Server Library
//!
//! Exposes the split pipeline and the HTTP router for integration tests.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `split`: range parsing, workspaces, extraction and result assembly
//! - `routes`: HTTP handlers
//! - `config` / `state`: configuration and shared state

pub mod config;
pub mod routes;
pub mod split;
pub mod state;
