//! Library crate for levelup-back, exposing modules for binaries and integration tests.

/// Directory seed configuration loaded at startup.
pub mod config;
/// Storage trait, entities and backends.
pub mod dao;
mod dto;
mod error;
mod formats;
/// HTTP routers and extractors.
pub mod routes;
/// Business operations behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
