//! HTTP API: configuration, server wiring, routing, and the auth gate.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
