//! `rolegate-api` — the HTTP surface.
//!
//! Wires the crypto, auth, and directory crates into an axum server in which
//! every request passes the transport credential gate, every protected route
//! passes token and module checks, and every response body leaves as an
//! encrypted `{data, iv}` envelope.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
