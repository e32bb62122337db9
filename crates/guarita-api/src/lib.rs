//! HTTP boundary to the guarita PHP backend.
//!
//! The backend speaks a single RPC-over-POST convention: a JSON envelope
//! `{"request": "<operation>", ...params}` sent to one fixed URL, answered by
//! a JSON object that always carries `RESULT: bool`. This crate owns the
//! envelope, the fixed header set, and the typed wire shapes of every payload
//! the front-end consumes.

pub mod client;
pub mod config;
pub mod wire;

pub use client::{failure_text, result_ok, ApiClient, ApiError, CallOptions, Method, Redirect};
pub use config::{ApiConfig, Environment};
