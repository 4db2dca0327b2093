//! Core types shared across Polychat crates.
//!
//! # Architecture
//!
//! - [`types`] — normalized chat turns, request/reply shapes
//! - [`error`] — the [`error::DispatchError`] taxonomy every failure maps to
//! - [`config`] — JSON config schema + loader

pub mod config;
pub mod error;
pub mod types;

pub use error::DispatchError;
pub use types::{ChatReply, ChatRequest, ChatTurn, ModelConfig, Role};
