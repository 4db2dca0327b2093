//! HTTP gateway for Polychat.
//!
//! The gateway is glue: it parses the inbound JSON, hands the adapter layer
//! a resolved `(provider, model, api key)` plus history, and renders either
//! the normalized reply or a `(status, {"detail"})` error pair. The chat
//! route holds no state between requests.
//!
//! # Architecture
//!
//! - [`server`] — router, handlers, error mapping, [`server::serve`]
//! - [`auth`] — the [`auth::CredentialStore`] boundary + in-memory mock

pub mod auth;
pub mod server;

pub use auth::{CredentialStore, MemoryCredentialStore, UserProfile};
pub use server::{router, serve, AppState};
