//! Provider adapter layer for Polychat.
//!
//! One adapter per wire dialect: a pure message formatter plus an HTTP
//! invoker, selected by a closed [`registry::Provider`] enum so that adding
//! a provider is a compile-checked exhaustive-match addition.
//!
//! # Architecture
//!
//! - [`registry`] — static descriptors for all supported providers
//! - [`format`] — pure `(history, new message)` → wire payload translation
//! - [`invoke`] — the single outbound HTTP round trip per dialect
//! - [`dispatch::Dispatcher`] — entry point tying the three together

pub mod dispatch;
pub mod format;
pub mod invoke;
pub mod registry;

// Re-export main types for convenience
pub use dispatch::Dispatcher;
pub use invoke::ProviderClient;
pub use registry::{AuthMode, Dialect, ModelInfo, Provider, ProviderDescriptor};
