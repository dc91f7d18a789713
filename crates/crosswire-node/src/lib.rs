//! crosswire node runtime.
//!
//! Wires the strict config, the variant registries, the action dispatcher and
//! the built-in notification services into one in-process node. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod services;

pub use app_state::NodeState;
pub use client::NodeClient;
pub use dispatch::{ActionCtx, ActionHandler, Dispatcher};
