//! Top-level facade crate for crosswire.
//!
//! Re-exports the codec core, the message catalogue and the node runtime so
//! users can depend on a single crate.

pub mod core {
    pub use crosswire_core::*;
}

pub mod messages {
    pub use crosswire_messages::*;
}

pub mod node {
    pub use crosswire_node::*;
}
