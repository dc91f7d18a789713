//! Action dispatch: opaque requests in, opaque responses out.

pub mod dispatcher;

pub use dispatcher::{ActionCtx, ActionHandler, Dispatcher};
