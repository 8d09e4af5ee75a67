//! WebSocket module for live reload notifications
//!
//! Browsers connect to the subscription path and receive `{"reload": true}`
//! whenever the watch loop detects a change.

pub mod events;
pub mod handler;
pub mod registry;
pub mod state;

pub use events::ReloadMessage;
pub use registry::{
    BroadcastReport, ChannelSubscriber, Registry, SendError, Subscriber, SubscriberId,
};
pub use state::AppState;
