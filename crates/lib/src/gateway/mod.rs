//! Gateway: HTTP webhook endpoints for the configured channels.
//!
//! The host builds the router from an explicit [`ChannelRegistry`](crate::channels::ChannelRegistry)
//! and receives canonical events on an mpsc channel.

mod protocol;
mod server;

pub use protocol::{ResponseData, WebhookResponse};
pub use server::{router, run_gateway, GatewayState};
