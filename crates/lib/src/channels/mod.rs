//! Channel types shared by the adapter and the gateway.
//!
//! `ChannelConfig` is host-owned configuration; `inbound`/`outbound` hold the canonical
//! events exchanged with the host. Provider specifics live under [`mista`].

mod channel;
mod inbound;
pub mod mista;
mod outbound;
mod registry;

pub use channel::{ChannelConfig, DatePolicy, DEFAULT_SEND_URL};
pub use inbound::{CanonicalInboundMessage, CanonicalStatus, ChannelEvent, MsgStatus};
pub use outbound::{ChannelLog, OutboundMessage, OutboundSendResult};
pub use registry::ChannelRegistry;
