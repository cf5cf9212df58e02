//! Mista SMS provider: inbound webhook normalization and outbound sends.
//!
//! Inbound: [`build_inbound_message`] / [`build_status`] turn decoded webhook forms into
//! canonical events. Outbound: [`SendAdapter`] renders the JSON request, calls the provider
//! once and reports a terminal status.

mod error;
mod inbound;
mod request;
mod response;
mod send;
mod status;
mod timestamp;

pub use error::MistaError;
pub use inbound::{build_inbound_message, build_status, InboundPayload, StatusPayload};
pub use request::{build_send_request, SendRequest, SendRequestBody};
pub use response::interpret_response;
pub use send::SendAdapter;
pub use status::map_status;
pub use timestamp::{parse_timestamp, resolve_timestamp};

/// Channel type code used in webhook routes (`/c/mx/{uuid}/...`).
pub const CHANNEL_TYPE: &str = "mx";
