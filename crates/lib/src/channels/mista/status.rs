//! Provider delivery-report vocabulary to canonical status.

use super::error::MistaError;
use crate::channels::inbound::MsgStatus;

const STATUS_MAPPING: &[(&str, MsgStatus)] = &[
    ("Success", MsgStatus::Delivered),
    ("Sent", MsgStatus::Sent),
    ("Buffered", MsgStatus::Sent),
    ("Rejected", MsgStatus::Failed),
    ("Failed", MsgStatus::Failed),
    ("Expired", MsgStatus::Failed),
];

/// Exact, case-sensitive lookup. Unknown values are an integration error, never a guess.
pub fn map_status(raw: &str) -> Result<MsgStatus, MistaError> {
    STATUS_MAPPING
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, status)| *status)
        .ok_or_else(|| MistaError::UnknownStatus(raw.to_string()))
}
