//! Mista SMS channel adapter — webhook normalization, outbound sends, and the
//! gateway and configuration used by the CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod init;
pub mod urn;
