//! Typobot — a Telegram bot that fixes typography.
//!
//! Relays chat messages through the Art. Lebedev Typograf SOAP service and
//! sends the corrected text back. Each chat can pick how substituted
//! characters are encoded with `/set_type`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod typograf;

pub mod router;
pub mod session;
pub mod telegram;
