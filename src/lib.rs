//! Checks whether a server-sent-events endpoint connects, streams and stays
//! open.
//!
//! The body is treated as plain newline separated text. No SSE fields are
//! parsed; every non-blank line counts as an event.

mod body;
mod config;
mod error;
mod lines;
mod outcome;
mod probe;
mod report;

pub use {
    body::{IntoLines, Lines},
    config::{
        ProbeConfig, DEFAULT_BASE_URL, DEFAULT_GRACE, DEFAULT_MIN_LIFETIME, DEFAULT_TIMEOUT,
        DEFAULT_USERNAME,
    },
    error::{Error, ErrorKind},
    lines::LineDecoder,
    outcome::Outcome,
    probe::Probe,
    report::{Console, Report},
};
