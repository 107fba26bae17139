use std::time::Duration;

use reqwest::StatusCode;

use crate::Error;

/// How a probe ended.
#[derive(Debug)]
pub enum Outcome {
    /// The server answered with something other than 200.
    Rejected { status: StatusCode, body: String },

    /// Lines kept arriving but none of them carried anything within the grace
    /// window.
    Stalled { elapsed: Duration },

    /// Nothing arrived for a whole timeout period while the connection stayed
    /// open.
    TimedOut { after: Duration, events: u64 },

    /// The server ended the stream.
    Closed {
        elapsed: Duration,
        events: u64,
        premature: bool,
    },

    /// The user stopped the probe.
    Interrupted { events: u64 },

    ConnectFailed(Error),

    Failed(Error),
}

impl Outcome {
    /// A connection that outlived the timeout, or was alive when the user
    /// stopped it, counts as working.
    pub fn is_success(&self) -> bool {
        match self {
            Self::TimedOut { .. } | Self::Interrupted { .. } => true,
            Self::Closed {
                events, premature, ..
            } => !premature && *events > 0,
            Self::Rejected { .. } | Self::Stalled { .. } => false,
            Self::ConnectFailed(_) | Self::Failed(_) => false,
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
