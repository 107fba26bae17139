use std::{error::Error as StdError, fmt, io};

#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_connect(&self) -> bool {
        matches!(*self.kind, ErrorKind::Connect(_))
    }

    /// Renders the error followed by each of its sources, one per line.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kind.source()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::from(ErrorKind::InvalidUrl(err))
    }
}

impl From<reqwest::Error> for Error {
    // A connect timeout is reported as a connect failure: nothing was proven
    // about the stream. So is a socket torn down by the peer.
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || is_connection_lost(&err) {
            ErrorKind::Connect(err)
        } else {
            ErrorKind::Transport(err)
        };
        Self::from(kind)
    }
}

fn is_connection_lost(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::ConnectionRefused
            ) {
                return true;
            }
        }
        source = err.source();
    }
    false
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("invalid endpoint url")]
    InvalidUrl(#[source] url::ParseError),

    #[error("connection failed")]
    Connect(#[source] reqwest::Error),

    #[error("transport error")]
    Transport(#[source] reqwest::Error),
}
