use std::{future::Future, pin::Pin};

use futures_util::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::time::{timeout, Instant};
use tracing::{debug, trace};

use crate::{body::IntoLines, Error, Outcome, ProbeConfig, Report};

const EVENT_STREAM: &str = "text/event-stream";

/// A single diagnostic run against one SSE endpoint.
pub struct Probe {
    client: Client,
    config: ProbeConfig,
}

impl Probe {
    pub fn new(config: ProbeConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Connects, streams lines into `report` and returns how it ended.
    ///
    /// `interrupt` resolving at any point while waiting for the response,
    /// reading a rejection body or streaming stops the probe with
    /// [`Outcome::Interrupted`]. The connection is dropped on every way out.
    pub async fn run<R, I>(&self, report: &mut R, interrupt: I) -> Outcome
    where
        R: Report + ?Sized,
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        let outcome = self.attempt(report, interrupt).await;
        debug!(success = outcome.is_success(), ?outcome, "probe finished");

        report.finished(&outcome);
        outcome
    }

    async fn attempt<R, I>(&self, report: &mut R, mut interrupt: Pin<&mut I>) -> Outcome
    where
        R: Report + ?Sized,
        I: Future<Output = ()>,
    {
        let after = self.config.timeout;

        let url = match self.config.endpoint() {
            Ok(url) => url,
            Err(err) => return Outcome::Failed(err),
        };
        report.started(&url);
        debug!(%url, ?after, "sending request");

        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, EVENT_STREAM)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .send();

        let response = tokio::select! {
            res = timeout(after, request) => match res {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => return failure(Error::from(err)),
                Err(_) => return Outcome::TimedOut { after, events: 0 },
            },
            _ = &mut interrupt => return Outcome::Interrupted { events: 0 },
        };

        let status = response.status();
        debug!(%status, "response received");
        report.connected(status, response.headers());

        if status != StatusCode::OK {
            let body = tokio::select! {
                res = timeout(after, response.text()) => match res {
                    Ok(Ok(body)) => body,
                    _ => String::new(),
                },
                _ = &mut interrupt => return Outcome::Interrupted { events: 0 },
            };
            report.rejected(status, &body);
            return Outcome::Rejected { status, body };
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
        if !content_type.contains(EVENT_STREAM) {
            report.content_type_mismatch(&content_type);
        }

        report.listening();

        let mut lines = Box::pin(response.bytes_stream()).into_lines();
        let start = Instant::now();
        let mut last = start;
        let mut events: u64 = 0;

        loop {
            let next = tokio::select! {
                next = timeout(after, lines.next()) => next,
                _ = &mut interrupt => return Outcome::Interrupted { events },
            };

            let line = match next {
                Err(_) => return Outcome::TimedOut { after, events },
                Ok(None) => break,
                Ok(Some(Err(err))) => return failure(Error::from(err)),
                Ok(Some(Ok(line))) => line,
            };

            let now = Instant::now();
            let elapsed = now.duration_since(start);

            if line.is_empty() {
                trace!(?elapsed, "blank line");
            } else {
                events += 1;
                let since_last = now.duration_since(last);
                last = now;
                report.line(elapsed, since_last, &line);
            }

            // Only checked when something arrives. A silent server is left to
            // the timeout.
            if elapsed > self.config.grace && events == 0 {
                return Outcome::Stalled { elapsed };
            }
        }

        let elapsed = start.elapsed();
        Outcome::Closed {
            elapsed,
            events,
            premature: elapsed < self.config.min_lifetime,
        }
    }
}

fn failure(err: Error) -> Outcome {
    if err.is_connect() {
        Outcome::ConnectFailed(err)
    } else {
        Outcome::Failed(err)
    }
}
