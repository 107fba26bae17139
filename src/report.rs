use std::time::Duration;

use reqwest::{header::HeaderMap, StatusCode, Url};

use crate::Outcome;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Receives progress from a running probe.
///
/// Every method has an empty default so an observer only picks what it needs.
pub trait Report {
    fn started(&mut self, _url: &Url) {}

    fn connected(&mut self, _status: StatusCode, _headers: &HeaderMap) {}

    fn rejected(&mut self, _status: StatusCode, _body: &str) {}

    fn content_type_mismatch(&mut self, _content_type: &str) {}

    fn listening(&mut self) {}

    /// A non-blank line, with time since the stream began and since the
    /// previous line.
    fn line(&mut self, _elapsed: Duration, _since_last: Duration, _line: &str) {}

    fn finished(&mut self, _outcome: &Outcome) {}
}

/// Prints the probe transcript to stdout.
#[derive(Debug, Default)]
pub struct Console;

impl Console {
    pub fn banner(&self, base_url: &str, username: &str) {
        println!("SSE Endpoint Test");
        println!("{}", RULE);
        println!("Server: {}", base_url);
        println!("Username: {}", username);
        println!();
    }

    pub fn verdict(&self, outcome: &Outcome) {
        println!();
        println!("{}", RULE);
        if outcome.is_success() {
            println!("✓ SSE endpoint appears to be working correctly");
        } else {
            println!("✗ SSE endpoint has issues");
        }
    }
}

impl Report for Console {
    fn started(&mut self, url: &Url) {
        println!("Testing SSE endpoint: {}", url);
        println!("{}", RULE);
    }

    fn connected(&mut self, status: StatusCode, headers: &HeaderMap) {
        println!("✓ Connection established");
        println!("  Status Code: {}", status.as_u16());
        println!("  Headers:");
        for (name, value) in headers {
            println!("    {}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
        println!();
    }

    fn rejected(&mut self, status: StatusCode, body: &str) {
        println!("✗ Error: Expected 200, got {}", status.as_u16());
        println!("  Response: {}", body);
    }

    fn content_type_mismatch(&mut self, content_type: &str) {
        println!(
            "✗ Warning: Content-Type is '{}', expected 'text/event-stream'",
            content_type
        );
    }

    fn listening(&mut self) {
        println!("Listening for SSE events (Ctrl+C to stop)...");
        println!("{}", THIN_RULE);
    }

    fn line(&mut self, elapsed: Duration, since_last: Duration, line: &str) {
        println!(
            "[{:.1}s] ({:.3}s since last) {}",
            elapsed.as_secs_f64(),
            since_last.as_secs_f64(),
            line
        );
    }

    fn finished(&mut self, outcome: &Outcome) {
        match outcome {
            // Already printed by `rejected`.
            Outcome::Rejected { .. } => (),
            Outcome::Stalled { elapsed } => {
                println!();
                println!(
                    "✗ No events received after {:.1} seconds",
                    elapsed.as_secs_f64()
                );
                println!("  Connection might be closing immediately");
            }
            Outcome::TimedOut { after, .. } => {
                println!(
                    "✓ Connection timed out after {} seconds (this is expected for testing)",
                    after.as_secs_f64()
                );
            }
            Outcome::Closed {
                elapsed,
                events,
                premature,
            } => {
                println!();
                println!("✗ Connection closed after {:.1} seconds", elapsed.as_secs_f64());
                println!("  Total events received: {}", events);
                if *premature {
                    println!("  ⚠️  Connection closed very quickly - likely an error");
                }
            }
            Outcome::Interrupted { .. } => {
                println!();
                println!();
                println!("✓ Test interrupted by user (connection was alive)");
            }
            Outcome::ConnectFailed(err) => {
                println!("✗ Connection error: {}", err.chain());
            }
            Outcome::Failed(err) => {
                println!("✗ Unexpected error: {}", err.chain());
            }
        }
    }
}
