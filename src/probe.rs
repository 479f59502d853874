//! TCP liveness probes.
//!
//! A probe only opens a connection and drops it; no bytes are exchanged.

use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tokio::net::TcpStream;

/// Default connect timeout for a single probe (3 seconds).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeTarget {
    pub label: String,
    pub host: String,
    pub port: u16,
}

impl ProbeTarget {
    pub fn new(label: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            label: label.into(),
            host: host.into(),
            port,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProbeState {
    Reachable,
    TimedOut,
    Unreachable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub target: ProbeTarget,
    pub state: ProbeState,
    pub observed_at: DateTime<Utc>,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (icon, status) = match self.state {
            ProbeState::Reachable => ("✅", "ONLINE"),
            ProbeState::TimedOut => ("⏰", "TIMEOUT"),
            ProbeState::Unreachable => ("❌", "OFFLINE"),
        };
        write!(
            f,
            "{icon} {} ({}:{}) - {status}",
            self.target.label, self.target.host, self.target.port
        )
    }
}

/// Probe one target over TCP.
pub async fn probe(target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
    probe_with(target, timeout, tcp_dial).await
}

/// Probe every target concurrently. Outcomes come back in input order.
pub async fn probe_all(targets: &[ProbeTarget], timeout: Duration) -> Vec<ProbeOutcome> {
    probe_all_with(targets, timeout, tcp_dial).await
}

/// Probe one target through an arbitrary dialer.
///
/// The dialer resolves to `Ok(())` once a connection is established. Only
/// the dial is bounded by `timeout`.
pub async fn probe_with<D, Fut>(target: &ProbeTarget, timeout: Duration, dial: D) -> ProbeOutcome
where
    D: FnOnce(String, u16) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let state = match tokio::time::timeout(timeout, dial(target.host.clone(), target.port)).await {
        Ok(Ok(())) => ProbeState::Reachable,
        Ok(Err(e)) => {
            tracing::debug!(host = %target.host, port = target.port, error = %e, "probe failed");
            ProbeState::Unreachable
        }
        Err(_) => ProbeState::TimedOut,
    };

    ProbeOutcome {
        target: target.clone(),
        state,
        observed_at: Utc::now(),
    }
}

/// Concurrent fan-out over `targets` with a shared dialer.
pub async fn probe_all_with<D, Fut>(
    targets: &[ProbeTarget],
    timeout: Duration,
    dial: D,
) -> Vec<ProbeOutcome>
where
    D: Fn(String, u16) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    // join_all yields results in the order the futures were supplied
    join_all(targets.iter().map(|t| probe_with(t, timeout, &dial))).await
}

async fn tcp_dial(host: String, port: u16) -> io::Result<()> {
    let stream = TcpStream::connect((host.as_str(), port)).await?;
    drop(stream);
    Ok(())
}
