use std::io::Write;
use tokio::sync::mpsc::Receiver;
use tokio::sync::Mutex;
use tracing::{error, info};

mod finding;

pub use finding::{Finding, FindingSeverity, FindingType, ALERT_ID};

/// Writes findings as JSON lines. Delivery beyond the writer is left to
/// whatever consumes the stream.
pub struct AlertEmitter<W: Write + Send> {
    out: Mutex<W>,
}

impl AlertEmitter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> AlertEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub async fn emit(&self, finding: &Finding) -> eyre::Result<()> {
        info!(
            alert_id = %finding.alert_id,
            protocol = %finding.protocol,
            "Emitting finding: {}",
            finding.name
        );

        let line = serde_json::to_string(finding)?;

        let mut out = self.out.lock().await;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }

    /// Emits everything sent on `rx` until every sender is gone, including
    /// findings still buffered when the producer stops.
    pub async fn drain(&self, mut rx: Receiver<Finding>) {
        while let Some(finding) = rx.recv().await {
            if let Err(e) = self.emit(&finding).await {
                error!("Failed to emit finding: {}", e);
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_one_json_line_per_finding() {
        let emitter = AlertEmitter::new(Vec::new());
        let first = Finding::info("a", "first", ALERT_ID, "MAINNET").with_metadata("k", 1u8);
        let second = Finding::info("b", "second", ALERT_ID, "NETHERMIND");

        emitter.emit(&first).await.unwrap();
        emitter.emit(&second).await.unwrap();

        let written = String::from_utf8(emitter.into_inner()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: Finding = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, first);
        let parsed: Finding = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, second);
    }

    #[tokio::test]
    async fn drain_flushes_buffered_findings_after_producer_stops() {
        let emitter = AlertEmitter::new(Vec::new());
        let (tx, rx) = tokio::sync::mpsc::channel(100);

        for id in 0..5u8 {
            tx.send(Finding::info("a", "d", ALERT_ID, "MAINNET").with_metadata("id", id))
                .await
                .unwrap();
        }
        drop(tx);

        emitter.drain(rx).await;

        let written = String::from_utf8(emitter.into_inner()).unwrap();
        let ids: Vec<String> = written
            .lines()
            .map(|line| serde_json::from_str::<Finding>(line).unwrap().metadata["id"].clone())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }
}
