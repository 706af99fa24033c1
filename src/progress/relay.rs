//! Normalization and delivery of progress updates
//!
//! The relay turns raw subprocess output into [`ProgressUpdate`] values and
//! pushes them over an unbounded channel so the reader loop never stalls.
//! Two guarantees hold per request: the reported percent never decreases,
//! and exactly one terminal update is delivered.

use crate::progress::parse::{parse_line, ParsedLine, RawTransfer};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lifecycle stage of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStage {
    Fetching,
    Converting,
    Done,
    Failed,
}

impl DownloadStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadStage::Done | DownloadStage::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DownloadStage::Fetching => "Fetching",
            DownloadStage::Converting => "Converting",
            DownloadStage::Done => "Done",
            DownloadStage::Failed => "Failed",
        }
    }
}

/// One normalized progress report
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Completion in percent, 0.0 to 100.0
    pub percent: f32,
    /// Transfer speed in bytes per second, when the library reports one
    pub speed: Option<f64>,
    pub stage: DownloadStage,
}

/// Normalizes raw subprocess output into the update stream
pub struct ProgressRelay {
    tx: mpsc::UnboundedSender<ProgressUpdate>,
    max_percent: f32,
    stage: DownloadStage,
    terminal_sent: bool,
}

impl ProgressRelay {
    /// Create a relay and announce the initial Fetching state
    pub fn new(tx: mpsc::UnboundedSender<ProgressUpdate>) -> Self {
        let mut relay = Self {
            tx,
            max_percent: 0.0,
            stage: DownloadStage::Fetching,
            terminal_sent: false,
        };
        relay.send(ProgressUpdate {
            percent: 0.0,
            speed: None,
            stage: DownloadStage::Fetching,
        });
        relay
    }

    /// Feed one raw stdout line from the subprocess
    pub fn observe_line(&mut self, line: &str) {
        match parse_line(line) {
            Some(ParsedLine::Transfer(transfer)) => self.on_transfer(transfer),
            Some(ParsedLine::Postprocess(tag)) => self.on_postprocess(&tag),
            None => {}
        }
    }

    /// Emit the single successful terminal update
    pub fn complete(&mut self) {
        if self.terminal_sent {
            warn!("Terminal update already sent, ignoring complete()");
            return;
        }
        self.max_percent = 100.0;
        self.stage = DownloadStage::Done;
        self.terminal_sent = true;
        self.send(ProgressUpdate {
            percent: 100.0,
            speed: None,
            stage: DownloadStage::Done,
        });
    }

    /// Emit the single failed terminal update
    pub fn fail(&mut self) {
        if self.terminal_sent {
            warn!("Terminal update already sent, ignoring fail()");
            return;
        }
        self.stage = DownloadStage::Failed;
        self.terminal_sent = true;
        self.send(ProgressUpdate {
            percent: self.max_percent,
            speed: None,
            stage: DownloadStage::Failed,
        });
    }

    pub fn stage(&self) -> DownloadStage {
        self.stage
    }

    pub fn last_percent(&self) -> f32 {
        self.max_percent
    }

    pub fn terminal_sent(&self) -> bool {
        self.terminal_sent
    }

    fn on_transfer(&mut self, transfer: RawTransfer) {
        if self.terminal_sent {
            return;
        }

        // The library restarts its byte counter per media stream (video,
        // then audio), so a freshly computed percent can sit below the one
        // already shown. Clamp to the running maximum.
        if let Some(total) = transfer.total_bytes {
            if total > 0 {
                let percent = (transfer.downloaded_bytes as f64 / total as f64 * 100.0) as f32;
                self.max_percent = self.max_percent.max(percent.clamp(0.0, 100.0));
            }
        }

        self.send(ProgressUpdate {
            percent: self.max_percent,
            speed: transfer.speed,
            stage: self.stage,
        });
    }

    fn on_postprocess(&mut self, tag: &str) {
        if self.terminal_sent || self.stage == DownloadStage::Converting {
            return;
        }

        debug!("Post-processing started: {}", tag);
        self.stage = DownloadStage::Converting;
        self.send(ProgressUpdate {
            percent: self.max_percent,
            speed: None,
            stage: DownloadStage::Converting,
        });
    }

    fn send(&mut self, update: ProgressUpdate) {
        if self.tx.send(update).is_err() {
            debug!("Progress receiver dropped, update discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay_with_rx() -> (ProgressRelay, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ProgressRelay::new(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ProgressUpdate>) -> Vec<ProgressUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    // ============================================================
    // INITIAL STATE
    // ============================================================

    #[test]
    fn test_new_relay_announces_fetching_at_zero() {
        let (_relay, mut rx) = relay_with_rx();
        let updates = drain(&mut rx);

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].percent, 0.0);
        assert_eq!(updates[0].stage, DownloadStage::Fetching);
    }

    // ============================================================
    // TRANSFER NORMALIZATION
    // ============================================================

    #[test]
    fn test_transfer_lines_advance_percent() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("vg-progress|250|1000|NA|100.0");
        relay.observe_line("vg-progress|500|1000|NA|120.0");

        let updates = drain(&mut rx);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[1].percent, 25.0);
        assert_eq!(updates[1].speed, Some(100.0));
        assert_eq!(updates[2].percent, 50.0);
    }

    #[test]
    fn test_percent_never_regresses_across_streams() {
        let (mut relay, mut rx) = relay_with_rx();
        // Video stream runs to completion
        relay.observe_line("vg-progress|1000|1000|NA|NA");
        // Audio stream restarts the counter
        relay.observe_line("vg-progress|10|1000|NA|NA");

        let updates = drain(&mut rx);
        assert_eq!(updates[1].percent, 100.0);
        assert_eq!(updates[2].percent, 100.0);
    }

    #[test]
    fn test_unknown_total_keeps_last_percent() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("vg-progress|500|1000|NA|NA");
        relay.observe_line("vg-progress|600|NA|NA|333.0");

        let updates = drain(&mut rx);
        assert_eq!(updates[2].percent, 50.0);
        assert_eq!(updates[2].speed, Some(333.0));
    }

    #[test]
    fn test_unparseable_lines_emit_nothing() {
        let (mut relay, mut rx) = relay_with_rx();
        drain(&mut rx);

        relay.observe_line("[youtube] abc: Downloading webpage");
        relay.observe_line("random noise");

        assert!(drain(&mut rx).is_empty());
    }

    // ============================================================
    // STAGE TRANSITIONS
    // ============================================================

    #[test]
    fn test_postprocess_marker_moves_to_converting_once() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("vg-progress|1000|1000|NA|NA");
        relay.observe_line("[Merger] Merging formats into \"clip.mp4\"");
        relay.observe_line("[FixupM4a] Correcting container");

        let updates = drain(&mut rx);
        let converting: Vec<_> = updates
            .iter()
            .filter(|u| u.stage == DownloadStage::Converting)
            .collect();
        assert_eq!(converting.len(), 1);
        assert_eq!(converting[0].percent, 100.0);
        assert_eq!(relay.stage(), DownloadStage::Converting);
    }

    #[test]
    fn test_transfer_after_converting_keeps_stage() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("[Merger] Merging formats");
        relay.observe_line("vg-progress|10|100|NA|NA");

        let updates = drain(&mut rx);
        assert_eq!(updates.last().unwrap().stage, DownloadStage::Converting);
    }

    // ============================================================
    // TERMINAL GUARANTEES
    // ============================================================

    #[test]
    fn test_complete_emits_done_at_full_percent() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("vg-progress|500|1000|NA|NA");
        relay.complete();

        let updates = drain(&mut rx);
        let last = updates.last().unwrap();
        assert_eq!(last.stage, DownloadStage::Done);
        assert_eq!(last.percent, 100.0);
        assert!(relay.terminal_sent());
    }

    #[test]
    fn test_fail_preserves_reached_percent() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.observe_line("vg-progress|250|1000|NA|NA");
        relay.fail();

        let updates = drain(&mut rx);
        let last = updates.last().unwrap();
        assert_eq!(last.stage, DownloadStage::Failed);
        assert_eq!(last.percent, 25.0);
    }

    #[test]
    fn test_exactly_one_terminal_update() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.complete();
        relay.complete();
        relay.fail();

        let updates = drain(&mut rx);
        let terminals: Vec<_> = updates.iter().filter(|u| u.stage.is_terminal()).collect();
        assert_eq!(terminals.len(), 1);
        assert_eq!(terminals[0].stage, DownloadStage::Done);
    }

    #[test]
    fn test_lines_after_terminal_are_dropped() {
        let (mut relay, mut rx) = relay_with_rx();
        relay.complete();
        drain(&mut rx);

        relay.observe_line("vg-progress|10|100|NA|NA");
        relay.observe_line("[Merger] Merging formats");

        assert!(drain(&mut rx).is_empty());
    }

    // ============================================================
    // PROPTEST-STYLE RANDOMIZED CHECKS
    // ============================================================

    #[test]
    fn test_random_transfer_sequences_stay_monotonic() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let (mut relay, mut rx) = relay_with_rx();
            let streams = rng.gen_range(1..4);
            for _ in 0..streams {
                let total: u64 = rng.gen_range(1..1_000_000);
                let mut downloaded = 0u64;
                while downloaded < total {
                    downloaded = (downloaded + rng.gen_range(1..=total)).min(total);
                    relay.observe_line(&format!(
                        "vg-progress|{}|{}|NA|{}",
                        downloaded,
                        total,
                        rng.gen_range(0.0..1e7)
                    ));
                }
            }
            relay.complete();

            let updates = drain(&mut rx);
            let mut last = -1.0f32;
            for update in &updates {
                assert!(update.percent >= last, "percent regressed: {:?}", updates);
                last = update.percent;
            }
            assert_eq!(
                updates.iter().filter(|u| u.stage.is_terminal()).count(),
                1
            );
            assert_eq!(updates.last().unwrap().stage, DownloadStage::Done);
        }
    }
}
