//! Cosmetic progress indicator.
//!
//! The value climbs on a fixed timer regardless of how much work the run has
//! done, stalls at a ceiling, and jumps to 100 when the run finishes. It is a
//! sign of life for the user, not a measurement.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ProgressConfig;

pub const COMPLETE: u8 = 100;
const BAR_WIDTH: usize = 40;

/// Next indicator value after one tick.
pub fn advance(value: u8, ceiling: u8) -> u8 {
    if value < ceiling {
        value + 1
    } else {
        value
    }
}

/// Render a value as `[#####.....]  50%`.
pub fn render_bar(value: u8) -> String {
    let value = value.min(COMPLETE);
    let filled = usize::from(value) * BAR_WIDTH / usize::from(COMPLETE);
    format!(
        "[{}{}] {value:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

/// A running fake progress ticker.
pub struct FakeProgress {
    value: Arc<watch::Sender<u8>>,
    ticker: JoinHandle<()>,
}

impl FakeProgress {
    /// Start ticking from zero.
    pub fn start(config: &ProgressConfig) -> Self {
        let value = Arc::new(watch::Sender::new(0u8));
        let ceiling = config.ceiling.min(COMPLETE);
        let period = Duration::from_millis(config.tick_interval_ms.max(1));

        let ticker_value = Arc::clone(&value);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let changed = ticker_value.send_if_modified(|v| {
                    let next = advance(*v, ceiling);
                    let changed = next != *v;
                    *v = next;
                    changed
                });
                if !changed {
                    break;
                }
            }
        });

        Self { value, ticker }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.value.subscribe()
    }

    pub fn value(&self) -> u8 {
        *self.value.borrow()
    }

    /// Stop ticking and force the indicator to completion.
    pub fn finish(&self) {
        self.ticker.abort();
        self.value.send_replace(COMPLETE);
    }
}

impl Drop for FakeProgress {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_stops_at_ceiling() {
        assert_eq!(advance(0, 95), 1);
        assert_eq!(advance(94, 95), 95);
        assert_eq!(advance(95, 95), 95);
        assert_eq!(advance(COMPLETE, 95), COMPLETE);
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0), format!("[{}]   0%", ".".repeat(40)));
        assert_eq!(render_bar(50), format!("[{}{}]  50%", "#".repeat(20), ".".repeat(20)));
        assert_eq!(render_bar(100), format!("[{}] 100%", "#".repeat(40)));
    }

    #[tokio::test]
    async fn test_ticker_stalls_at_ceiling_then_finishes() {
        let progress = FakeProgress::start(&ProgressConfig {
            tick_interval_ms: 1,
            ceiling: 5,
        });
        let mut rx = progress.subscribe();

        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|v| *v == 5))
            .await
            .expect("ticker should reach the ceiling")
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(progress.value(), 5);

        progress.finish();
        assert_eq!(progress.value(), COMPLETE);
    }
}
