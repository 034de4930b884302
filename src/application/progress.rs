use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Simulated upload progress: a periodic ramp that climbs by `step` every
/// `period` and never passes `cap`. It knows nothing about the real transfer;
/// the owner cancels it when the transfer settles.
pub struct ProgressTicker {
    cancel: CancellationToken,
}

impl ProgressTicker {
    /// Spawns the ramp on the current tokio runtime. The first value is
    /// reported one `period` after start. The ramp stops by itself at `cap`.
    pub fn start<F>(period: Duration, step: u8, cap: u8, on_tick: F) -> Self
    where
        F: Fn(u8) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut value: u8 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        value = value.saturating_add(step).min(cap);
                        on_tick(value);
                        if value >= cap {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<u8>>>, impl Fn(u8) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn ramps_to_cap_and_stops() {
        let (seen, on_tick) = recorder();
        let _ticker = ProgressTicker::start(Duration::from_millis(100), 5, 95, on_tick);

        tokio::time::sleep(Duration::from_secs(5)).await;

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 19);
        assert_eq!(seen.first(), Some(&5));
        assert_eq!(seen.last(), Some(&95));
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn uneven_step_is_clamped_to_cap() {
        let (seen, on_tick) = recorder();
        let _ticker = ProgressTicker::start(Duration::from_millis(10), 40, 95, on_tick);

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(*seen.lock().unwrap(), vec![40, 80, 95]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_the_ramp() {
        let (seen, on_tick) = recorder();
        let ticker = ProgressTicker::start(Duration::from_millis(100), 5, 95, on_tick);

        tokio::time::sleep(Duration::from_millis(350)).await;
        ticker.stop();
        assert!(ticker.is_stopped());
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*seen.lock().unwrap(), vec![5, 10, 15]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_cancels_it() {
        let (seen, on_tick) = recorder();
        let ticker = ProgressTicker::start(Duration::from_millis(100), 5, 95, on_tick);
        drop(ticker);

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(seen.lock().unwrap().is_empty());
    }
}
