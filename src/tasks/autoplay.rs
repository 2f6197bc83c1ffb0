use anyhow::Result;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::Tick;

/// Emits one [`Tick`] right away and then one per `delay` until cancelled.
///
/// Ticks are offered with `try_send`: if the previous one has not been
/// consumed yet the new one is dropped, so a slow renderer never builds a
/// backlog of slides.
pub async fn run(
    session: u64,
    delay: Duration,
    ticks: Sender<Tick>,
    cancel: CancellationToken,
) -> Result<()> {
    let delay = delay.max(Duration::from_millis(1));
    let mut interval = time::interval(delay);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        session,
        delay = %humantime::format_duration(delay),
        "autoplay started"
    );

    loop {
        select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => match ticks.try_send(Tick { session }) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => debug!(session, "previous tick still pending; coalesced"),
                Err(TrySendError::Closed(_)) => {
                    debug!(session, "tick receiver closed");
                    break;
                }
            },
        }
    }

    info!(session, "autoplay stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn ticks_immediately_then_periodically() {
        let (tx, mut rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(7, Duration::from_millis(20), tx, cancel.clone()));

        for _ in 0..3 {
            let tick = time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timeout waiting for tick")
                .expect("channel closed");
            assert_eq!(tick, Tick { session: 7 });
        }

        cancel.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let cancel = CancellationToken::new();
        time::timeout(
            Duration::from_secs(2),
            run(1, Duration::from_millis(5), tx, cancel),
        )
        .await
        .expect("autoplay should exit once nobody listens")
        .unwrap();
    }
}
