//! Fixed-rate display loop
//!
//! Ticks at a fixed rate and hands the newest relayed frame to the caller's
//! sink (window blit, encoder, test buffer). Ticks with no fresh frame are
//! skipped; the loop never blocks on the producer.

use crate::relay::FrameRelay;
use rehab_vision::Frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default display rate
pub const DISPLAY_FPS: u32 = 30;

/// Pulls frames from a relay at a fixed rate
pub struct DisplayLoop {
    relay: Arc<FrameRelay>,
    interval: Duration,
}

impl DisplayLoop {
    pub fn new(relay: Arc<FrameRelay>) -> Self {
        Self::with_fps(relay, DISPLAY_FPS)
    }

    pub fn with_fps(relay: Arc<FrameRelay>, fps: u32) -> Self {
        Self {
            relay,
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }

    /// Run on the calling thread until `stop` is set
    ///
    /// `on_frame` sees each frame at most once, newest first; stale frames
    /// overwritten in the relay are never delivered.
    pub fn run_until<F>(&self, stop: &AtomicBool, mut on_frame: F)
    where
        F: FnMut(Frame),
    {
        let mut next_tick = Instant::now();
        while !stop.load(Ordering::Relaxed) {
            if let Some(frame) = self.relay.take() {
                on_frame(frame);
            }
            next_tick += self.interval;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                // Fell behind; realign rather than bursting to catch up
                next_tick = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn delivers_only_newest_frames() {
        let relay = Arc::new(FrameRelay::new());
        let stop = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(AtomicUsize::new(0));

        // Three publishes before the first tick collapse to one delivery
        relay.publish(Frame::new(4, 4));
        relay.publish(Frame::new(4, 4));
        relay.publish(Frame::new(4, 4));

        let display = DisplayLoop::with_fps(Arc::clone(&relay), 200);
        let handle = {
            let stop = Arc::clone(&stop);
            let seen = Arc::clone(&seen);
            std::thread::spawn(move || {
                display.run_until(&stop, |_| {
                    seen.fetch_add(1, Ordering::Relaxed);
                });
            })
        };

        std::thread::sleep(Duration::from_millis(50));
        stop.store(true, Ordering::Relaxed);
        handle.join().unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn stops_promptly_when_flagged() {
        let relay = Arc::new(FrameRelay::new());
        let stop = AtomicBool::new(true);
        let display = DisplayLoop::new(relay);
        // Pre-set stop flag: returns without delivering anything
        display.run_until(&stop, |_| panic!("no frames expected"));
    }
}
