//! Single-slot frame relay between the session worker and the display loop
//!
//! Capacity is exactly one frame. The producer always overwrites; the
//! consumer always takes the newest frame or nothing. Neither side ever
//! blocks on the other, so a slow display cannot stall the pipeline and a
//! fast producer cannot queue up stale frames.

use rehab_vision::Frame;
use std::sync::Mutex;

/// Latest-frame mailbox shared by producer and consumer
#[derive(Default)]
pub struct FrameRelay {
    slot: Mutex<Option<Frame>>,
}

impl FrameRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame, replacing any unconsumed one
    pub fn publish(&self, frame: Frame) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(frame);
        }
    }

    /// Take the newest frame, leaving the slot empty
    pub fn take(&self) -> Option<Frame> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehab_vision::Color;

    fn marked(mark: Color) -> Frame {
        let mut f = Frame::new(4, 4);
        f.put(0, 0, mark);
        f
    }

    #[test]
    fn publish_overwrites_unconsumed_frame() {
        let relay = FrameRelay::new();
        relay.publish(marked(Color::RED));
        relay.publish(marked(Color::GREEN));
        let got = relay.take().expect("a frame is present");
        assert_eq!(got.get(0, 0), Color::GREEN);
    }

    #[test]
    fn take_empties_the_slot() {
        let relay = FrameRelay::new();
        relay.publish(marked(Color::RED));
        assert!(relay.take().is_some());
        assert!(relay.take().is_none());
    }
}
