use crate::scroll::host::HostEvent;

/// What the caller should do after feeding an event to a [`FrameScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// First scroll event of this frame: request an animation frame.
    RequestFrame,
    /// A frame is already in flight; nothing to do.
    Coalesced,
    /// Geometry was invalidated (resize): recompute right away.
    RunNow,
}

/// Counters kept per scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SchedulerStats {
    /// Scroll and resize events seen.
    pub events: u64,
    /// Animation frames requested.
    pub frames_requested: u64,
    /// Scroll events folded into an already-requested frame.
    pub coalesced: u64,
    /// Recomputations actually run (frame or resize).
    pub recomputes: u64,
}

/// Per-section event coalescer.
///
/// Guarantees at most one frame-driven recompute per animation frame no matter how many scroll
/// events arrive, using a single in-flight flag that is cleared when the frame starts.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    in_flight: bool,
    stats: SchedulerStats,
}

impl FrameScheduler {
    /// A scheduler with no frame in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one native event.
    pub fn notify(&mut self, event: HostEvent) -> Dispatch {
        self.stats.events += 1;
        match event {
            HostEvent::Resize => {
                self.stats.recomputes += 1;
                Dispatch::RunNow
            }
            HostEvent::Scroll if self.in_flight => {
                self.stats.coalesced += 1;
                Dispatch::Coalesced
            }
            HostEvent::Scroll => {
                self.in_flight = true;
                self.stats.frames_requested += 1;
                Dispatch::RequestFrame
            }
        }
    }

    /// Animation-frame callback. Returns `true` when a recompute was pending.
    pub fn on_frame(&mut self) -> bool {
        if !std::mem::replace(&mut self.in_flight, false) {
            return false;
        }
        self.stats.recomputes += 1;
        true
    }

    /// Whether a frame has been requested and not yet delivered.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/scheduler.rs"]
mod tests;
