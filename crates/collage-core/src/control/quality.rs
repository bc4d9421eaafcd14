//! Render quality degradation during interaction.

use crate::clock::{Duration, Instant};
use crate::stage::{RenderHints, TransformationMode};

/// Two-level render quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    /// Cheap painting while the user interacts.
    Low,
    /// Full quality painting.
    #[default]
    High,
}

impl RenderQuality {
    /// Per-item pixmap transformation for this quality.
    pub fn transformation(self) -> TransformationMode {
        match self {
            RenderQuality::Low => TransformationMode::Fast,
            RenderQuality::High => TransformationMode::Smooth,
        }
    }

    /// Per-view render hints for this quality.
    pub fn render_hints(self) -> RenderHints {
        match self {
            RenderQuality::Low => RenderHints::FAST,
            RenderQuality::High => RenderHints::SMOOTH,
        }
    }
}

/// Single-shot debounce timer.
///
/// Starting an armed timer pushes its deadline out again; an armed timer
/// fires at most once.
#[derive(Debug, Clone)]
pub struct QualityTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl QualityTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the delay. Takes effect on the next start.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Arm, or re-arm, the timer relative to `now`.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Disarm without firing.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the timer will fire, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
