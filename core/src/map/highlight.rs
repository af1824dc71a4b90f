use crate::map::marker::{Marker, MarkerStyle};
use crate::map::presenter::MapSurface;

/// Ticks spent waiting for the fly-to animation to settle (600 ms at the
/// 300 ms tick period).
pub const SETTLE_TICKS: u8 = 2;
/// Style alternations per pulse sequence (two complete pulses).
pub const PULSE_TOGGLES: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Settling { remaining: u8 },
    Pulsing { toggles: u8 },
}

/// Deterministic pulse animation for a single marker.
///
/// The host drives `tick` at a fixed 300 ms period; tests advance it
/// directly without real timers. Whatever happens, the target marker ends
/// up with its exact pre-highlight style.
#[derive(Debug)]
pub struct HighlightSequence {
    phase: Phase,
    target: usize,
    original: MarkerStyle,
}

impl HighlightSequence {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            target: 0,
            original: MarkerStyle::base(crate::model::Severity::Medium),
        }
    }

    pub fn start(&mut self, target: usize, original: MarkerStyle) {
        self.phase = Phase::Settling {
            remaining: SETTLE_TICKS,
        };
        self.target = target;
        self.original = original;
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn target(&self) -> Option<usize> {
        if self.is_active() {
            Some(self.target)
        } else {
            None
        }
    }

    /// Advances one tick: counts down the settle delay, opens the popup
    /// when the pulse begins, then alternates highlight/original styles.
    pub fn tick(&mut self, markers: &mut [Marker], surface: &mut dyn MapSurface) {
        match self.phase {
            Phase::Idle => {}
            Phase::Settling { remaining } if remaining > 1 => {
                self.phase = Phase::Settling {
                    remaining: remaining - 1,
                };
            }
            Phase::Settling { .. } => {
                surface.open_popup(self.target);
                self.phase = Phase::Pulsing { toggles: 0 };
            }
            Phase::Pulsing { toggles } => {
                let style = if toggles % 2 == 0 {
                    MarkerStyle::highlighted(&self.original)
                } else {
                    self.original
                };
                self.apply(markers, style);
                let toggles = toggles + 1;
                if toggles >= PULSE_TOGGLES {
                    self.apply(markers, self.original);
                    self.phase = Phase::Idle;
                } else {
                    self.phase = Phase::Pulsing { toggles };
                }
            }
        }
    }

    /// Aborts the sequence, restoring the original style mid-pulse.
    pub fn cancel(&mut self, markers: &mut [Marker]) {
        if self.is_active() {
            self.apply(markers, self.original);
            self.phase = Phase::Idle;
        }
    }

    fn apply(&self, markers: &mut [Marker], style: MarkerStyle) {
        if let Some(marker) = markers.get_mut(self.target) {
            marker.style = style;
        }
    }
}

impl Default for HighlightSequence {
    fn default() -> Self {
        Self::idle()
    }
}
