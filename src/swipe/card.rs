/// Gesture and animation state machine for a single card
///
/// The card owns four driven values (horizontal translation, vertical
/// translation, scale, opacity). Gestures and the save button change their
/// targets; [`SwipeCard::tick`] moves them along and reports an outcome exactly
/// once, when the terminal animation has finished.

use std::time::{Duration, Instant};

use tracing::trace;

use super::animation::AnimatedValue;
use super::velocity::VelocityTracker;
use super::{Presentation, Viewport};

/// Percent of the viewport width a card must travel left to be dismissed
pub const DISMISS_PERCENT: f32 = 30.0;

/// Leftward release speed (px/s) that dismisses regardless of distance
pub const DISMISS_VELOCITY: f32 = 500.0;

/// Scale the card shrinks to before flying away on save
pub const SAVE_SCALE: f32 = 0.8;

pub const SAVE_SHRINK_DURATION: Duration = Duration::from_millis(100);
pub const SAVE_SLIDE_DURATION: Duration = Duration::from_millis(300);

/// What a finished card did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Dismissed,
    Saved,
}

/// Where a released drag is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Dismiss,
    SnapBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Idle,
    Dragging,
    Resolving(Resolution),
    Completing(SwipeOutcome),
    /// Outcome already reported
    Done(SwipeOutcome),
    /// Torn down before finishing; never reports
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveStep {
    Shrink,
    Slide,
}

#[derive(Debug, Clone)]
pub struct SwipeCard {
    viewport: Viewport,
    phase: SwipePhase,
    save_step: Option<SaveStep>,
    translate_x: AnimatedValue,
    translate_y: AnimatedValue,
    scale: AnimatedValue,
    opacity: AnimatedValue,
    tracker: VelocityTracker,
}

impl SwipeCard {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            phase: SwipePhase::Idle,
            save_step: None,
            translate_x: AnimatedValue::new(0.0),
            translate_y: AnimatedValue::new(0.0),
            scale: AnimatedValue::new(1.0),
            opacity: AnimatedValue::new(1.0),
            tracker: VelocityTracker::new(),
        }
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Translation at or beyond which a release dismisses (negative).
    /// Whole-pixel widths give an exact threshold; `0.3` has no exact f32.
    pub fn threshold(&self) -> f32 {
        -(self.viewport.width * DISMISS_PERCENT / 100.0)
    }

    /// Current values for drawing
    pub fn presentation(&self) -> Presentation {
        Presentation::new(
            self.translate_x.value(),
            self.translate_y.value(),
            self.scale.value(),
            self.opacity.value(),
        )
    }

    /// Whether `tick` still has work to do
    pub fn is_animating(&self) -> bool {
        match self.phase {
            SwipePhase::Resolving(_) | SwipePhase::Completing(_) => true,
            SwipePhase::Idle | SwipePhase::Dragging => {
                self.opacity.is_animating() || self.translate_x.is_animating()
            }
            SwipePhase::Done(_) | SwipePhase::Cancelled => false,
        }
    }

    /// Finger down. Interrupts a release animation in flight.
    ///
    /// Returns `false` when the card is saving or already finished.
    pub fn begin_drag(&mut self) -> bool {
        match self.phase {
            SwipePhase::Idle | SwipePhase::Resolving(_) => {
                self.translate_x.cancel();
                self.tracker.reset();
                self.phase = SwipePhase::Dragging;
                trace!("drag started");
                true
            }
            _ => false,
        }
    }

    /// Finger moved; `translation_x` is the total horizontal delta of this drag.
    pub fn drag_to(&mut self, translation_x: f32, at: Instant) {
        if self.phase != SwipePhase::Dragging {
            return;
        }
        self.tracker.record(at, translation_x);
        self.translate_x.set(translation_x);
        self.react_opacity();
    }

    /// Finger up at `at`; the release velocity comes from recent drag samples.
    pub fn end_drag(&mut self, at: Instant) -> Option<Resolution> {
        let velocity = self.tracker.velocity(at);
        self.release(velocity)
    }

    /// Finger up with a known horizontal velocity (px/s).
    pub fn release(&mut self, velocity_x: f32) -> Option<Resolution> {
        if self.phase != SwipePhase::Dragging {
            return None;
        }

        let resolution = if self.translate_x.value() <= self.threshold()
            || velocity_x < -DISMISS_VELOCITY
        {
            self.translate_x
                .spring_to(-self.viewport.width, Some(velocity_x));
            Resolution::Dismiss
        } else {
            self.translate_x.spring_to(0.0, Some(velocity_x));
            Resolution::SnapBack
        };

        trace!(?resolution, velocity_x, "drag released");
        self.phase = SwipePhase::Resolving(resolution);
        Some(resolution)
    }

    /// Save button tapped: shrink, then fly off the top.
    ///
    /// Only a resting card can be saved; returns whether the save started.
    pub fn save(&mut self) -> bool {
        if self.phase != SwipePhase::Idle {
            return false;
        }
        self.scale.timing_to(SAVE_SCALE, SAVE_SHRINK_DURATION);
        self.save_step = Some(SaveStep::Shrink);
        self.phase = SwipePhase::Completing(SwipeOutcome::Saved);
        trace!("save started");
        true
    }

    /// Advance all animations by `dt`. Returns the outcome on the one tick
    /// where the card finishes.
    pub fn tick(&mut self, dt: Duration) -> Option<SwipeOutcome> {
        if matches!(self.phase, SwipePhase::Done(_) | SwipePhase::Cancelled) {
            return None;
        }

        let x_finished = self.translate_x.advance(dt);
        if self.translate_x.is_animating() || x_finished {
            self.react_opacity();
        }
        self.opacity.advance(dt);
        let scale_finished = self.scale.advance(dt);
        let y_finished = self.translate_y.advance(dt);

        match self.phase {
            SwipePhase::Resolving(Resolution::Dismiss) if x_finished => {
                self.phase = SwipePhase::Completing(SwipeOutcome::Dismissed);
            }
            SwipePhase::Resolving(Resolution::SnapBack) if x_finished => {
                self.phase = SwipePhase::Idle;
            }
            SwipePhase::Completing(SwipeOutcome::Saved) => match self.save_step {
                Some(SaveStep::Shrink) if scale_finished => {
                    self.translate_y
                        .timing_to(-self.viewport.height, SAVE_SLIDE_DURATION);
                    self.save_step = Some(SaveStep::Slide);
                }
                Some(SaveStep::Slide) if y_finished => {
                    self.save_step = None;
                }
                _ => {}
            },
            _ => {}
        }

        if let SwipePhase::Completing(outcome) = self.phase {
            if self.save_step.is_none() {
                self.phase = SwipePhase::Done(outcome);
                trace!(?outcome, "card finished");
                return Some(outcome);
            }
        }
        None
    }

    /// Tear down: stop every driven value so nothing completes later.
    pub fn cancel(&mut self) {
        self.translate_x.cancel();
        self.translate_y.cancel();
        self.scale.cancel();
        self.opacity.cancel();
        self.save_step = None;
        if !matches!(self.phase, SwipePhase::Done(_)) {
            self.phase = SwipePhase::Cancelled;
        }
    }

    /// Opacity follows the horizontal translation across the threshold
    fn react_opacity(&mut self) {
        let target = if self.translate_x.value() <= self.threshold() {
            0.0
        } else {
            1.0
        };
        if self.opacity.target() != target {
            self.opacity.spring_to(target, None);
        }
    }
}
