/// Swipe interaction module
///
/// This module turns pointer drags and save taps into card outcomes:
/// - Animated values driven by springs and timing curves (animation.rs)
/// - Release velocity estimation (velocity.rs)
/// - The per-card state machine (card.rs)
///
/// Nothing here knows about the queue or the database. The card only reports
/// a [`card::SwipeOutcome`] from `tick`, and the owner decides what it means.

pub mod animation;
pub mod card;
pub mod velocity;

use cgmath::Vector2;

pub use card::{SwipeCard, SwipeOutcome};

/// Size of the area the card moves in; thresholds and exit targets scale with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// How a card should be drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    /// Translation from the resting position, in pixels
    pub offset: Vector2<f32>,
    pub scale: f32,
    pub opacity: f32,
}

impl Presentation {
    pub fn new(translate_x: f32, translate_y: f32, scale: f32, opacity: f32) -> Self {
        Self {
            offset: Vector2::new(translate_x, translate_y),
            scale,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// A card sitting still at full size
    pub fn resting() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn translate_x(&self) -> f32 {
        self.offset.x
    }

    pub fn translate_y(&self) -> f32 {
        self.offset.y
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::resting()
    }
}
