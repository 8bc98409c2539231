use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Frame, Path, Program, Stroke, Text};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::state::data::Restaurant;
use crate::swipe::{Presentation, Viewport};
use crate::Message;

/// Space around the front card
const MARGIN: f32 = 20.0;
/// How far each card behind the front one peeks out below it
const STACK_STEP: f32 = 8.0;
const CARD_MAX_HEIGHT: f32 = 420.0;
const TEXT_PADDING: f32 = 15.0;

/// Pointer activity on the card stack, in canvas terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pressed on the stack; carries the area the card moves in
    Started(Viewport),
    /// Total horizontal movement since the press
    Moved(f32),
    Ended,
}

/// One card as drawn this frame
#[derive(Debug, Clone)]
pub struct CardFace {
    pub title: String,
    pub details: String,
    pub has_photo: bool,
    pub presentation: Presentation,
}

impl CardFace {
    pub fn new(restaurant: &Restaurant, presentation: Presentation) -> Self {
        Self {
            title: restaurant.title.clone(),
            details: restaurant.details.clone(),
            has_photo: restaurant.has_photo(),
            presentation,
        }
    }
}

/// Canvas program drawing the stack (front card first in `cards`) and
/// turning presses and moves into [`DragEvent`]s.
pub struct CardStack {
    pub cards: Vec<CardFace>,
}

impl Program<Message> for CardStack {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let size = Size::new(
            (bounds.width - 2.0 * MARGIN).max(0.0),
            CARD_MAX_HEIGHT.min(bounds.height - 2.0 * MARGIN).max(0.0),
        );

        // Back to front so the front card ends up on top
        for (depth, card) in self.cards.iter().enumerate().rev() {
            let resting = Point::new(MARGIN, MARGIN + depth as f32 * STACK_STEP);
            draw_card(&mut frame, card, resting, size);
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if self.cards.is_empty() {
            return (canvas::event::Status::Ignored, None);
        }

        let pressed_at = match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                cursor.position_over(bounds)
            }
            canvas::Event::Touch(touch::Event::FingerPressed { position, .. })
                if bounds.contains(position) =>
            {
                Some(position)
            }
            _ => None,
        };
        if let Some(origin) = pressed_at {
            state.origin = Some(origin);
            let viewport = Viewport::new(bounds.width, bounds.height);
            return (
                canvas::event::Status::Captured,
                Some(Message::Drag(DragEvent::Started(viewport))),
            );
        }

        let Some(origin) = state.origin else {
            return (canvas::event::Status::Ignored, None);
        };

        match event {
            canvas::Event::Mouse(mouse::Event::CursorMoved { position })
            | canvas::Event::Touch(touch::Event::FingerMoved { position, .. }) => (
                canvas::event::Status::Captured,
                Some(Message::Drag(DragEvent::Moved(position.x - origin.x))),
            ),
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
            | canvas::Event::Touch(touch::Event::FingerLifted { .. })
            | canvas::Event::Touch(touch::Event::FingerLost { .. }) => {
                state.origin = None;
                (
                    canvas::event::Status::Captured,
                    Some(Message::Drag(DragEvent::Ended)),
                )
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.origin.is_some() {
            mouse::Interaction::Grabbing
        } else if !self.cards.is_empty() && cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Where the current drag started
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub origin: Option<Point>,
}

fn draw_card(frame: &mut Frame, card: &CardFace, resting: Point, size: Size) {
    let presentation = card.presentation;
    let alpha = presentation.opacity;
    let half = Vector::new(size.width / 2.0, size.height / 2.0);

    frame.with_save(|frame| {
        // Scale around the card's center, then shift by the driven offset
        frame.translate(
            Vector::new(resting.x, resting.y)
                + half
                + Vector::new(presentation.translate_x(), presentation.translate_y()),
        );
        frame.scale(presentation.scale);
        frame.translate(Vector::new(-half.x, -half.y));

        let outline = Path::rectangle(Point::ORIGIN, size);
        frame.fill(&outline, Color { a: alpha, ..Color::WHITE });
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color { a: alpha * 0.3, ..Color::BLACK })
                .with_width(1.0),
        );

        // 16:9 image area
        let image_height = (size.width * 9.0 / 16.0).min(size.height * 0.6);
        let image_color = if card.has_photo {
            Color::from_rgba(0.75, 0.82, 0.9, alpha)
        } else {
            Color::from_rgba(0.85, 0.85, 0.85, alpha)
        };
        frame.fill_rectangle(Point::ORIGIN, Size::new(size.width, image_height), image_color);

        frame.fill_text(Text {
            content: card.title.clone(),
            position: Point::new(TEXT_PADDING, image_height + TEXT_PADDING),
            color: Color { a: alpha, ..Color::BLACK },
            size: Pixels(20.0),
            ..Text::default()
        });
        frame.fill_text(Text {
            content: card.details.clone(),
            position: Point::new(TEXT_PADDING, image_height + TEXT_PADDING + 30.0),
            color: Color::from_rgba(0.4, 0.4, 0.4, alpha),
            size: Pixels(16.0),
            ..Text::default()
        });
    });
}
