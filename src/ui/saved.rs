use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::data::Restaurant;
use crate::Message;

/// The saved restaurants, each with a delete button
pub fn view(items: &[Restaurant]) -> Element<'_, Message> {
    if items.is_empty() {
        return container(text("Nothing saved yet. Tap Save on a card to keep it here.").size(16))
            .padding(20)
            .into();
    }

    let list = items.iter().fold(Column::new().spacing(16), |list, restaurant| {
        list.push(
            row![
                column![
                    text(&restaurant.title).size(20),
                    text(&restaurant.details).size(14),
                ]
                .spacing(4)
                .width(Length::Fill),
                button(text("✕"))
                    .on_press(Message::DeleteSaved(restaurant.id.clone()))
                    .padding(8),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        )
    });

    scrollable(list.padding(16)).height(Length::Fill).into()
}
