use iced::widget::{Button, Column, Container, Text};
use iced::{Alignment, Color, Element, Font, Length};

use crate::client::gui::views::logger::logger_view;
use crate::client::models::app_state::OverlayState;
use crate::client::models::fetch_state::{FetchState, VisibleLabel};
use crate::client::models::messages::Message;

pub const BG_MAIN: Color = Color::BLACK;
pub const AMBER: Color = Color::from_rgb(0.929, 0.682, 0.110);
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);

pub const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub fn panel_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(BG_MAIN)),
        text_color: Some(AMBER),
        border: iced::Border {
            width: 1.0,
            color: AMBER,
            radius: 12.0.into(),
        },
        shadow: iced::Shadow {
            offset: iced::Vector::new(0.0, 0.0),
            blur_radius: 0.0,
            color: Color::TRANSPARENT,
        },
    }
}

pub fn view<'a>(state: &'a OverlayState, title: &'a str) -> Element<'a, Message> {
    let heading = Text::new(title)
        .size(18)
        .font(BOLD_FONT)
        .style(AMBER)
        .horizontal_alignment(iced::alignment::Horizontal::Center);

    // exactly one of status/data is on screen
    let label = match state.fetch.visible_label() {
        VisibleLabel::Status(text) => Text::new(text).size(14).style(TEXT_SECONDARY),
        VisibleLabel::Data(text) => Text::new(text).size(16).style(AMBER),
    }
    .horizontal_alignment(iced::alignment::Horizontal::Center);

    let mut content = Column::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .width(Length::Fill)
        .push(logger_view(&state.logger))
        .push(heading)
        .push(label);

    if let (FetchState::Displaying(_), Some(at)) = (&state.fetch, state.last_updated) {
        content = content.push(
            Text::new(format!("Updated {}", at.format("%H:%M:%S")))
                .size(11)
                .style(TEXT_SECONDARY),
        );
    }

    let refresh = Button::new(
        Text::new("Refresh")
            .size(14)
            .horizontal_alignment(iced::alignment::Horizontal::Center),
    )
    .padding([6, 18])
    .style(iced::theme::Button::Secondary);
    // no second fetch while one is outstanding
    let refresh = if state.fetch.is_loading() {
        refresh
    } else {
        refresh.on_press(Message::RefreshPressed)
    };

    Container::new(content.push(refresh))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(12)
        .center_y()
        .style(iced::theme::Container::Custom(Box::new(panel_appearance)))
        .into()
}
