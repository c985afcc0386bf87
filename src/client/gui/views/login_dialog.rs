use iced::widget::{Button, Column, Row, Space, Text, TextInput};
use iced::{Alignment, Color, Element, Length};
use iced_aw::Card;

use crate::client::gui::views::overlay::{AMBER, BOLD_FONT};
use crate::client::models::app_state::LoginForm;
use crate::client::models::messages::Message;

const ERROR_COLOR: Color = Color::from_rgb(1.0, 0.3, 0.3);

pub fn view(form: &LoginForm) -> Element<'_, Message> {
    let submit_enabled = form.can_submit();
    let on_submit = if submit_enabled {
        Message::SubmitLogin
    } else {
        Message::None
    };

    let username_field = Column::new()
        .spacing(4)
        .push(Text::new("Username:").size(13))
        .push(
            TextInput::new("Username", &form.username)
                .on_input(Message::UsernameChanged)
                .on_submit(on_submit.clone())
                .padding(8)
                .size(14),
        );

    let password_field = Column::new()
        .spacing(4)
        .push(Text::new("Password:").size(13))
        .push(
            Row::new()
                .spacing(6)
                .align_items(Alignment::Center)
                .push(
                    TextInput::new("Password", &form.password)
                        .on_input(Message::PasswordChanged)
                        .on_submit(on_submit)
                        .secure(!form.show_password)
                        .width(Length::Fill)
                        .padding(8)
                        .size(14),
                )
                .push(
                    Button::new(Text::new(if form.show_password { "Hide" } else { "Show" }).size(12))
                        .on_press(Message::ToggleShowPassword)
                        .style(iced::theme::Button::Text),
                ),
        );

    let mut body = Column::new()
        .spacing(10)
        .push(username_field)
        .push(password_field);

    if let Some(error) = &form.error_message {
        body = body.push(Text::new(error).size(12).style(ERROR_COLOR));
    }

    let submit = Button::new(Text::new("Submit").size(14)).style(iced::theme::Button::Primary);
    let submit = if submit_enabled {
        submit.on_press(Message::SubmitLogin)
    } else {
        submit
    };

    let foot = Row::new()
        .spacing(8)
        .push(Space::new(Length::Fill, Length::Shrink))
        .push(
            Button::new(Text::new("Cancel").size(14))
                .on_press(Message::CancelLogin)
                .style(iced::theme::Button::Secondary),
        )
        .push(submit);

    Card::new(
        Text::new("Enter Credentials").font(BOLD_FONT).style(AMBER),
        body,
    )
    .foot(foot)
    .max_width(280.0)
    .on_close(Message::CancelLogin)
    .into()
}
