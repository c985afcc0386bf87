use iced::widget::{Container, Row, Space, Text};
use iced::{Element, Length};

use crate::client::models::messages::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self.level {
            LogLevel::Success => "✓",
            LogLevel::Error => "✗",
            LogLevel::Info => "i",
            LogLevel::Warning => "!",
        }
    }

    pub fn color(&self) -> iced::Color {
        match self.level {
            LogLevel::Success => iced::Color::from_rgb(0.2, 0.8, 0.4),
            LogLevel::Error => iced::Color::from_rgb(1.0, 0.2, 0.2),
            LogLevel::Info => iced::Color::from_rgb(0.2, 0.6, 1.0),
            LogLevel::Warning => iced::Color::from_rgb(1.0, 0.8, 0.0),
        }
    }
}

pub fn logger_view(messages: &[LogMessage]) -> Element<'_, Message> {
    // only the latest notice is shown
    if let Some(log) = messages.last() {
        let bg_color = log.color();
        Container::new(
            Row::new()
                .spacing(8)
                .push(Text::new(log.symbol()).size(14).style(iced::Color::BLACK))
                .push(Text::new(&log.message).size(13).style(iced::Color::BLACK)),
        )
        .padding([6, 10])
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| {
            iced::widget::container::Appearance {
                background: Some(iced::Background::Color(bg_color)),
                text_color: Some(iced::Color::BLACK),
                border: iced::Border {
                    radius: 6.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        })))
        .into()
    } else {
        Space::new(Length::Fill, Length::Fixed(0.0)).into()
    }
}
