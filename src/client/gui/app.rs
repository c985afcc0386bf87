use std::sync::Arc;

use iced::event::{self, Event};
use iced::{mouse, window};
use iced::{Application, Command, Element, Point, Size, Subscription, Theme};
use iced_aw::Modal;
use log::info;
use tokio::sync::{mpsc, Mutex};

use crate::client::config::ClientConfig;
use crate::client::gui::views::{login_dialog, overlay};
use crate::client::models::app_state::{Next, OverlayState};
use crate::client::models::messages::Message;
use crate::client::services::backend::Backend;
use crate::client::services::fetch_worker::{self, ProgressFeed};

/// How long a notice stays in the alert bar.
const NOTICE_TIMEOUT_MS: u64 = 3000;

pub struct OverlayFlags {
    pub config: ClientConfig,
    pub backend: Arc<dyn Backend>,
}

pub struct OverlayApp {
    pub state: OverlayState,
    pub backend: Arc<dyn Backend>,
    pub config: ClientConfig,
}

impl OverlayApp {
    pub fn settings(flags: OverlayFlags) -> iced::Settings<OverlayFlags> {
        let cfg = &flags.config;
        let (x, y) = cfg.overlay_position;
        let window = window::Settings {
            size: Size::new(cfg.overlay_width, cfg.overlay_height),
            position: window::Position::Specific(Point::new(x, y)),
            resizable: false,
            decorations: false,
            level: window::Level::AlwaysOnTop,
            ..window::Settings::default()
        };
        iced::Settings {
            window,
            ..iced::Settings::with_flags(flags)
        }
    }

    fn dispatch(&mut self, next: Next) -> Command<Message> {
        match next {
            Next::StartFetch => {
                let (tx, rx) = mpsc::unbounded_channel();
                let feed: ProgressFeed = Arc::new(Mutex::new(rx));
                Command::batch([
                    Command::perform(
                        fetch_worker::run(self.backend.clone(), tx),
                        Message::FetchFinished,
                    ),
                    poll_progress(feed),
                ])
            }
            Next::PromptLogin | Next::Nothing => self.schedule_log_clear(),
        }
    }

    fn schedule_log_clear(&self) -> Command<Message> {
        if self.state.logger.is_empty() {
            return Command::none();
        }
        Command::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(NOTICE_TIMEOUT_MS)).await;
            },
            |_| Message::ClearLog,
        )
    }
}

impl Application for OverlayApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = OverlayFlags;

    fn new(flags: OverlayFlags) -> (Self, Command<Message>) {
        let (x, y) = flags.config.overlay_position;
        let origin = Point::new(x, y);
        let app = OverlayApp {
            state: OverlayState::new(flags.config.fetch_without_login, origin),
            backend: flags.backend,
            config: flags.config,
        };
        info!("[APP] Overlay ready, backend at {}", app.config.backend_endpoint());
        (app, Command::none())
    }

    fn title(&self) -> String {
        "ErpSnap".to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::None => Command::none(),
            Message::RefreshPressed => {
                let next = self.state.request_refresh(self.backend.as_ref());
                self.dispatch(next)
            }
            Message::FetchFinished(result) => {
                self.state.finish_fetch(result);
                self.schedule_log_clear()
            }
            Message::FetchProgress(line, feed) => {
                self.state.report_progress(line);
                poll_progress(feed)
            }
            Message::UsernameChanged(username) => {
                if let Some(form) = self.state.login_form_mut() {
                    form.username = username;
                }
                Command::none()
            }
            Message::PasswordChanged(password) => {
                if let Some(form) = self.state.login_form_mut() {
                    form.password = password;
                }
                Command::none()
            }
            Message::ToggleShowPassword => {
                if let Some(form) = self.state.login_form_mut() {
                    form.show_password = !form.show_password;
                }
                Command::none()
            }
            Message::SubmitLogin => {
                let next = self.state.submit_login(self.backend.as_ref());
                self.dispatch(next)
            }
            Message::CancelLogin => {
                let next = self.state.cancel_login();
                self.dispatch(next)
            }
            Message::CursorMoved(position) => match self.state.cursor_moved(position) {
                Some(origin) => window::move_to(window::Id::MAIN, origin),
                None => Command::none(),
            },
            Message::DragPressed => {
                self.state.press();
                Command::none()
            }
            Message::DragReleased => {
                self.state.release();
                Command::none()
            }
            Message::WindowMoved(origin) => {
                self.state.window_moved(origin);
                Command::none()
            }
            Message::ClearLog => {
                self.state.logger.clear();
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let underlay = overlay::view(&self.state, &self.config.overlay_title);
        let dialog = self.state.login.as_ref().map(login_dialog::view);

        Modal::new(underlay, dialog)
            .backdrop(Message::CancelLogin)
            .on_esc(Message::CancelLogin)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(pointer_event)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Re-issues itself for every progress line until the channel closes.
fn poll_progress(feed: ProgressFeed) -> Command<Message> {
    Command::perform(fetch_worker::next_progress(feed), |next| match next {
        Some((line, feed)) => Message::FetchProgress(line, feed),
        None => Message::None,
    })
}

fn pointer_event(event: Event, status: event::Status) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => Some(Message::CursorMoved(position)),
        // presses on widgets (the Refresh button) do not start a drag
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
            if status == event::Status::Ignored =>
        {
            Some(Message::DragPressed)
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => Some(Message::DragReleased),
        Event::Window(_, window::Event::Moved { x, y }) => {
            Some(Message::WindowMoved(Point::new(x as f32, y as f32)))
        }
        _ => None,
    }
}
