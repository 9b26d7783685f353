use std::sync::Arc;

use iced::{Application, Program as IcedProgram, Settings, Theme};

use crate::common::messages::DomainMessage;
use crate::state::State;
use crate::{update, view};

pub mod bootstrap;

pub use bootstrap::AppConfig;

/// Build the profile page application using the provided configuration.
pub fn application(
    config: AppConfig,
) -> Application<
    impl IcedProgram<State = State, Message = DomainMessage, Theme = Theme>,
> {
    let config = Arc::new(config);

    let boot_config = Arc::clone(&config);
    iced::application(
        move || bootstrap::runtime_boot(&boot_config),
        update::update,
        view::view,
    )
    .settings(default_settings())
    .title("Profile")
    .window(iced::window::Settings {
        size: iced::Size::new(720.0, 640.0),
        resizable: true,
        ..Default::default()
    })
}

fn default_settings() -> Settings {
    let mut settings = Settings::default();
    settings.id = Some("profile-page".to_string());
    settings.antialiasing = true;
    settings
}
