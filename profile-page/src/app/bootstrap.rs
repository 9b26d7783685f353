use std::sync::Arc;

use iced::Task;

use crate::common::messages::DomainMessage;
use crate::common::Route;
use crate::infra::api_client::{ApiClient, SessionToken};
use crate::infra::config::Config;
use crate::infra::services::{ProfileService, profile_service};
use crate::infra::testing::stubs::StubProfileService;
use crate::state::State;
use crate::update;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub config: Config,
    pub use_test_stubs: bool,
}

impl AppConfig {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            use_test_stubs: false,
        }
    }

    /// Config file and `PROFILE_*` variables; `PROFILE_PAGE_STUBS=1` swaps
    /// the backend for the in-memory stub
    pub fn from_environment() -> Self {
        let use_test_stubs = std::env::var("PROFILE_PAGE_STUBS")
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes"
                )
            })
            .unwrap_or(false);

        Self {
            config: Config::load(),
            use_test_stubs,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    pub fn use_test_stubs(&self) -> bool {
        self.use_test_stubs
    }

    pub fn with_test_stubs(mut self, enabled: bool) -> Self {
        self.use_test_stubs = enabled;
        self
    }
}

fn build_service(config: &AppConfig) -> Arc<dyn ProfileService> {
    if config.use_test_stubs() {
        log::warn!("[Profile] Using in-memory stub backend");
        return Arc::new(StubProfileService::new());
    }

    let settings = &config.config;
    let client = ApiClient::with_timeout(
        settings.server_url.clone(),
        settings.request_timeout(),
    )
    .with_session_cookie(settings.session_cookie.clone())
    .with_session(settings.session_token.clone().map(SessionToken::new));

    profile_service(Arc::new(client), settings.backend)
}

/// State before any message has been handled
pub fn base_state(config: &AppConfig) -> State {
    log::info!(
        "[Profile] Starting against {} ({} backend)",
        config.server_url(),
        config.config.backend
    );
    State::new(config.config.clone(), build_service(config))
}

/// Boot logic for the running application: open the profile route, which
/// kicks off the initial fetch
pub fn runtime_boot(config: &AppConfig) -> (State, Task<DomainMessage>) {
    let mut state = base_state(config);
    let task = update::update(&mut state, DomainMessage::Navigate(Route::Profile));
    (state, task)
}
