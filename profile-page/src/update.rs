//! Root update: routes shell messages and turns page effects into tasks

use iced::Task;
use iced::widget::image::Handle;
use log::{debug, info, warn};
use profile_model::ImageSlot;
use std::sync::Arc;

use crate::common::Route;
use crate::common::messages::DomainMessage;
use crate::domains::profile::{self, Effect, PageState, perform};
use crate::infra::image_file::pick_image_file;
use crate::state::State;

pub fn update(state: &mut State, message: DomainMessage) -> Task<DomainMessage> {
    match message {
        DomainMessage::Profile(message) => update_page(state, message),

        DomainMessage::Navigate(route) => navigate(state, route),

        DomainMessage::OpenProfile => navigate(state, Route::Profile),

        DomainMessage::PickImage(slot) => {
            if !matches!(state.profile.state, PageState::Editing { .. }) {
                return Task::none();
            }
            debug!("[Profile] Opening picker for {}", slot.label());
            Task::perform(pick_image_file(), move |picked| match picked {
                Some(file) => {
                    profile::Message::ImageSelected(slot, file).into()
                }
                None => DomainMessage::NoOp,
            })
        }

        DomainMessage::RemoteImageLoaded { url, result } => {
            match result {
                Ok(bytes) => {
                    debug!("[Profile] Loaded image {} ({} bytes)", url, bytes.len());
                    state.image_cache.finish(&url, Some(bytes));
                }
                Err(err) => {
                    warn!("[Profile] Failed to load image {}: {}", url, err);
                    state.image_cache.finish(&url, None);
                }
            }
            Task::none()
        }

        DomainMessage::NoOp => Task::none(),
    }
}

fn update_page(state: &mut State, message: profile::Message) -> Task<DomainMessage> {
    // The handle is built here so the view never re-decodes; a stale ticket
    // is pruned again right below
    if let profile::Message::PreviewReady {
        ticket, preview, ..
    } = &message
    {
        state
            .preview_handles
            .insert(*ticket, Handle::from_bytes(preview.bytes.to_vec()));
    }

    let effect = state.profile.update(message);
    state.prune_preview_handles();

    let images = request_remote_images(state);
    Task::batch([run_effect(state, effect), images])
}

fn run_effect(state: &mut State, effect: Effect) -> Task<DomainMessage> {
    match effect {
        Effect::None => Task::none(),
        Effect::Navigate(route) => navigate(state, route),
        effect => {
            let service = Arc::clone(&state.profile_service);
            Task::future(perform(effect, service))
                .and_then(|message| Task::done(DomainMessage::Profile(message)))
        }
    }
}

fn navigate(state: &mut State, route: Route) -> Task<DomainMessage> {
    info!("[Profile] Navigating to {}", route.path());
    state.route = route;

    match route {
        Route::Login => {
            state.profile.unmount();
            state.preview_handles.clear();
            Task::none()
        }
        Route::Profile => update_page(state, profile::Message::Mounted),
    }
}

/// Start downloads for stored images the page shows but the cache lacks
fn request_remote_images(state: &mut State) -> Task<DomainMessage> {
    let Some(profile) = state.profile.state.profile() else {
        return Task::none();
    };

    let urls: Vec<String> = ImageSlot::ALL
        .into_iter()
        .filter_map(|slot| profile.image_url(slot))
        .map(str::to_string)
        .collect();

    let tasks: Vec<Task<DomainMessage>> = urls
        .into_iter()
        .filter(|url| state.image_cache.begin(url))
        .map(|url| {
            let service = Arc::clone(&state.profile_service);
            Task::perform(
                async move {
                    let result = service.fetch_image(&url).await;
                    (url, result)
                },
                |(url, result)| DomainMessage::RemoteImageLoaded { url, result },
            )
        })
        .collect();

    Task::batch(tasks)
}
