use log::{debug, info, warn};
use std::mem;

use super::ProfileDomain;
use super::effects::Effect;
use super::messages::Message;
use super::state::{EditBuffer, PageState, PendingImage};
use crate::common::Route;

/// Handle one profile page message.
///
/// Messages that make no sense in the current state (a late save result
/// after navigating away, a second Save while one is in flight) are logged
/// and dropped.
pub fn update_profile(domain: &mut ProfileDomain, message: Message) -> Effect {
    debug!(
        "[Profile] {} in {}: {}",
        message.name(),
        domain.state.name(),
        message.sanitized_display()
    );

    match message {
        Message::Mounted => {
            domain.state = PageState::Loading;
            Effect::FetchProfile {
                ticket: domain.issue_load(),
            }
        }

        Message::ProfileLoaded { ticket, result } => {
            if !matches!(domain.state, PageState::Loading)
                || !domain.take_load(ticket)
            {
                debug!("[Profile] Ignoring stale profile load {:?}", ticket);
                return Effect::None;
            }
            domain.state = match result {
                Ok(profile) => {
                    info!("[Profile] Loaded profile {}", profile.id);
                    PageState::Viewing { profile }
                }
                Err(error) => {
                    warn!("[Profile] Failed to load profile: {}", error);
                    PageState::Error { error }
                }
            };
            Effect::None
        }

        Message::EditRequested => {
            domain.state = match mem::take(&mut domain.state) {
                PageState::Viewing { profile } => PageState::Editing {
                    buffer: EditBuffer::seeded_from(&profile),
                    profile,
                    save_error: None,
                },
                other => other,
            };
            Effect::None
        }

        Message::CancelRequested => {
            domain.state = match mem::take(&mut domain.state) {
                // Dropping the buffer releases files and previews with it
                PageState::Editing { profile, .. } => {
                    debug!("[Profile] Edit cancelled");
                    PageState::Viewing { profile }
                }
                other => other,
            };
            Effect::None
        }

        Message::UsernameChanged(username) => {
            if let PageState::Editing {
                buffer, save_error, ..
            } = &mut domain.state
            {
                buffer.username = username;
                *save_error = None;
            }
            Effect::None
        }

        Message::BioChanged(bio) => {
            if let PageState::Editing {
                buffer, save_error, ..
            } = &mut domain.state
            {
                buffer.bio = bio;
                *save_error = None;
            }
            Effect::None
        }

        Message::ImageSelected(slot, file) => {
            if !matches!(domain.state, PageState::Editing { .. }) {
                return Effect::None;
            }
            if !file.is_accepted() {
                debug!(
                    "[Profile] Dropping {} selection with type {}",
                    slot, file.content_type
                );
                return Effect::None;
            }

            let ticket = domain.issue_ticket();
            if let PageState::Editing {
                buffer, save_error, ..
            } = &mut domain.state
            {
                *buffer.image_mut(slot) = PendingImage {
                    file: Some(file.clone()),
                    preview: None,
                    ticket: Some(ticket),
                };
                *save_error = None;
            }
            Effect::DerivePreview { slot, ticket, file }
        }

        Message::PreviewReady {
            slot,
            ticket,
            preview,
        } => {
            match domain.state.buffer_mut() {
                Some(buffer) if buffer.image(slot).ticket == Some(ticket) => {
                    buffer.image_mut(slot).preview = Some(preview);
                }
                _ => debug!("[Profile] Dropping superseded preview {:?}", ticket),
            }
            Effect::None
        }

        Message::SaveRequested => {
            let (profile, buffer) = match mem::take(&mut domain.state) {
                PageState::Editing {
                    profile, buffer, ..
                } => (profile, buffer),
                other => {
                    domain.state = other;
                    return Effect::None;
                }
            };

            let changes = buffer.changes(&profile);
            if changes.is_empty() && !buffer.has_pending_images() {
                debug!("[Profile] Nothing changed, skipping update");
                domain.state = PageState::Viewing { profile };
                return Effect::None;
            }

            info!(
                "[Profile] Saving {:?} (avatar: {}, cover: {})",
                changes.field_names(),
                buffer.avatar.is_set(),
                buffer.cover_image.is_set()
            );
            let effect = Effect::UpdateProfile {
                changes,
                avatar: buffer.avatar.file.clone(),
                cover_image: buffer.cover_image.file.clone(),
            };
            domain.state = PageState::Saving { profile, buffer };
            effect
        }

        Message::SaveCompleted(result) => {
            domain.state = match (mem::take(&mut domain.state), result) {
                (PageState::Saving { .. }, Ok(updated)) => {
                    info!("[Profile] Profile {} saved", updated.id);
                    PageState::Viewing { profile: updated }
                }
                (PageState::Saving { profile, buffer }, Err(error)) => {
                    warn!("[Profile] Save failed: {}", error);
                    PageState::Editing {
                        profile,
                        buffer,
                        save_error: Some(error),
                    }
                }
                (other, _) => {
                    debug!("[Profile] Ignoring save result outside Saving");
                    other
                }
            };
            Effect::None
        }

        Message::LogoutRequested => {
            if matches!(domain.state, PageState::Viewing { .. }) {
                info!("[Profile] Logging out");
                Effect::Logout
            } else {
                Effect::None
            }
        }

        Message::LogoutCompleted(result) => {
            if let Err(error) = result {
                warn!("[Profile] Logout failed, leaving anyway: {}", error);
            }
            Effect::Navigate(Route::Login)
        }

        Message::ReturnToLogin => Effect::Navigate(Route::Login),
    }
}
