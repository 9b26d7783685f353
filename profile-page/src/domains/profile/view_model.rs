//! What the page shows, derived from [`PageState`].
//!
//! The iced view only lays this out; every display decision (placeholder
//! text, which image wins, button labels and enablement) lives here.

use profile_model::{ImageSlot, Profile, username_initial};

use super::state::{EditBuffer, PageState, PreviewTicket};
use crate::infra::errors::ProfileApiError;

pub const NO_BIO_PLACEHOLDER: &str = "No bio added yet";
pub const BIO_EDIT_PLACEHOLDER: &str = "Add a bio...";
pub const LOAD_FAILED_FALLBACK: &str = "Failed to load profile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Spinner,
    ErrorPanel { message: String },
    Card(ProfileCard),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    Viewing,
    Editing,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageView {
    /// Local preview of a picked, unsaved file
    Preview { ticket: PreviewTicket, uri: String },
    /// Stored image on the server
    Remote { url: String },
    /// Avatar without image: the username initial
    Initial(String),
    /// Cover without image
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioView {
    Text(String),
    Placeholder,
    Editor { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub mode: CardMode,
    /// Saved username in view mode, the buffer in edit mode
    pub username: String,
    pub handle: String,
    pub email: String,
    pub joined: String,
    pub bio: BioView,
    pub avatar: ImageView,
    pub cover: ImageView,
    pub primary_label: &'static str,
    pub primary_enabled: bool,
    pub can_cancel: bool,
    pub can_logout: bool,
    pub can_pick_images: bool,
    pub inline_error: Option<String>,
}

pub fn page_view(state: &PageState) -> PageView {
    match state {
        PageState::Loading => PageView::Spinner,
        PageState::Error { error } => PageView::ErrorPanel {
            message: error_panel_message(error),
        },
        PageState::Viewing { profile } => {
            PageView::Card(card(profile, None, CardMode::Viewing, None))
        }
        PageState::Editing {
            profile,
            buffer,
            save_error,
        } => PageView::Card(card(
            profile,
            Some(buffer),
            CardMode::Editing,
            save_error.as_ref(),
        )),
        PageState::Saving { profile, buffer } => PageView::Card(card(
            profile,
            Some(buffer),
            CardMode::Saving,
            None,
        )),
    }
}

fn error_panel_message(error: &ProfileApiError) -> String {
    let message = error.user_message();
    if message.trim().is_empty() {
        LOAD_FAILED_FALLBACK.to_string()
    } else {
        message
    }
}

fn card(
    profile: &Profile,
    buffer: Option<&EditBuffer>,
    mode: CardMode,
    save_error: Option<&ProfileApiError>,
) -> ProfileCard {
    let username = buffer
        .map(|b| b.username.clone())
        .unwrap_or_else(|| profile.username.clone());

    let bio = match buffer {
        Some(buffer) => BioView::Editor {
            value: buffer.bio.clone(),
        },
        None => match profile.display_bio() {
            Some(text) => BioView::Text(text.to_string()),
            None => BioView::Placeholder,
        },
    };

    let avatar = image_view(profile, buffer, ImageSlot::Avatar)
        .unwrap_or_else(|| ImageView::Initial(avatar_initial(profile, buffer)));
    let cover = image_view(profile, buffer, ImageSlot::CoverImage)
        .unwrap_or(ImageView::Empty);

    let (primary_label, primary_enabled) = match mode {
        CardMode::Viewing => ("Edit Profile", true),
        CardMode::Editing => ("Save Profile", true),
        CardMode::Saving => ("Saving...", false),
    };

    ProfileCard {
        mode,
        username,
        handle: profile.handle(),
        email: profile.email.clone(),
        joined: profile.joined_label(),
        bio,
        avatar,
        cover,
        primary_label,
        primary_enabled,
        can_cancel: mode == CardMode::Editing,
        can_logout: mode == CardMode::Viewing,
        can_pick_images: mode == CardMode::Editing,
        inline_error: save_error.map(ProfileApiError::user_message),
    }
}

/// Preview beats stored image; `None` means fall back to the slot default
fn image_view(
    profile: &Profile,
    buffer: Option<&EditBuffer>,
    slot: ImageSlot,
) -> Option<ImageView> {
    let preview = buffer.and_then(|b| {
        let pending = b.image(slot);
        match (&pending.preview, pending.ticket) {
            (Some(preview), Some(ticket)) => Some(ImageView::Preview {
                ticket,
                uri: preview.uri.clone(),
            }),
            _ => None,
        }
    });

    preview.or_else(|| {
        profile.image_url(slot).map(|url| ImageView::Remote {
            url: url.to_string(),
        })
    })
}

/// While editing, the glyph follows what is being typed
fn avatar_initial(profile: &Profile, buffer: Option<&EditBuffer>) -> String {
    let typed = buffer
        .map(|b| username_initial(&b.username))
        .unwrap_or_default();
    if typed.is_empty() {
        username_initial(&profile.username)
    } else {
        typed
    }
}
