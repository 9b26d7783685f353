use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::image::ImageSlot;

pub type ProfileId = i64;

/// The signed-in user's profile as returned by the backend.
///
/// The client never edits this in place: it is replaced wholesale by every
/// successful update response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    pub username: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bio: Option<String>,
    /// Stored avatar URL
    #[cfg_attr(feature = "serde", serde(default))]
    pub avatar: Option<String>,
    /// Stored cover image URL
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover_image: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::timestamp::serde_lenient")
    )]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn image_url(&self, slot: ImageSlot) -> Option<&str> {
        let url = match slot {
            ImageSlot::Avatar => self.avatar.as_deref(),
            ImageSlot::CoverImage => self.cover_image.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    /// Bio text worth showing; `None` means the placeholder should render.
    pub fn display_bio(&self) -> Option<&str> {
        self.bio.as_deref().filter(|bio| !bio.is_empty())
    }

    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }

    /// e.g. `Joined Mar 5, 2024`
    pub fn joined_label(&self) -> String {
        format!("Joined {}", self.created_at.format("%b %-d, %Y"))
    }
}

/// Upper-cased first character of a username, used as the avatar glyph
/// when no image is available.
pub fn username_initial(username: &str) -> String {
    username
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Partial update body. Only present fields go on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProfileChanges {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub username: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub bio: Option<String>,
    /// URL of an image already uploaded through the dedicated endpoint
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub avatar: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cover_image: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
            && self.cover_image.is_none()
    }

    pub fn set_image_url(&mut self, slot: ImageSlot, url: String) {
        match slot {
            ImageSlot::Avatar => self.avatar = Some(url),
            ImageSlot::CoverImage => self.cover_image = Some(url),
        }
    }

    /// Names of the fields being sent, for logging without the values
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.username.is_some() {
            names.push("username");
        }
        if self.bio.is_some() {
            names.push("bio");
        }
        if self.avatar.is_some() {
            names.push("avatar");
        }
        if self.cover_image.is_some() {
            names.push("coverImage");
        }
        names
    }
}
