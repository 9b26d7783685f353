//! Page state machine types
//!
//! One variant is active at a time, so a page can't be both loading and
//! editing, and an edit buffer can't outlive its edit session: it lives
//! only inside `Editing` and `Saving`.

use profile_model::{ImageSlot, Profile, ProfileChanges};

use crate::infra::{
    errors::ProfileApiError, image_file::ImageFile, preview::ImagePreview,
};

/// Identifies one preview request; only the newest ticket of a slot may land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewTicket(pub u64);

/// Identifies one profile fetch; only the fetch of the current mount may land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// An image picked for one slot, waiting to be saved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingImage {
    pub file: Option<ImageFile>,
    pub preview: Option<ImagePreview>,
    pub ticket: Option<PreviewTicket>,
}

impl PendingImage {
    pub fn is_set(&self) -> bool {
        self.file.is_some()
    }
}

/// Client-side edits for the current edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub username: String,
    pub bio: String,
    pub avatar: PendingImage,
    pub cover_image: PendingImage,
}

impl EditBuffer {
    /// Seed from the cached profile; a missing bio becomes the empty string
    pub fn seeded_from(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            bio: profile.bio.clone().unwrap_or_default(),
            avatar: PendingImage::default(),
            cover_image: PendingImage::default(),
        }
    }

    pub fn image(&self, slot: ImageSlot) -> &PendingImage {
        match slot {
            ImageSlot::Avatar => &self.avatar,
            ImageSlot::CoverImage => &self.cover_image,
        }
    }

    pub fn image_mut(&mut self, slot: ImageSlot) -> &mut PendingImage {
        match slot {
            ImageSlot::Avatar => &mut self.avatar,
            ImageSlot::CoverImage => &mut self.cover_image,
        }
    }

    /// Field-level diff of the text fields against the saved profile
    pub fn changes(&self, profile: &Profile) -> ProfileChanges {
        let saved_bio = profile.bio.as_deref().unwrap_or_default();
        ProfileChanges {
            username: (self.username != profile.username)
                .then(|| self.username.clone()),
            bio: (self.bio != saved_bio).then(|| self.bio.clone()),
            ..ProfileChanges::default()
        }
    }

    pub fn has_pending_images(&self) -> bool {
        self.avatar.is_set() || self.cover_image.is_set()
    }

    pub fn tickets(&self) -> impl Iterator<Item = PreviewTicket> + '_ {
        [self.avatar.ticket, self.cover_image.ticket]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Loading,
    /// The initial fetch failed; the page can only be left
    Error { error: ProfileApiError },
    Viewing { profile: Profile },
    Editing {
        profile: Profile,
        buffer: EditBuffer,
        /// Failure of the previous save attempt, shown inline
        save_error: Option<ProfileApiError>,
    },
    /// An update request is in flight
    Saving { profile: Profile, buffer: EditBuffer },
}

impl PageState {
    pub fn name(&self) -> &'static str {
        match self {
            PageState::Loading => "Loading",
            PageState::Error { .. } => "Error",
            PageState::Viewing { .. } => "Viewing",
            PageState::Editing { .. } => "Editing",
            PageState::Saving { .. } => "Saving",
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            PageState::Viewing { profile }
            | PageState::Editing { profile, .. }
            | PageState::Saving { profile, .. } => Some(profile),
            PageState::Loading | PageState::Error { .. } => None,
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match self {
            PageState::Editing { buffer, .. }
            | PageState::Saving { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match self {
            PageState::Editing { buffer, .. }
            | PageState::Saving { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, PageState::Saving { .. })
    }
}
