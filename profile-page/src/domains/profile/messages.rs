use profile_model::{ImageSlot, Profile};

use super::state::{LoadTicket, PreviewTicket};
use crate::infra::{
    errors::ProfileApiError, image_file::ImageFile, preview::ImagePreview,
};

#[derive(Clone, Debug)]
pub enum Message {
    // Lifecycle
    Mounted,
    ProfileLoaded {
        ticket: LoadTicket,
        result: Result<Profile, ProfileApiError>,
    },

    // Edit session
    EditRequested,
    CancelRequested,
    UsernameChanged(String),
    BioChanged(String),
    ImageSelected(ImageSlot, ImageFile),
    PreviewReady {
        slot: ImageSlot,
        ticket: PreviewTicket,
        preview: ImagePreview,
    },

    // Save
    SaveRequested,
    SaveCompleted(Result<Profile, ProfileApiError>),

    // Leaving the page
    LogoutRequested,
    LogoutCompleted(Result<(), ProfileApiError>),
    ReturnToLogin,
}

impl Message {
    /// Display string that keeps typed text and file contents out of logs
    pub fn sanitized_display(&self) -> String {
        match self {
            Self::UsernameChanged(_) => "UsernameChanged(..)".to_string(),
            Self::BioChanged(value) => {
                format!("BioChanged({} chars)", value.chars().count())
            }
            Self::ImageSelected(slot, file) => format!(
                "ImageSelected({}, {}, {} bytes)",
                slot,
                file.content_type,
                file.len()
            ),
            Self::PreviewReady { slot, ticket, .. } => {
                format!("PreviewReady({}, {:?})", slot, ticket)
            }
            Self::ProfileLoaded {
                ticket,
                result: Ok(_),
            } => format!("ProfileLoaded({:?}, Ok)", ticket),
            Self::SaveCompleted(Ok(_)) => "SaveCompleted(Ok)".to_string(),
            _ => format!("{:?}", self),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mounted => "Profile::Mounted",
            Self::ProfileLoaded { .. } => "Profile::ProfileLoaded",
            Self::EditRequested => "Profile::EditRequested",
            Self::CancelRequested => "Profile::CancelRequested",
            Self::UsernameChanged(_) => "Profile::UsernameChanged",
            Self::BioChanged(_) => "Profile::BioChanged",
            Self::ImageSelected(_, _) => "Profile::ImageSelected",
            Self::PreviewReady { .. } => "Profile::PreviewReady",
            Self::SaveRequested => "Profile::SaveRequested",
            Self::SaveCompleted(_) => "Profile::SaveCompleted",
            Self::LogoutRequested => "Profile::LogoutRequested",
            Self::LogoutCompleted(_) => "Profile::LogoutCompleted",
            Self::ReturnToLogin => "Profile::ReturnToLogin",
        }
    }
}
