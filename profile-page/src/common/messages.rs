use profile_model::ImageSlot;

use crate::common::Route;
use crate::domains::profile;
use crate::infra::errors::ProfileApiError;

/// Top-level message routed by the shell's update function
#[derive(Clone, Debug)]
pub enum DomainMessage {
    Profile(profile::Message),
    Navigate(Route),
    /// "Back to profile" from the signed-out screen
    OpenProfile,
    /// Open the native picker for a slot; the result arrives as
    /// `Profile(ImageSelected)`
    PickImage(ImageSlot),
    RemoteImageLoaded {
        url: String,
        result: Result<Vec<u8>, ProfileApiError>,
    },
    NoOp,
}

impl DomainMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile(message) => message.name(),
            Self::Navigate(_) => "DomainMessage::Navigate",
            Self::OpenProfile => "DomainMessage::OpenProfile",
            Self::PickImage(_) => "DomainMessage::PickImage",
            Self::RemoteImageLoaded { .. } => "DomainMessage::RemoteImageLoaded",
            Self::NoOp => "DomainMessage::NoOp",
        }
    }
}

impl From<profile::Message> for DomainMessage {
    fn from(message: profile::Message) -> Self {
        DomainMessage::Profile(message)
    }
}
