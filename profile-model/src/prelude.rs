//! Page-facing snapshot of the model surface.
//! Prefer importing from this module in the client instead of reaching into
//! individual modules.

pub use super::image::{
    ACCEPTED_IMAGE_TYPES, ImageSlot, content_type_for_file_name,
    is_accepted_image_type,
};
pub use super::profile::{
    Profile, ProfileChanges, ProfileId, username_initial,
};
pub use super::responses::{
    ErrorResponse, ImageUploadResponse, MessageResponse,
};
pub use super::routes;
