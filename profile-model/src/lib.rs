//! Shared data model for the profile page.
//!
//! Everything in here mirrors what the profile backend puts on the wire:
//! the profile document, the partial update body, image slots and the small
//! acknowledgement/error envelopes. No I/O happens in this crate.
#![allow(missing_docs)]

pub mod image;
pub mod prelude;
pub mod profile;
pub mod responses;
pub mod routes;
pub mod timestamp;

pub use image::{
    ACCEPTED_IMAGE_TYPES, ImageSlot, content_type_for_file_name,
    is_accepted_image_type,
};
pub use profile::{Profile, ProfileChanges, ProfileId, username_initial};
pub use responses::{ErrorResponse, ImageUploadResponse, MessageResponse};
pub use timestamp::{TimestampError, parse_timestamp};
