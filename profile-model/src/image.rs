#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// The only content types the page will buffer for upload.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// Returns true for exactly `image/png` and `image/jpeg`.
///
/// The check is on the declared type only; nothing sniffs the bytes.
pub fn is_accepted_image_type(content_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&content_type)
}

/// Declared content type for a picked file, derived from its extension the
/// same way a browser file input reports it.
pub fn content_type_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Which of the two profile images a file or URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageSlot {
    #[cfg_attr(feature = "serde", serde(rename = "avatar"))]
    Avatar,
    #[cfg_attr(feature = "serde", serde(rename = "coverImage"))]
    CoverImage,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 2] = [ImageSlot::Avatar, ImageSlot::CoverImage];

    /// Wire name, used both as the multipart field of a bundled update and
    /// as the `type` value of a dedicated upload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Avatar => "avatar",
            ImageSlot::CoverImage => "coverImage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageSlot::Avatar => "avatar",
            ImageSlot::CoverImage => "cover image",
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
