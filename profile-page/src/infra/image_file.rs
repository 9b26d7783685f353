use profile_model::{content_type_for_file_name, is_accepted_image_type};
use std::sync::Arc;

/// A picked image file held in memory until it is uploaded or discarded
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// Declared content type, as reported by the picker
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Build from a file name, deriving the declared type from its extension
    pub fn from_named_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let name = name.into();
        let content_type = content_type_for_file_name(&name);
        Self::new(name, content_type, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_accepted(&self) -> bool {
        is_accepted_image_type(&self.content_type)
    }
}

/// Open a native picker limited to PNG/JPEG and read the chosen file.
///
/// Returns `None` when the dialog is dismissed or the file can't be read.
pub async fn pick_image_file() -> Option<ImageFile> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Choose an image")
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
        .await?;

    let name = handle.file_name();
    let bytes = handle.read().await;
    if bytes.is_empty() {
        log::warn!("[Profile] Picked file {} is empty or unreadable", name);
        return None;
    }

    Some(ImageFile::from_named_bytes(name, bytes))
}
