//! Local preview derivation for picked images.
//!
//! A preview is a small PNG rendition of the picked file plus a `data:` URI
//! of it, produced before anything touches the network. Decoding runs on the
//! blocking pool; the caller tags each request so a slower, superseded
//! preview can be dropped when it finally lands.

use anyhow::{Context, Result};
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use std::io::Cursor;
use std::sync::Arc;

use crate::infra::image_file::ImageFile;

/// Longest edge of a rendered preview, in pixels
pub const PREVIEW_MAX_EDGE: u32 = 512;

#[derive(Clone, PartialEq, Eq)]
pub struct ImagePreview {
    /// Displayable `data:` URI
    pub uri: String,
    /// Encoded image bytes behind `uri`
    pub bytes: Arc<[u8]>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl std::fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreview")
            .field("uri_len", &self.uri.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Derive a preview off the async executor.
///
/// Never fails: input the decoder can't handle falls back to a data URI of
/// the raw bytes under their declared type.
pub async fn derive_preview(file: ImageFile) -> ImagePreview {
    let name = file.name.clone();
    let source = file.clone();

    match tokio::task::spawn_blocking(move || render_preview(&source)).await {
        Ok(Ok(preview)) => {
            debug!(
                "[Preview] Rendered {} at {}x{}",
                name,
                preview.width.unwrap_or_default(),
                preview.height.unwrap_or_default()
            );
            preview
        }
        Ok(Err(err)) => {
            debug!("[Preview] Using raw bytes for {}: {:#}", name, err);
            raw_preview(&file)
        }
        Err(err) => {
            warn!("[Preview] Preview task for {} failed: {}", name, err);
            raw_preview(&file)
        }
    }
}

fn render_preview(file: &ImageFile) -> Result<ImagePreview> {
    let decoded = image::load_from_memory(&file.bytes)
        .with_context(|| format!("decoding {}", file.name))?;
    let fitted = fit_within(decoded, PREVIEW_MAX_EDGE);

    let mut png = Vec::new();
    fitted
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("encoding preview png")?;

    Ok(ImagePreview {
        uri: data_uri("image/png", &png),
        width: Some(fitted.width()),
        height: Some(fitted.height()),
        bytes: png.into(),
    })
}

fn fit_within(image: DynamicImage, max_edge: u32) -> DynamicImage {
    if image.width() > max_edge || image.height() > max_edge {
        image.thumbnail(max_edge, max_edge)
    } else {
        image
    }
}

fn raw_preview(file: &ImageFile) -> ImagePreview {
    ImagePreview {
        uri: data_uri(&file.content_type, &file.bytes),
        bytes: Arc::clone(&file.bytes),
        width: None,
        height: None,
    }
}
