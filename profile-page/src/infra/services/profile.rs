//! Profile service trait and its two backend adapters
//!
//! Backends disagree on where image uploads live. The bundled backend takes
//! image files as parts of the profile update itself; the split backend has
//! a dedicated upload endpoint that returns a URL which is then written with
//! a plain JSON update. Both sit behind [`ProfileService`] and one is chosen
//! from configuration; the page never branches on the backend shape.

use async_trait::async_trait;
use log::{debug, info, warn};
use profile_model::{
    ImageSlot, ImageUploadResponse, MessageResponse, Profile, ProfileChanges,
    routes::{api, multipart},
};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

use crate::infra::{
    api_client::ApiClient,
    config::BackendVariant,
    errors::{ApiResult, ProfileApiError},
    image_file::ImageFile,
};

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Read the signed-in user's profile
    async fn fetch_profile(&self) -> ApiResult<Profile>;

    /// Persist changed text fields and any attached images in one logical
    /// operation. The returned profile is authoritative.
    async fn update_profile(
        &self,
        changes: ProfileChanges,
        avatar: Option<ImageFile>,
        cover_image: Option<ImageFile>,
    ) -> ApiResult<Profile>;

    /// Store a single image for a slot and return its URL
    async fn upload_image(
        &self,
        file: ImageFile,
        slot: ImageSlot,
    ) -> ApiResult<String>;

    /// Invalidate the session server-side. The local session is dropped
    /// whatever the outcome.
    async fn logout(&self) -> ApiResult<()>;

    /// Download a stored image for display
    async fn fetch_image(&self, url: &str) -> ApiResult<Vec<u8>>;
}

/// Pick the adapter for the configured backend
pub fn profile_service(
    client: Arc<ApiClient>,
    variant: BackendVariant,
) -> Arc<dyn ProfileService> {
    info!("[Profile] Using {} backend", variant);
    match variant {
        BackendVariant::Bundled => Arc::new(BundledProfileApi::new(client)),
        BackendVariant::Split => Arc::new(SplitProfileApi::new(client)),
    }
}

fn image_part(file: &ImageFile) -> ApiResult<Part> {
    Part::bytes(file.bytes.to_vec())
        .file_name(file.name.clone())
        .mime_str(&file.content_type)
        .map_err(|err| {
            ProfileApiError::Validation(format!(
                "{} has an unusable content type {:?}: {}",
                file.name, file.content_type, err
            ))
        })
}

fn data_part(changes: &ProfileChanges) -> ApiResult<Part> {
    let json = serde_json::to_string(changes)
        .map_err(|err| ProfileApiError::Decode(err.to_string()))?;
    Part::text(json)
        .mime_str("application/json")
        .map_err(|err| ProfileApiError::Decode(err.to_string()))
}

async fn logout_and_forget(client: &ApiClient) -> ApiResult<()> {
    let result = client
        .post_empty::<MessageResponse>(api::auth::LOGOUT)
        .await;
    client.set_session(None).await;

    match result {
        Ok(ack) => {
            debug!("[Profile] Logout acknowledged: {}", ack.message);
            Ok(())
        }
        Err(err) => {
            warn!("[Profile] Server-side logout failed: {}", err);
            Err(err)
        }
    }
}

/// Backend that takes images inside the profile update request
#[derive(Clone, Debug)]
pub struct BundledProfileApi {
    client: Arc<ApiClient>,
}

impl BundledProfileApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileService for BundledProfileApi {
    async fn fetch_profile(&self) -> ApiResult<Profile> {
        self.client.get_json(api::profile::ME).await
    }

    async fn update_profile(
        &self,
        changes: ProfileChanges,
        avatar: Option<ImageFile>,
        cover_image: Option<ImageFile>,
    ) -> ApiResult<Profile> {
        debug!(
            "[Profile] Bundled update of {:?} (avatar: {}, cover: {})",
            changes.field_names(),
            avatar.is_some(),
            cover_image.is_some()
        );

        if avatar.is_none() && cover_image.is_none() {
            return self.client.put_json(api::profile::UPDATE, &changes).await;
        }

        let mut form = Form::new().part(multipart::DATA, data_part(&changes)?);
        if let Some(file) = avatar.as_ref() {
            form = form.part(ImageSlot::Avatar.as_str(), image_part(file)?);
        }
        if let Some(file) = cover_image.as_ref() {
            form = form.part(ImageSlot::CoverImage.as_str(), image_part(file)?);
        }

        self.client.put_multipart(api::profile::UPDATE, form).await
    }

    async fn upload_image(
        &self,
        file: ImageFile,
        slot: ImageSlot,
    ) -> ApiResult<String> {
        let form = Form::new()
            .part(multipart::DATA, data_part(&ProfileChanges::default())?)
            .part(slot.as_str(), image_part(&file)?);

        let profile: Profile =
            self.client.put_multipart(api::profile::UPDATE, form).await?;

        profile.image_url(slot).map(str::to_string).ok_or_else(|| {
            ProfileApiError::Decode(format!(
                "server stored no {} url",
                slot.label()
            ))
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        logout_and_forget(&self.client).await
    }

    async fn fetch_image(&self, url: &str) -> ApiResult<Vec<u8>> {
        self.client.get_bytes(url).await
    }
}

/// Backend with a dedicated image endpoint and a JSON-only profile update
#[derive(Clone, Debug)]
pub struct SplitProfileApi {
    client: Arc<ApiClient>,
}

impl SplitProfileApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileService for SplitProfileApi {
    async fn fetch_profile(&self) -> ApiResult<Profile> {
        self.client.get_json(api::profile::ME).await
    }

    async fn update_profile(
        &self,
        mut changes: ProfileChanges,
        avatar: Option<ImageFile>,
        cover_image: Option<ImageFile>,
    ) -> ApiResult<Profile> {
        // Uploads go first so the update can reference their URLs; a failed
        // upload aborts before the profile is touched.
        for (slot, file) in [
            (ImageSlot::Avatar, avatar),
            (ImageSlot::CoverImage, cover_image),
        ] {
            if let Some(file) = file {
                let url = self.upload_image(file, slot).await?;
                changes.set_image_url(slot, url);
            }
        }

        debug!(
            "[Profile] Split update of {:?}",
            changes.field_names()
        );
        self.client.put_json(api::profile::UPDATE, &changes).await
    }

    async fn upload_image(
        &self,
        file: ImageFile,
        slot: ImageSlot,
    ) -> ApiResult<String> {
        let form = Form::new()
            .part(multipart::FILE, image_part(&file)?)
            .text(multipart::TYPE, slot.as_str());

        let uploaded: ImageUploadResponse =
            self.client.post_multipart(api::profile::UPLOAD, form).await?;
        debug!("[Profile] Uploaded {} to {}", slot.label(), uploaded.url);
        Ok(uploaded.url)
    }

    async fn logout(&self) -> ApiResult<()> {
        logout_and_forget(&self.client).await
    }

    async fn fetch_image(&self, url: &str) -> ApiResult<Vec<u8>> {
        self.client.get_bytes(url).await
    }
}
