use async_trait::async_trait;
use chrono::DateTime;
use profile_model::{ImageSlot, Profile, ProfileChanges};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::infra::{
    errors::{ApiResult, ProfileApiError},
    image_file::ImageFile,
    services::profile::ProfileService,
};

pub const STUB_IMAGE_HOST: &str = "https://images.example.test";

/// A call observed by the stub, without file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    FetchProfile,
    UpdateProfile {
        changes: ProfileChanges,
        avatar: Option<String>,
        cover_image: Option<String>,
    },
    UploadImage {
        slot: ImageSlot,
        file_name: String,
    },
    Logout,
    FetchImage(String),
}

/// In-memory profile backend
#[derive(Debug, Clone)]
pub struct StubProfileService {
    inner: Arc<RwLock<InnerProfileState>>,
}

#[derive(Debug, Clone)]
struct InnerProfileState {
    profile: Profile,
    calls: Vec<StubCall>,
    fetch_error: Option<ProfileApiError>,
    update_error: Option<ProfileApiError>,
    update_response: Option<Profile>,
    logout_error: Option<ProfileApiError>,
    images: HashMap<String, Vec<u8>>,
}

impl Default for StubProfileService {
    fn default() -> Self {
        Self::new()
    }
}

impl StubProfileService {
    pub fn new() -> Self {
        Self::with_profile(Self::demo_profile())
    }

    pub fn with_profile(profile: Profile) -> Self {
        let inner = InnerProfileState {
            profile,
            calls: Vec::new(),
            fetch_error: None,
            update_error: None,
            update_response: None,
            logout_error: None,
            images: HashMap::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub fn demo_profile() -> Profile {
        Profile {
            id: 1,
            email: "demo@example.com".into(),
            username: "demo".into(),
            bio: None,
            avatar: None,
            cover_image: None,
            created_at: DateTime::from_timestamp(1_709_633_472, 0)
                .unwrap_or_default(),
        }
    }

    fn write<R>(&self, f: impl FnOnce(&mut InnerProfileState) -> R) -> R {
        let mut guard = self.inner.write().expect("lock poisoned");
        f(&mut guard)
    }

    fn read<R>(&self, f: impl FnOnce(&InnerProfileState) -> R) -> R {
        let guard = self.inner.read().expect("lock poisoned");
        f(&guard)
    }

    pub fn fail_fetch_with(&self, error: ProfileApiError) {
        self.write(|s| s.fetch_error = Some(error));
    }

    /// Every update fails with `error` until [`Self::clear_update_failure`]
    pub fn fail_updates_with(&self, error: ProfileApiError) {
        self.write(|s| s.update_error = Some(error));
    }

    pub fn clear_update_failure(&self) {
        self.write(|s| s.update_error = None);
    }

    /// Answer updates with a fixed profile instead of applying the changes
    pub fn respond_to_updates_with(&self, profile: Profile) {
        self.write(|s| s.update_response = Some(profile));
    }

    pub fn fail_logout_with(&self, error: ProfileApiError) {
        self.write(|s| s.logout_error = Some(error));
    }

    pub fn insert_image(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.write(|s| {
            s.images.insert(url.into(), bytes);
        });
    }

    pub fn profile(&self) -> Profile {
        self.read(|s| s.profile.clone())
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.read(|s| s.calls.clone())
    }

    pub fn update_calls(&self) -> Vec<StubCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, StubCall::UpdateProfile { .. }))
            .collect()
    }

    fn stored_url(slot: ImageSlot, file: &ImageFile) -> String {
        format!("{}/{}/{}", STUB_IMAGE_HOST, slot, file.name)
    }
}

#[async_trait]
impl ProfileService for StubProfileService {
    async fn fetch_profile(&self) -> ApiResult<Profile> {
        self.write(|s| {
            s.calls.push(StubCall::FetchProfile);
            match &s.fetch_error {
                Some(error) => Err(error.clone()),
                None => Ok(s.profile.clone()),
            }
        })
    }

    async fn update_profile(
        &self,
        changes: ProfileChanges,
        avatar: Option<ImageFile>,
        cover_image: Option<ImageFile>,
    ) -> ApiResult<Profile> {
        self.write(|s| {
            s.calls.push(StubCall::UpdateProfile {
                changes: changes.clone(),
                avatar: avatar.as_ref().map(|f| f.name.clone()),
                cover_image: cover_image.as_ref().map(|f| f.name.clone()),
            });

            if let Some(error) = &s.update_error {
                return Err(error.clone());
            }
            if let Some(fixed) = &s.update_response {
                s.profile = fixed.clone();
                return Ok(fixed.clone());
            }

            if let Some(username) = changes.username {
                s.profile.username = username;
            }
            if let Some(bio) = changes.bio {
                s.profile.bio = Some(bio);
            }
            if let Some(url) = changes.avatar {
                s.profile.avatar = Some(url);
            }
            if let Some(url) = changes.cover_image {
                s.profile.cover_image = Some(url);
            }
            if let Some(file) = avatar.as_ref() {
                s.profile.avatar =
                    Some(Self::stored_url(ImageSlot::Avatar, file));
            }
            if let Some(file) = cover_image.as_ref() {
                s.profile.cover_image =
                    Some(Self::stored_url(ImageSlot::CoverImage, file));
            }
            Ok(s.profile.clone())
        })
    }

    async fn upload_image(
        &self,
        file: ImageFile,
        slot: ImageSlot,
    ) -> ApiResult<String> {
        self.write(|s| {
            s.calls.push(StubCall::UploadImage {
                slot,
                file_name: file.name.clone(),
            });
            let url = Self::stored_url(slot, &file);
            s.images.insert(url.clone(), file.bytes.to_vec());
            Ok(url)
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.write(|s| {
            s.calls.push(StubCall::Logout);
            match &s.logout_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        })
    }

    async fn fetch_image(&self, url: &str) -> ApiResult<Vec<u8>> {
        self.write(|s| {
            s.calls.push(StubCall::FetchImage(url.to_string()));
            s.images.get(url).cloned().ok_or_else(|| ProfileApiError::Server {
                status: 404,
                message: format!("no image at {}", url),
            })
        })
    }
}
