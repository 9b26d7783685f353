//! Side effects requested by the page update function.
//!
//! `update` stays synchronous and pure; whatever needs the network or the
//! blocking pool comes back as an [`Effect`] and is run by [`perform`],
//! whose result is fed back in as the next message.

use log::debug;
use profile_model::{ImageSlot, ProfileChanges};
use std::sync::Arc;

use super::messages::Message;
use super::state::{LoadTicket, PreviewTicket};
use crate::common::Route;
use crate::infra::{
    image_file::ImageFile, preview::derive_preview,
    services::profile::ProfileService,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    FetchProfile {
        ticket: LoadTicket,
    },
    UpdateProfile {
        changes: ProfileChanges,
        avatar: Option<ImageFile>,
        cover_image: Option<ImageFile>,
    },
    DerivePreview {
        slot: ImageSlot,
        ticket: PreviewTicket,
        file: ImageFile,
    },
    Logout,
    /// Handled by the shell, never by [`perform`]
    Navigate(Route),
}

/// Run an effect and produce the message that reports its outcome.
///
/// Returns `None` for effects that have nothing to run here.
pub async fn perform(
    effect: Effect,
    service: Arc<dyn ProfileService>,
) -> Option<Message> {
    match effect {
        Effect::None | Effect::Navigate(_) => None,
        Effect::FetchProfile { ticket } => {
            debug!("[Profile] Fetching profile ({:?})", ticket);
            Some(Message::ProfileLoaded {
                ticket,
                result: service.fetch_profile().await,
            })
        }
        Effect::UpdateProfile {
            changes,
            avatar,
            cover_image,
        } => {
            let result =
                service.update_profile(changes, avatar, cover_image).await;
            Some(Message::SaveCompleted(result))
        }
        Effect::DerivePreview { slot, ticket, file } => {
            let preview = derive_preview(file).await;
            Some(Message::PreviewReady {
                slot,
                ticket,
                preview,
            })
        }
        Effect::Logout => Some(Message::LogoutCompleted(service.logout().await)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::{ApiResult, ProfileApiError};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::{mock, predicate::eq};
    use profile_model::Profile;

    mock! {
        pub Service {}

        #[async_trait]
        impl ProfileService for Service {
            async fn fetch_profile(&self) -> ApiResult<Profile>;
            async fn update_profile(
                &self,
                changes: ProfileChanges,
                avatar: Option<ImageFile>,
                cover_image: Option<ImageFile>,
            ) -> ApiResult<Profile>;
            async fn upload_image(
                &self,
                file: ImageFile,
                slot: ImageSlot,
            ) -> ApiResult<String>;
            async fn logout(&self) -> ApiResult<()>;
            async fn fetch_image(&self, url: &str) -> ApiResult<Vec<u8>>;
        }
    }

    fn ann() -> Profile {
        Profile {
            id: 1,
            email: "ann@example.com".into(),
            username: "ann".into(),
            bio: None,
            avatar: None,
            cover_image: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn navigation_and_none_never_touch_the_service() {
        // No expectations: any call would panic
        let service: Arc<dyn ProfileService> = Arc::new(MockService::new());
        assert!(perform(Effect::None, service.clone()).await.is_none());
        assert!(
            perform(Effect::Navigate(Route::Login), service)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_passes_the_diff_through_unchanged() {
        let changes = ProfileChanges {
            bio: Some("hi".into()),
            ..Default::default()
        };
        let mut updated = ann();
        updated.bio = Some("hi".into());
        let returned = updated.clone();

        let mut service = MockService::new();
        service
            .expect_update_profile()
            .with(eq(changes.clone()), eq(None), eq(None))
            .times(1)
            .returning(move |_, _, _| Ok(returned.clone()));

        let message = perform(
            Effect::UpdateProfile {
                changes,
                avatar: None,
                cover_image: None,
            },
            Arc::new(service),
        )
        .await;

        match message {
            Some(Message::SaveCompleted(Ok(profile))) => {
                assert_eq!(profile, updated)
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn logout_failure_is_reported_not_raised() {
        let mut service = MockService::new();
        service.expect_logout().times(1).returning(|| {
            Err(ProfileApiError::Network("connection refused".into()))
        });

        let message = perform(Effect::Logout, Arc::new(service)).await;
        assert!(matches!(message, Some(Message::LogoutCompleted(Err(_)))));
    }

    #[tokio::test]
    async fn fetch_reports_auth_failures() {
        let mut service = MockService::new();
        service
            .expect_fetch_profile()
            .returning(|| Err(ProfileApiError::Auth("expired".into())));

        let message = perform(
            Effect::FetchProfile {
                ticket: LoadTicket(4),
            },
            Arc::new(service),
        )
        .await;
        match message {
            Some(Message::ProfileLoaded {
                ticket,
                result: Err(err),
            }) => {
                assert_eq!(ticket, LoadTicket(4));
                assert!(err.is_auth());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn preview_effect_carries_its_ticket() {
        let service: Arc<dyn ProfileService> = Arc::new(MockService::new());
        let file = ImageFile::new("a.png", "image/png", vec![0u8; 8]);
        let message = perform(
            Effect::DerivePreview {
                slot: ImageSlot::Avatar,
                ticket: PreviewTicket(9),
                file,
            },
            service,
        )
        .await;

        match message {
            Some(Message::PreviewReady { slot, ticket, .. }) => {
                assert_eq!(slot, ImageSlot::Avatar);
                assert_eq!(ticket, PreviewTicket(9));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
