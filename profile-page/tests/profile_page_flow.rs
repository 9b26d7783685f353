//! End-to-end page behaviour: the domain state machine driven through
//! `perform` against the in-memory backend.

use chrono::{TimeZone, Utc};
use profile_model::{ImageSlot, Profile, ProfileChanges};
use profile_page::common::Route;
use profile_page::domains::profile::view_model::{
    BioView, CardMode, ImageView, PageView, ProfileCard,
};
use profile_page::domains::profile::{
    Effect, Message, PageState, ProfileDomain, perform,
};
use profile_page::infra::errors::ProfileApiError;
use profile_page::infra::image_file::ImageFile;
use profile_page::infra::services::ProfileService;
use profile_page::infra::testing::stubs::{StubCall, StubProfileService};
use std::sync::Arc;

struct Harness {
    domain: ProfileDomain,
    stub: StubProfileService,
    service: Arc<dyn ProfileService>,
}

impl Harness {
    fn new(stub: StubProfileService) -> Self {
        let service: Arc<dyn ProfileService> = Arc::new(stub.clone());
        Self {
            domain: ProfileDomain::new(),
            stub,
            service,
        }
    }

    async fn mounted(stub: StubProfileService) -> Self {
        let mut harness = Self::new(stub);
        harness.dispatch(Message::Mounted).await;
        harness
    }

    /// Feed a message and every follow-up message until the page is idle
    async fn dispatch(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut next = Some(message);
        while let Some(message) = next.take() {
            let effect = self.domain.update(message);
            effects.push(effect.clone());
            next = perform(effect, self.service.clone()).await;
        }
        effects
    }

    fn card(&self) -> ProfileCard {
        match self.domain.view_model() {
            PageView::Card(card) => card,
            other => panic!("expected a profile card, got {:?}", other),
        }
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
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(),
    }
}

fn png(name: &str, bytes: Vec<u8>) -> ImageFile {
    ImageFile::new(name, "image/png", bytes)
}

#[tokio::test]
async fn mounting_loads_the_profile_into_view_mode() {
    let harness = Harness::mounted(StubProfileService::with_profile(ann())).await;

    assert_eq!(harness.domain.state, PageState::Viewing { profile: ann() });

    let card = harness.card();
    assert_eq!(card.mode, CardMode::Viewing);
    assert_eq!(card.username, "ann");
    assert_eq!(card.handle, "@ann");
    assert_eq!(card.joined, "Joined Mar 5, 2024");
    assert_eq!(card.bio, BioView::Placeholder);
    assert_eq!(card.avatar, ImageView::Initial("A".into()));
    assert_eq!(card.cover, ImageView::Empty);
    assert_eq!(card.primary_label, "Edit Profile");
    assert!(card.can_logout);
    assert_eq!(harness.stub.calls(), vec![StubCall::FetchProfile]);
}

#[tokio::test]
async fn load_failure_shows_the_error_panel_and_leads_to_login() {
    let stub = StubProfileService::new();
    stub.fail_fetch_with(ProfileApiError::Auth("expired".into()));
    let mut harness = Harness::mounted(stub).await;

    assert_eq!(
        harness.domain.view_model(),
        PageView::ErrorPanel {
            message: "Your session has expired. Please sign in again.".into()
        }
    );

    let effects = harness.dispatch(Message::ReturnToLogin).await;
    assert_eq!(effects, vec![Effect::Navigate(Route::Login)]);
}

#[tokio::test]
async fn cancel_discards_every_edit() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;

    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::UsernameChanged("zed".into())).await;
    harness.dispatch(Message::BioChanged("draft".into())).await;
    harness
        .dispatch(Message::ImageSelected(
            ImageSlot::CoverImage,
            png("wide.png", vec![1, 2]),
        ))
        .await;
    harness.dispatch(Message::CancelRequested).await;

    assert_eq!(harness.domain.state, PageState::Viewing { profile: ann() });
    assert!(harness.stub.update_calls().is_empty());
}

#[tokio::test]
async fn saving_an_untouched_buffer_sends_nothing() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;

    harness.dispatch(Message::EditRequested).await;
    let effects = harness.dispatch(Message::SaveRequested).await;

    assert_eq!(effects, vec![Effect::None]);
    assert_eq!(harness.domain.state, PageState::Viewing { profile: ann() });
    assert!(harness.stub.update_calls().is_empty());
}

#[tokio::test]
async fn bio_edit_sends_only_the_bio() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;

    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::BioChanged("hi".into())).await;
    harness.dispatch(Message::SaveRequested).await;

    assert_eq!(
        harness.stub.update_calls(),
        vec![StubCall::UpdateProfile {
            changes: ProfileChanges {
                bio: Some("hi".into()),
                ..Default::default()
            },
            avatar: None,
            cover_image: None,
        }]
    );

    let card = harness.card();
    assert_eq!(card.mode, CardMode::Viewing);
    assert_eq!(card.bio, BioView::Text("hi".into()));
    assert_eq!(card.username, "ann");
}

#[tokio::test]
async fn unsupported_image_types_are_ignored() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;

    let gif = ImageFile::from_named_bytes("party.gif", vec![0x47, 0x49, 0x46]);
    let effects = harness
        .dispatch(Message::ImageSelected(ImageSlot::Avatar, gif))
        .await;

    assert_eq!(effects, vec![Effect::None]);
    let buffer = harness.domain.state.buffer().unwrap();
    assert!(!buffer.has_pending_images());

    harness.dispatch(Message::SaveRequested).await;
    assert!(harness.stub.update_calls().is_empty());
}

#[tokio::test]
async fn unsupported_image_keeps_the_previous_pick() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;
    harness
        .dispatch(Message::ImageSelected(
            ImageSlot::Avatar,
            png("me.png", vec![1, 2, 3]),
        ))
        .await;

    let before = harness.domain.state.buffer().unwrap().avatar.clone();
    assert!(before.file.is_some());
    assert!(before.ticket.is_some());
    assert!(before.preview.is_some());

    let gif = ImageFile::from_named_bytes("party.gif", vec![0x47, 0x49, 0x46]);
    let effects = harness
        .dispatch(Message::ImageSelected(ImageSlot::Avatar, gif))
        .await;

    assert_eq!(effects, vec![Effect::None]);
    assert_eq!(harness.domain.state.buffer().unwrap().avatar, before);
}

#[tokio::test]
async fn server_response_replaces_the_local_profile() {
    let stub = StubProfileService::with_profile(ann());
    let mut from_server = ann();
    from_server.username = "ann_srv".into();
    stub.respond_to_updates_with(from_server.clone());
    let mut harness = Harness::mounted(stub).await;

    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::UsernameChanged("anna".into())).await;
    harness.dispatch(Message::SaveRequested).await;

    assert_eq!(
        harness.domain.state,
        PageState::Viewing {
            profile: from_server
        }
    );
}

#[tokio::test]
async fn failed_save_keeps_the_buffer_and_shows_the_error() {
    let stub = StubProfileService::with_profile(ann());
    stub.fail_updates_with(ProfileApiError::Validation(
        "Username already taken".into(),
    ));
    let mut harness = Harness::mounted(stub).await;

    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::UsernameChanged("taken".into())).await;
    harness.dispatch(Message::SaveRequested).await;

    let card = harness.card();
    assert_eq!(card.mode, CardMode::Editing);
    assert_eq!(card.username, "taken");
    assert_eq!(card.inline_error.as_deref(), Some("Username already taken"));
    assert_eq!(harness.domain.state.profile(), Some(&ann()));

    // Typing again clears the message, and a retry goes through
    harness.dispatch(Message::UsernameChanged("anna".into())).await;
    assert_eq!(harness.card().inline_error, None);

    harness.stub.clear_update_failure();
    harness.dispatch(Message::SaveRequested).await;
    assert_eq!(harness.card().username, "anna");
    assert_eq!(harness.card().mode, CardMode::Viewing);
}

#[tokio::test]
async fn save_in_flight_ignores_further_input() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::BioChanged("hi".into())).await;

    // Drive by hand so the request stays in flight
    let first = harness.domain.update(Message::SaveRequested);
    assert!(matches!(first, Effect::UpdateProfile { .. }));
    assert!(harness.domain.state.is_saving());

    assert_eq!(harness.domain.update(Message::SaveRequested), Effect::None);
    assert_eq!(harness.domain.update(Message::CancelRequested), Effect::None);
    harness.domain.update(Message::BioChanged("other".into()));

    let card = harness.card();
    assert_eq!(card.mode, CardMode::Saving);
    assert_eq!(card.primary_label, "Saving...");
    assert!(!card.primary_enabled);
    assert!(!card.can_cancel);
    assert_eq!(
        card.bio,
        BioView::Editor {
            value: "hi".into()
        }
    );
}

#[tokio::test]
async fn saved_avatar_replaces_the_initial() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;
    harness
        .dispatch(Message::ImageSelected(
            ImageSlot::Avatar,
            png("me.png", vec![1, 2, 3]),
        ))
        .await;

    assert!(matches!(harness.card().avatar, ImageView::Preview { .. }));

    harness.dispatch(Message::SaveRequested).await;

    assert_eq!(
        harness.stub.update_calls(),
        vec![StubCall::UpdateProfile {
            changes: ProfileChanges::default(),
            avatar: Some("me.png".into()),
            cover_image: None,
        }]
    );
    assert_eq!(
        harness.card().avatar,
        ImageView::Remote {
            url: "https://images.example.test/avatar/me.png".into()
        }
    );
}

#[tokio::test]
async fn only_the_newest_preview_lands() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;

    // Neither byte string decodes, so each preview is the raw data URI
    let older = harness.domain.update(Message::ImageSelected(
        ImageSlot::Avatar,
        png("a.png", vec![1]),
    ));
    let newer = harness.domain.update(Message::ImageSelected(
        ImageSlot::Avatar,
        png("b.png", vec![2]),
    ));

    let newer_ready = perform(newer, harness.service.clone()).await.unwrap();
    let older_ready = perform(older, harness.service.clone()).await.unwrap();
    harness.domain.update(newer_ready);
    harness.domain.update(older_ready);

    let buffer = harness.domain.state.buffer().unwrap();
    assert_eq!(buffer.avatar.file.as_ref().unwrap().name, "b.png");
    assert_eq!(
        buffer.avatar.preview.as_ref().unwrap().uri,
        "data:image/png;base64,Ag=="
    );
}

#[tokio::test]
async fn avatar_initial_follows_the_typed_username() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;

    harness.dispatch(Message::UsernameChanged("zed".into())).await;
    assert_eq!(harness.card().avatar, ImageView::Initial("Z".into()));

    harness.dispatch(Message::UsernameChanged(String::new())).await;
    assert_eq!(harness.card().avatar, ImageView::Initial("A".into()));
}

#[tokio::test]
async fn logout_leaves_the_page_whatever_the_server_says() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    let effects = harness.dispatch(Message::LogoutRequested).await;
    assert_eq!(
        effects,
        vec![Effect::Logout, Effect::Navigate(Route::Login)]
    );

    let stub = StubProfileService::with_profile(ann());
    stub.fail_logout_with(ProfileApiError::Network("offline".into()));
    let mut harness = Harness::mounted(stub).await;
    let effects = harness.dispatch(Message::LogoutRequested).await;
    assert_eq!(
        effects,
        vec![Effect::Logout, Effect::Navigate(Route::Login)]
    );
    assert_eq!(
        harness.stub.calls(),
        vec![StubCall::FetchProfile, StubCall::Logout]
    );
}

#[tokio::test]
async fn logout_is_unavailable_while_editing() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;

    let effects = harness.dispatch(Message::LogoutRequested).await;

    assert_eq!(effects, vec![Effect::None]);
    assert!(!harness.card().can_logout);
}

#[tokio::test]
async fn late_save_result_after_leaving_is_dropped() {
    let mut harness = Harness::mounted(StubProfileService::with_profile(ann())).await;
    harness.dispatch(Message::EditRequested).await;
    harness.dispatch(Message::BioChanged("hi".into())).await;
    let pending = harness.domain.update(Message::SaveRequested);

    harness.domain.unmount();
    let late = perform(pending, harness.service.clone()).await.unwrap();
    harness.domain.update(late);

    assert_eq!(harness.domain.state, PageState::Loading);
}

#[tokio::test]
async fn fetch_from_an_earlier_mount_is_dropped() {
    let mut harness = Harness::new(StubProfileService::with_profile(ann()));

    let first = harness.domain.update(Message::Mounted);
    assert!(matches!(first, Effect::FetchProfile { .. }));
    harness.domain.unmount();

    let late = perform(first.clone(), harness.service.clone()).await.unwrap();
    harness.domain.update(late);
    assert_eq!(harness.domain.state, PageState::Loading);

    // Remounted: the old result still can't land, the new one does
    let second = harness.domain.update(Message::Mounted);
    assert_ne!(first, second);
    let stale = perform(first, harness.service.clone()).await.unwrap();
    harness.domain.update(stale);
    assert_eq!(harness.domain.state, PageState::Loading);

    let fresh = perform(second, harness.service.clone()).await.unwrap();
    harness.domain.update(fresh);
    assert_eq!(harness.domain.state, PageState::Viewing { profile: ann() });
}
