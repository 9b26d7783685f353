//! Root-level view composition

use iced::font::{self, Font};
use iced::widget::{button, column, container, image, row, text, text_input};
use iced::{Alignment, ContentFit, Element, Length};
use profile_model::ImageSlot;

use crate::common::Route;
use crate::common::messages::DomainMessage;
use crate::domains::profile::Message;
use crate::domains::profile::view_model::{
    BIO_EDIT_PLACEHOLDER, BioView, CardMode, ImageView, NO_BIO_PLACEHOLDER,
    PageView, ProfileCard,
};
use crate::state::State;

const COVER_HEIGHT: f32 = 180.0;
const AVATAR_SIZE: f32 = 96.0;
const CARD_WIDTH: f32 = 640.0;

pub fn view(state: &State) -> Element<'_, DomainMessage> {
    let content: Element<'_, DomainMessage> = match state.route {
        Route::Login => view_signed_out(),
        Route::Profile => match state.profile.view_model() {
            PageView::Spinner => view_loading(),
            PageView::ErrorPanel { message } => view_error(message),
            PageView::Card(card) => view_card(state, card),
        },
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(24)
        .center_x(Length::Fill)
        .into()
}

fn view_loading<'a>() -> Element<'a, DomainMessage> {
    container(text("Loading profile...").size(18))
        .center(Length::Fill)
        .into()
}

fn view_error<'a>(message: String) -> Element<'a, DomainMessage> {
    let panel = column![
        text("Something went wrong").size(22),
        text(message).style(text::danger),
        button("Go to login")
            .on_press(Message::ReturnToLogin.into())
            .style(button::secondary),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(panel).center(Length::Fill).into()
}

fn view_signed_out<'a>() -> Element<'a, DomainMessage> {
    let panel = column![
        text("You are signed out").size(22),
        button("Back to profile").on_press(DomainMessage::OpenProfile),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(panel).center(Length::Fill).into()
}

fn view_card(state: &State, card: ProfileCard) -> Element<'_, DomainMessage> {
    let editing = card.mode == CardMode::Editing;

    let mut cover_block = column![view_cover(state, &card.cover)].spacing(6);
    if card.can_pick_images {
        cover_block = cover_block.push(
            button("Change cover")
                .on_press(DomainMessage::PickImage(ImageSlot::CoverImage))
                .style(button::secondary),
        );
    }

    let mut avatar_block = column![view_avatar(state, &card.avatar)]
        .spacing(6)
        .align_x(Alignment::Center);
    if card.can_pick_images {
        avatar_block = avatar_block.push(
            button("Change avatar")
                .on_press(DomainMessage::PickImage(ImageSlot::Avatar))
                .style(button::secondary),
        );
    }

    let name: Element<'_, DomainMessage> = match card.mode {
        CardMode::Viewing => text(card.username.clone()).size(26).into(),
        CardMode::Editing | CardMode::Saving => {
            text_input("Username", &card.username)
                .on_input_maybe(
                    editing.then_some(|value: String| -> DomainMessage {
                        Message::UsernameChanged(value).into()
                    }),
                )
                .size(20)
                .into()
        }
    };

    let identity = column![
        name,
        text(card.handle.clone()).size(14),
        text(card.email.clone()).size(14),
        text(card.joined.clone()).size(13),
    ]
    .spacing(4);

    let bio: Element<'_, DomainMessage> = match &card.bio {
        BioView::Text(value) => text(value.clone()).into(),
        BioView::Placeholder => text(NO_BIO_PLACEHOLDER)
            .font(Font {
                style: font::Style::Italic,
                ..Font::DEFAULT
            })
            .into(),
        BioView::Editor { value } => text_input(BIO_EDIT_PLACEHOLDER, value)
            .on_input_maybe(
                editing.then_some(|value: String| -> DomainMessage {
                    Message::BioChanged(value).into()
                }),
            )
            .into(),
    };

    let primary_message = match card.mode {
        CardMode::Viewing => Message::EditRequested,
        CardMode::Editing | CardMode::Saving => Message::SaveRequested,
    };
    let primary = button(text(card.primary_label)).on_press_maybe(
        card.primary_enabled
            .then(|| DomainMessage::from(primary_message)),
    );
    let mut actions = row![primary].spacing(8);

    if card.mode != CardMode::Viewing {
        actions = actions.push(
            button("Cancel")
                .on_press_maybe(
                    card.can_cancel
                        .then(|| DomainMessage::from(Message::CancelRequested)),
                )
                .style(button::secondary),
        );
    }
    if card.can_logout {
        actions = actions.push(
            button("Logout")
                .on_press(Message::LogoutRequested.into())
                .style(button::danger),
        );
    }

    let mut body = column![
        cover_block,
        row![avatar_block, identity]
            .spacing(16)
            .align_y(Alignment::Center),
        bio,
    ]
    .spacing(16);

    if let Some(error) = card.inline_error {
        body = body.push(text(error).style(text::danger));
    }
    body = body.push(actions);

    container(body)
        .max_width(CARD_WIDTH)
        .padding(16)
        .style(container::rounded_box)
        .into()
}

fn view_cover<'a>(state: &'a State, view: &ImageView) -> Element<'a, DomainMessage> {
    let handle = match view {
        ImageView::Preview { ticket, .. } => state.preview_handles.get(ticket),
        ImageView::Remote { url } => state.image_cache.get(url),
        ImageView::Initial(_) | ImageView::Empty => None,
    };

    match handle {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(COVER_HEIGHT)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(""))
            .width(Length::Fill)
            .height(COVER_HEIGHT)
            .style(container::dark)
            .into(),
    }
}

fn view_avatar<'a>(state: &'a State, view: &ImageView) -> Element<'a, DomainMessage> {
    let handle = match view {
        ImageView::Preview { ticket, .. } => state.preview_handles.get(ticket),
        ImageView::Remote { url } => state.image_cache.get(url),
        ImageView::Initial(_) | ImageView::Empty => None,
    };

    match (handle, view) {
        (Some(handle), _) => image(handle.clone())
            .width(AVATAR_SIZE)
            .height(AVATAR_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        (None, ImageView::Initial(initial)) => {
            container(text(initial.clone()).size(40))
                .center(AVATAR_SIZE)
                .style(container::rounded_box)
                .into()
        }
        // Stored or previewed image still loading
        (None, _) => container(text(""))
            .width(AVATAR_SIZE)
            .height(AVATAR_SIZE)
            .style(container::rounded_box)
            .into(),
    }
}
