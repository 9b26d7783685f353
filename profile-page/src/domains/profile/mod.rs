//! Profile page domain
//!
//! Holds the page state machine and everything derived from it. The domain
//! never performs I/O itself: [`ProfileDomain::update`] returns an
//! [`Effect`] for the shell to run.

pub mod effects;
pub mod messages;
pub mod state;
pub mod update;
pub mod view_model;

pub use effects::{Effect, perform};
pub use messages::Message;
pub use state::{EditBuffer, LoadTicket, PageState, PendingImage, PreviewTicket};
pub use view_model::{PageView, page_view};

#[derive(Debug, Default)]
pub struct ProfileDomain {
    pub state: PageState,
    /// Last preview ticket handed out; never reset, so a preview from an
    /// earlier edit session can't match a later one
    last_ticket: u64,
    last_load: u64,
    /// Fetch of the current mount; cleared once it lands or the page unmounts
    pending_load: Option<LoadTicket>,
}

impl ProfileDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message) -> Effect {
        update::update_profile(self, message)
    }

    /// Drop all page state when the shell leaves the page. Ticket numbering
    /// carries on so in-flight previews and fetches stay stale.
    pub fn unmount(&mut self) {
        self.state = PageState::Loading;
        self.pending_load = None;
    }

    pub fn view_model(&self) -> PageView {
        page_view(&self.state)
    }

    pub(crate) fn issue_load(&mut self) -> LoadTicket {
        self.last_load += 1;
        let ticket = LoadTicket(self.last_load);
        self.pending_load = Some(ticket);
        ticket
    }

    /// Consume the pending load if `ticket` is it
    pub(crate) fn take_load(&mut self, ticket: LoadTicket) -> bool {
        if self.pending_load == Some(ticket) {
            self.pending_load = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn issue_ticket(&mut self) -> PreviewTicket {
        self.last_ticket += 1;
        PreviewTicket(self.last_ticket)
    }
}
