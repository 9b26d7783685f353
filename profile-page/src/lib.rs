//! Profile page
//!
//! Desktop page for viewing and editing the signed-in user's profile. The
//! page logic lives in [`domains::profile`] as a synchronous state machine;
//! [`update`] and [`view`] are the iced glue around it and
//! [`infra`] holds the HTTP client and backend adapters.
//!
//! The library is exposed mainly so the integration tests can drive the
//! page without a window.

pub mod app;
pub mod common;
pub mod domains;
pub mod infra;
pub mod state;
pub mod update;
pub mod view;
