//! Test doubles shared by unit tests, integration tests and the
//! `PROFILE_PAGE_STUBS` offline mode.

pub mod stubs;
