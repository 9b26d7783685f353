//! UI domains of the page

pub mod profile;
