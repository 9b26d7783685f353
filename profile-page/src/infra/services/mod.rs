// Service abstractions the page talks to instead of the raw ApiClient

pub mod profile;

pub use profile::{
    BundledProfileApi, ProfileService, SplitProfileApi, profile_service,
};
