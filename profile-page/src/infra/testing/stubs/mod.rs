pub mod profile;

pub use profile::{StubCall, StubProfileService};
