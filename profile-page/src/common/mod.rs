pub mod messages;
pub mod route;

pub use route::Route;
