macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions shared by both backend variants
pub mod api {
    pub const ROOT: &str = "/api";

    pub mod profile {
        /// `GET` the signed-in user's profile
        pub const ME: &str = api_path!("/profile/me");
        /// `PUT` a partial update (JSON) or a bundled multipart update
        pub const UPDATE: &str = api_path!("/profile/update");
        /// `POST` a single image (split backend only)
        pub const UPLOAD: &str = api_path!("/profile/upload");
    }

    pub mod auth {
        pub const LOGOUT: &str = api_path!("/auth/logout");
    }
}

/// Multipart field names used by the update and upload endpoints
pub mod multipart {
    /// JSON part carrying the changed text fields of a bundled update
    pub const DATA: &str = "data";
    /// Binary part of a dedicated upload
    pub const FILE: &str = "file";
    /// Text part naming the slot of a dedicated upload
    pub const TYPE: &str = "type";
}
