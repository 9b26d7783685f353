/// Top-level screens the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Profile,
    /// Where the user lands after logout or a fatal load error
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Profile => "/profile",
            Route::Login => "/login",
        }
    }
}
