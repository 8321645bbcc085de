//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    /// Shown when the backend fails without giving any usable explanation
    pub const CLIENT_GENERIC_ERROR_MSG: &str = "Something went wrong. Please try again.";
    pub const CLIENT_DEFAULT_API_URL: &str = "http://localhost:8000/api";
    pub const CLIENT_PRODUCTION_API_URL: &str = "https://ryde-cdft.onrender.com/api";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_CUSTOMER_PROFILE: PathSpec = PathSpec::get("/auth/customer/profile/");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::public_post("/auth/login/");
    pub const PATH_AUTH_LOGOUT: PathSpec = PathSpec::public_post("/auth/logout/");
    pub const PATH_AUTH_REGISTER: PathSpec = PathSpec::public_post("/auth/register/");
    pub const PATH_AUTH_TOKEN_REFRESH: PathSpec = PathSpec::public_post("/auth/token/refresh/");
}
