use reqwest::Method;

#[derive(Debug, Clone)]
pub struct PathSpec {
    pub path: &'static str,
    pub method: Method,
    /// If set the bearer token is never attached, even when one is stored
    pub is_public: bool,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: Method::GET,
            is_public: false,
        }
    }

    pub const fn public_post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
            is_public: true,
        }
    }
}
