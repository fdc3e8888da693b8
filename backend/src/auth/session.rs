//! Session cookie policy
//!
//! One builder for every endpoint that sets or clears the session cookie,
//! so register, login and logout always agree on its attributes.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Cookie attributes applied to the session cookie
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    fn build(&self, value: String) -> Cookie<'static> {
        Cookie::build((TOKEN_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .build()
    }

    /// Store a freshly issued token
    pub fn set_token(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(self.build(token))
    }

    /// Overwrite the token with an empty value
    pub fn clear_token(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.build(String::new()))
    }
}
