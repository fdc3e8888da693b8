//! Authentication and authorization
//!
//! Stateless session tokens (HS256 JWT in an HTTP-only cookie), Argon2
//! password hashing, and the author-only ownership rule for mutations.

mod jwt;
mod middleware;
pub mod password;
mod policy;
mod session;

pub use jwt::{Claim, Claims, TokenCodec};
pub use middleware::{auth_middleware, authenticate, AuthUser};
pub use policy::{authorize, authorize_id, Authored};
pub use session::{CookiePolicy, TOKEN_COOKIE};
