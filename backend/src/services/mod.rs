//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the auth core and upload storage.

pub mod post;
pub mod user;

pub use post::PostService;
pub use user::{IssuedSession, UserService};
