//! Domain models shared by the store, service and API layers.

pub mod auth;
pub mod item;
pub mod user;

pub use auth::{LoginOutcome, TokenClaims};
pub use item::Item;
pub use user::{NewUser, User, UserStatus};
