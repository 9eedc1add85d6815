//! Request-scoped identity.

pub mod actor;

pub use actor::{CurrentActor, USER_ID_HEADER, USER_ROLE_HEADER, actor_from_headers};
