//! Shopfront Session Gate
//!
//! - A session is a bearer credential plus the profile it was verified against
//! - Sessions live in tab-scoped storage: a reload restores them, closing the tab drops them
//! - Protected views stay pending until the stored credential has been checked once
//! - Only one sign-in may be in flight per gate

mod authority;
mod error;
mod gate;
mod session;
mod state;

pub use authority::Authority;
pub use error::{AuthorityError, SessionError};
pub use gate::SessionGate;
pub use session::{Credential, Profile, Session};
pub use state::{Access, GateState, Privilege};

pub type Result<T> = std::result::Result<T, SessionError>;
