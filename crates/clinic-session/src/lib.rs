//! Session bridge between browser cookies and the clinic API's bearer token,
//! plus the cookie-presence route guard.

pub mod bridge;
pub mod guard;
pub mod policy;
pub mod session;

pub use bridge::{AdminSessions, Authenticator, ClinicianSessions};
pub use guard::{Guard, GuardDecision, GuardRule};
pub use policy::CookiePolicy;
pub use session::{Session, SESSION_VERSION};

#[cfg(test)]
mod tests;
