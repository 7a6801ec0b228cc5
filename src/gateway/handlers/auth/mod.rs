//! Session endpoints: login, logout, refresh and token retrieval.
//!
//! These are the only handlers that write the auth cookies. Each one returns a
//! structured response; failures are mapped through
//! [`crate::gateway::GatewayError`].

pub mod login;
pub mod logout;
pub mod refresh;
pub mod token;
pub mod types;


pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use token::token;
