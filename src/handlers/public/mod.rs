// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Registration, login, anonymous comment posting and the service probes.

pub mod auth;
pub mod comments;
pub mod system;

pub use auth::{login, register};
pub use comments::post_comment;
pub use system::{health, root};
