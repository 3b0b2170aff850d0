// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `jwt_auth_middleware`, which rejects requests
// without a valid token and injects the caller as `Extension<AuthUser>`.
// Role checks for privileged operations happen in the services, against the
// role currently stored for the caller rather than anything in the token.

pub mod comments;
pub mod users;

pub use comments::{delete_comment, get_comment, get_comments};
pub use users::{delete_user, get_role, get_users, update_role};
