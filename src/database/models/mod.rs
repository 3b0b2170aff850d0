pub mod comment;
pub mod user;

pub use comment::{Comment, NewComment};
pub use user::{NewUser, User, UserSummary};
