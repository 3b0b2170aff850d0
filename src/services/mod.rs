pub mod comment_service;
pub mod error;
pub mod identity_service;

pub use comment_service::{CommentService, PostCommentRequest};
pub use error::{ServiceError, ServiceResult};
pub use identity_service::{IdentityService, LoginRequest, RegisterRequest, UpdateRoleRequest, UserDirectory};
