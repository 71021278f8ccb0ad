pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::{AuthContext, JwtAuth};
pub use cors::create_cors;
pub use request_id::{RequestCtx, RequestId, RequestIdMiddleware, RequestTimeout, REQUEST_ID_HEADER};
