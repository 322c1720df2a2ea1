pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiErrorResponse};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
