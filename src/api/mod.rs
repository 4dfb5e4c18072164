//! HTTP surface: routes, shared handler state and error mapping.

pub mod error;
pub mod extract;
pub mod router;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
