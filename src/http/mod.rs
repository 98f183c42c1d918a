//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned or propagated)
//!     → handlers.rs (HEAD /{resource}: normalize → resolver → project)
//!     → response.rs (status only, empty text body)
//!     → error.rs (generic error rendering for everything else)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::{project, WireResponse};
pub use server::{AppState, HttpServer};
