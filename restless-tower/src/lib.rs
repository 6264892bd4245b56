//! Server side of the restless request tunnel, as tower middleware.
//!
//! A tunneled request arrives as a `POST` with a `multipart/form-data` body
//! holding `method`, `header` and `body` fields. [`Translate`] parses the
//! form, rewrites method and headers, swaps the body for the tunneled one
//! and calls the inner service. Every other request passes through untouched.
//!
//! Rejections are [`TranslateError`]s boxed into [`tower::BoxError`]. With
//! axum, map them with `HandleErrorLayer`:
//!
//! ```no_run
//! use axum::{Router, error_handling::HandleErrorLayer, http::StatusCode, routing::any};
//! use restless_tower::{Translate, TranslateConfig, TranslateError};
//! use tower::{BoxError, ServiceBuilder};
//!
//! async fn reject(error: BoxError) -> (StatusCode, String) {
//!     match error.downcast_ref::<TranslateError>() {
//!         Some(error) => (error.status_code(), error.to_string()),
//!         None => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
//!     }
//! }
//!
//! let app: Router = Router::new()
//!     .route("/{*path}", any(|| async { "ok" }))
//!     .layer(
//!         ServiceBuilder::new()
//!             .layer(HandleErrorLayer::new(reject))
//!             .layer(Translate::new(TranslateConfig::default())),
//!     );
//! ```

mod body;
mod config;
mod error;
pub mod form;
mod layer;
mod service;

pub use body::TranslatedBody;
pub use config::TranslateConfig;
pub use error::TranslateError;
pub use form::{FormParser, MulterParser};
pub use layer::Translate;
pub use service::TranslateService;
