//! API Module
//!
//! HTTP handlers and routing for the scratch registry REST API.
//!
//! # Endpoints
//! - `POST /uploads` - Save a multipart upload as a scratch file
//! - `GET /files` - List tracked scratch files
//! - `POST /cleanup` - Run a manual sweep
//! - `GET /stats` - Get registry statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
