//! HTTP API server.
//!
//! Exposes every procedure as `POST /api/todo/{procedure}`.

mod router;

pub use router::{ApiServer, build_router, start_server, status_for};
