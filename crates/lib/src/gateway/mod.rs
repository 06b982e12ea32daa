//! Gateway: the webhook HTTP server.
//!
//! `POST /webhook` acknowledges immediately and handles events in background tasks;
//! `GET /test-courses` dumps the active catalog; `GET /` is a liveness probe.

mod server;

pub use server::{router, run_gateway, GatewayState};
