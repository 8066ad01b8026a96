//! Axum [`handlers`](axum::handler) for the HTTP tracker endpoints.
pub mod announce;
pub mod health_check;
