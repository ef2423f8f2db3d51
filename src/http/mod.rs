//! JSON API over the warm-introduction service

pub mod handler;
pub mod server;

pub use handler::AppState;
pub use server::{router, HttpServer};
