pub mod app;
mod deserializers;
mod error;
mod middleware;
mod pagination;
mod routes;

pub use error::{ApiError, ErrorBody};
