pub mod handlers;
pub mod payload;
pub mod query;
pub mod routes;

pub use routes::routes;
