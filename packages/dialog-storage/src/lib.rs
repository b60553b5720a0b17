pub mod db;
pub mod models;
pub mod queries;
pub mod schema;
pub mod search_index;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
