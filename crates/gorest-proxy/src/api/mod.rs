//! API route handlers

pub mod error;
pub mod posts;
pub mod request_id;
pub mod system;
pub mod todos;
pub mod users;
pub(crate) mod validation;

pub use request_id::REQUEST_ID_HEADER;
