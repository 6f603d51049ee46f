pub mod archive_client;
pub mod archive_request;
pub mod error;
pub mod response;
