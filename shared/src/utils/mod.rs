pub mod http_client;
pub mod lenient;
pub mod token_extraction;
pub mod validation;
