pub mod metadata;
pub mod parse;
pub mod request;
pub mod runtime;
