#![forbid(unsafe_code)]
#![doc = "Common types and error codes for mercury."]

pub mod error;

pub use error::*;
