pub mod common;
pub mod imaging;
pub mod processing;

pub use common::error::{Result, StegoError};
pub use processing::{decode, decode_concurrent, encode, encode_concurrent};
