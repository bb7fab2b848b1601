//! # Image Hiding and Recovery
//!
//! LSB parity steganography that hides whole RGB images inside one or more carrier
//! images.
//!
//! ## Encode
//! 1. [`framer`] serializes the hidden images into one byte stream
//! 2. [`planner`] splits the stream over the carriers, in order, by capacity
//! 3. [`encoder`] embeds each chunk into a copy of its carrier
//!
//! ## Decode
//! 1. [`decoder`] reads every carrier back into bytes and cuts at the stop marker
//! 2. [`framer`] parses the stream into images
//!
//! ## Capacity
//! Each payload byte takes 9 channel values (3 pixels), so a carrier holds
//! `(width * height * 3) / 9` bytes. An 800x600 carrier holds 160,000 bytes.

pub mod bitcodec;
pub mod decoder;
pub mod encoder;
pub mod framer;
pub mod pipeline;
pub mod planner;

// Re-export main functions for convenience
pub use pipeline::{decode, decode_concurrent, encode, encode_concurrent};
