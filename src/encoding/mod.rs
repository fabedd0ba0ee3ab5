//! Turning symbols into the compressed format.
pub mod bit_writer;
pub mod compressor;
pub mod symbol_encoder;
