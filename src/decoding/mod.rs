//! Reading the compressed format back into symbols.
//!
//! [`decompressor::decompress`] is the entry point. The lower level modules
//! are public for callers that want to work with the bit stream directly.

pub mod bit_reader;
pub mod decompressor;
pub mod symbol_decoder;
