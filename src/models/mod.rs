//! Runtime settings shared by the library and the binary.

pub mod config;
