//! Response wrappers that only exist on the wire.

pub mod api;
pub mod auth;
