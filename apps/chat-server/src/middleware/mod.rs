//! Middleware modules.

pub mod error;
pub mod ingress;
