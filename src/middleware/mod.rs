//! HTTP middleware applied around the router.

pub mod security_headers;
