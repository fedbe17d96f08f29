//! Core functionality: backend seam, response cache and the router

pub mod backend;
pub mod cache;
pub mod router;
