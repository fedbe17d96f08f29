//! Common test utilities for routewise

pub mod backends;
pub mod fixtures;

pub use backends::EchoBackend;
pub use fixtures::{ConfigFactory, RouterFactory};
