//! Router tests module

mod support;
