//! Integration tests

mod config_tests;
mod load_distribution_tests;
mod routing_tests;
