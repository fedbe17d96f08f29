//! # Routewise
//!
//! Routing and orchestration core for heterogeneous text-generation backends.
//! Given several services that differ in cost, latency, quality and
//! availability, the router picks the one that should serve each request,
//! executes it with fallback, optionally races several candidates, and
//! spreads batches across the pool.
//!
//! ## Features
//!
//! - **Multi-objective scoring**: weighted cost, speed, quality and availability
//! - **Swappable strategies**: named weight vectors with typed filter/sort rules
//! - **Live metrics**: exponentially smoothed latency and success rate per service
//! - **Fallback**: failed requests move on to the next enabled provider
//! - **Racing**: dispatch to the top-N candidates and keep the best result
//! - **Load distribution**: round-robin, weighted and least-connections batches
//! - **Response cache**: TTL-bounded memoization of successful responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use routewise::core::backend::{
//!     BackendClient, BackendError, BackendRegistry, GenerationOutput, HealthReport,
//!     SamplingParams, TokenUsage,
//! };
//! use routewise::{Config, Router, RoutingRequest};
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl BackendClient for Echo {
//!     async fn generate_text(
//!         &self,
//!         prompt: &str,
//!         _model: &str,
//!         _params: &SamplingParams,
//!     ) -> Result<GenerationOutput, BackendError> {
//!         Ok(GenerationOutput {
//!             content: prompt.to_string(),
//!             usage: TokenUsage::new(1, 1),
//!         })
//!     }
//!
//!     async fn health_check(&self) -> Result<HealthReport, BackendError> {
//!         Ok(HealthReport::healthy(5.0))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/routewise.yaml").await?;
//!     let backends = BackendRegistry::new().with_client("echo", Arc::new(Echo));
//!
//!     let router = Arc::new(Router::new(config, backends)?);
//!     router.start_background_tasks();
//!     router.warmup_services(None).await;
//!
//!     let response = router
//!         .route_request(RoutingRequest::new("Hello").with_max_tokens(64))
//!         .await?;
//!     println!("{} answered: {}", response.provider, response.content);
//!
//!     router.destroy().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::Config;
pub use core::backend::{BackendClient, BackendError, BackendRegistry};
pub use core::cache::{InMemoryResponseCache, ResponseCache};
pub use core::router::{
    EnhancedRoutingResponse, LoadBalancingStrategy, Router, RouterError, RoutingDecision,
    RoutingRequest, RoutingStats, RoutingStrategy, UserConstraints, UserPreferences,
};
pub use utils::error::{Result, RoutewiseError};
pub use utils::logging::init_logging;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
