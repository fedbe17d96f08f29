//! Strategy registry
//!
//! Strategies are looked up by name. The active one lives in an `ArcSwap`:
//! a request loads its snapshot once, so switching strategies never changes
//! the policy of a request already in flight.

use super::builtin;
use super::types::RoutingStrategy;
use crate::core::router::error::{RouterError, RouterResult};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct StrategyRegistry {
    /// Registration order is the listing order
    strategies: RwLock<Vec<Arc<RoutingStrategy>>>,
    active: ArcSwap<RoutingStrategy>,
}

impl StrategyRegistry {
    /// Registry holding the built-in strategies, `balanced` active
    pub fn new() -> Self {
        let strategies: Vec<Arc<RoutingStrategy>> =
            builtin::all().into_iter().map(Arc::new).collect();
        let active = strategies
            .first()
            .cloned()
            .unwrap_or_else(|| Arc::new(builtin::balanced()));
        Self {
            strategies: RwLock::new(strategies),
            active: ArcSwap::new(active),
        }
    }

    /// Register a strategy, replacing any existing one with the same name
    pub fn add(&self, strategy: RoutingStrategy) -> RouterResult<()> {
        strategy
            .validate()
            .map_err(|reason| RouterError::invalid_strategy(&strategy.name, reason))?;

        let strategy = Arc::new(strategy);
        {
            let mut strategies = self.strategies.write();
            match strategies.iter_mut().find(|s| s.name == strategy.name) {
                Some(existing) => *existing = Arc::clone(&strategy),
                None => strategies.push(Arc::clone(&strategy)),
            }
        }

        if self.active.load().name == strategy.name {
            self.active.store(Arc::clone(&strategy));
        }
        info!("Registered routing strategy: {}", strategy.name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<RoutingStrategy>> {
        self.strategies
            .read()
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    pub fn set_active(&self, name: &str) -> RouterResult<()> {
        let strategy = self
            .get(name)
            .ok_or_else(|| RouterError::UnknownStrategy(name.to_string()))?;
        self.active.store(strategy);
        info!("Active routing strategy set to {}", name);
        Ok(())
    }

    /// Snapshot of the active strategy
    pub fn active(&self) -> Arc<RoutingStrategy> {
        self.active.load_full()
    }

    pub fn names(&self) -> Vec<String> {
        self.strategies
            .read()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.read().is_empty()
    }

    /// Forget every registered strategy; the active snapshot is kept
    pub fn clear(&self) {
        self.strategies.write().clear();
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
