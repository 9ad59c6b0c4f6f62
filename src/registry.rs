//! Symbol registry: one independent engine per symbol, multiplexed by name
//! (§4.6). There is no cross-symbol coordination; the registry only
//! multiplexes lookups and never locks more than one symbol's engine at a
//! time.

use crate::engine::{
    Acknowledgment, CancelError, Engine, EngineConfig, EventEmitter, NewOrder, OrderId,
    RegistryError, SubmitError, SymbolId,
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct SymbolRegistry<E: EventEmitter> {
    engines: DashMap<SymbolId, Arc<Engine<E>>>,
}

impl<E: EventEmitter> Default for SymbolRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventEmitter> SymbolRegistry<E> {
    pub fn new() -> Self {
        Self { engines: DashMap::new() }
    }

    /// Creates a fresh engine for `symbol`. Fails with `DuplicateSymbol` if
    /// already registered.
    pub fn register(&self, symbol: SymbolId, config: EngineConfig, emitter: E) -> Result<(), RegistryError> {
        if self.engines.contains_key(&symbol) {
            return Err(RegistryError::DuplicateSymbol(symbol));
        }
        let engine = Engine::new(symbol.clone(), config, emitter);
        self.engines.insert(symbol.clone(), Arc::new(engine));
        debug!(%symbol, "symbol registered");
        Ok(())
    }

    pub fn get(&self, symbol: &SymbolId) -> Option<Arc<Engine<E>>> {
        let engine = self.engines.get(symbol).map(|entry| entry.value().clone());
        trace!(%symbol, found = engine.is_some(), "symbol lookup");
        engine
    }

    /// Detaches an engine, e.g. for a delisting workflow run by a collaborator.
    pub fn remove(&self, symbol: &SymbolId) -> Option<Arc<Engine<E>>> {
        let removed = self.engines.remove(symbol).map(|(_, engine)| engine);
        if removed.is_some() {
            debug!(%symbol, "symbol removed");
        }
        removed
    }

    pub fn symbols(&self) -> Vec<SymbolId> {
        self.engines.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Routes `submit` to the named symbol's engine. An unregistered symbol
    /// returns `UnknownSymbol`, never a panic.
    pub fn submit(&self, symbol: &SymbolId, order: NewOrder) -> Result<Acknowledgment, SubmitError> {
        self.get(symbol)
            .ok_or_else(|| SubmitError::UnknownSymbol(symbol.clone()))?
            .submit(order)
    }

    /// Routes `cancel` to the named symbol's engine. An unregistered symbol
    /// returns `UnknownSymbol`, never a panic.
    pub fn cancel(&self, symbol: &SymbolId, order_id: OrderId) -> Result<Acknowledgment, CancelError> {
        self.get(symbol)
            .ok_or_else(|| CancelError::UnknownSymbol(symbol.clone()))?
            .cancel(order_id)
    }
}
