//! Career Advising Engine
//!
//! The engine has five parts:
//! - `catalog`: static career reference data used for fallback matching
//! - `history`: bounded conversation storage with snapshot round-trips
//! - `context`: deterministic prompt assembly
//! - `chat`: single-turn response generation with graceful degradation
//! - `recommend`: structured assessments with deterministic catalog fallback
//!
//! `backend` defines the capability interface to the external language model;
//! everything else depends only on that trait, never on a concrete client.

pub mod backend;
pub mod catalog;
pub mod chat;
pub mod context;
pub mod history;
pub mod recommend;
pub mod types;

use crate::config::EngineConfig;
use backend::GenerativeBackend;
use catalog::CareerCatalog;
use chat::ChatEngine;
use history::{ConversationStore, SnapshotError, StoreSnapshot};
use recommend::RecommendationEngine;
use std::sync::Arc;
use types::{CareerRecommendation, EngineStatus, UserContext, UserProfile};

/// Facade the transport layer talks to. Safe to share across workers:
/// the only mutable state is the conversation store inside [`ChatEngine`],
/// which serializes access itself.
pub struct CareerMentor {
    chat: ChatEngine,
    recommend: RecommendationEngine,
    catalog: Arc<CareerCatalog>,
}

impl CareerMentor {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        catalog: CareerCatalog,
        config: EngineConfig,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            chat: ChatEngine::new(Arc::clone(&backend), config.clone()),
            recommend: RecommendationEngine::new(backend, Arc::clone(&catalog), config),
            catalog,
        }
    }

    /// Restores a mentor whose conversation history comes from a snapshot.
    pub fn with_snapshot(
        backend: Arc<dyn GenerativeBackend>,
        catalog: CareerCatalog,
        config: EngineConfig,
        snapshot: StoreSnapshot,
    ) -> Result<Self, SnapshotError> {
        let store = ConversationStore::restore(snapshot)?;
        let catalog = Arc::new(catalog);
        Ok(Self {
            chat: ChatEngine::with_store(Arc::clone(&backend), config.clone(), store),
            recommend: RecommendationEngine::new(backend, Arc::clone(&catalog), config),
            catalog,
        })
    }

    /// One chat turn. Always returns readable, non-empty text.
    pub async fn respond(&self, message: &str, context: Option<UserContext>) -> String {
        self.chat.respond(message, context).await
    }

    /// Career assessment. Always returns at least one recommendation.
    pub async fn assess(&self, profile: &UserProfile) -> Vec<CareerRecommendation> {
        self.recommend.assess(profile).await
    }

    /// Health/status introspection.
    pub async fn describe(&self) -> EngineStatus {
        let (turn_count, last_interaction) = self.chat.store_stats().await;
        EngineStatus {
            prompt_length: self.chat.prompt_length(),
            catalog_size: self.catalog.len(),
            turn_count,
            last_interaction,
        }
    }

    /// Hands the conversation history to the persistence collaborator.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.chat.snapshot().await
    }
}
