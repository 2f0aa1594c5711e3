//! Chat Response Generation
//!
//! Orchestrates one chat turn: assemble context, call the backend, record
//! the exchange. The store only grows on verified successful exchanges; any
//! backend failure degrades to the fixed fallback reply without touching
//! state. `respond` never fails and never returns empty text.

use super::backend::{BackendError, GenerativeBackend};
use super::context;
use super::history::{ConversationStore, StoreSnapshot};
use super::types::{ConversationTurn, UserContext};
use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct ChatEngine {
    backend: Arc<dyn GenerativeBackend>,
    config: EngineConfig,
    /// One mutual-exclusion boundary around "read recent turns, call backend,
    /// append result". Concurrent `respond` calls cannot lose or duplicate
    /// turns, and assembly always sees a consistent recent-K view.
    store: Mutex<ConversationStore>,
}

impl ChatEngine {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: EngineConfig) -> Self {
        Self::with_store(backend, config, ConversationStore::new())
    }

    pub fn with_store(
        backend: Arc<dyn GenerativeBackend>,
        config: EngineConfig,
        store: ConversationStore,
    ) -> Self {
        Self {
            backend,
            config,
            store: Mutex::new(store),
        }
    }

    /// Runs one chat turn. Backend trouble of any kind, including an empty
    /// reply, is absorbed into the fallback message.
    pub async fn respond(&self, message: &str, user_context: Option<UserContext>) -> String {
        let mut store = self.store.lock().await;

        let prompt = context::assemble(
            &self.config.system_prompt,
            user_context.as_ref(),
            store.recent(self.config.history_window),
            message,
        );
        debug!("assembled chat prompt ({} chars)", prompt.chars().count());

        let outcome = self
            .backend
            .generate(&prompt, &self.config.generation)
            .await
            .and_then(|reply| {
                if reply.trim().is_empty() {
                    Err(BackendError::EmptyReply)
                } else {
                    Ok(reply)
                }
            });

        match outcome {
            Ok(reply) => {
                store.append(ConversationTurn {
                    user_text: message.to_string(),
                    assistant_text: reply.clone(),
                    timestamp: Utc::now(),
                    context: user_context,
                });
                reply
            }
            Err(err) => {
                warn!("chat backend failed, serving fallback reply: {}", err);
                self.config.fallback_reply.clone()
            }
        }
    }

    /// Character length of the instruction block, for status reporting.
    pub fn prompt_length(&self) -> usize {
        self.config.system_prompt.chars().count()
    }

    pub async fn store_stats(&self) -> (usize, Option<DateTime<Utc>>) {
        let store = self.store.lock().await;
        (store.len(), store.last_timestamp())
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.store.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::testing::{EmptyBackend, FailingBackend, StaticBackend};
    use crate::engine::history::ConversationStore;

    fn engine(backend: Arc<dyn GenerativeBackend>) -> ChatEngine {
        ChatEngine::new(backend, EngineConfig::default())
    }

    #[tokio::test]
    async fn successful_respond_appends_exactly_one_turn() {
        let engine = engine(Arc::new(StaticBackend::replying("Tentu, saya bantu!")));

        let reply = engine.respond("Halo", None).await;
        assert_eq!(reply, "Tentu, saya bantu!");

        let (turns, last) = engine.store_stats().await;
        assert_eq!(turns, 1);
        assert!(last.is_some());

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.turns[0].user_text, "Halo");
        assert_eq!(snapshot.turns[0].assistant_text, "Tentu, saya bantu!");
    }

    #[tokio::test]
    async fn failed_respond_returns_fallback_and_appends_nothing() {
        let engine = engine(Arc::new(FailingBackend));

        let reply = engine.respond("Halo", None).await;
        assert_eq!(reply, EngineConfig::default().fallback_reply);
        assert!(!reply.is_empty());

        let (turns, last) = engine.store_stats().await;
        assert_eq!(turns, 0);
        assert!(last.is_none());
    }

    #[tokio::test]
    async fn blank_backend_reply_counts_as_failure() {
        let engine = engine(Arc::new(EmptyBackend));

        let reply = engine.respond("Halo", None).await;
        assert_eq!(reply, EngineConfig::default().fallback_reply);

        let (turns, _) = engine.store_stats().await;
        assert_eq!(turns, 0);
    }

    #[tokio::test]
    async fn history_feeds_later_prompts() {
        use crate::engine::backend::testing::RecordingBackend;

        let backend = Arc::new(RecordingBackend::replying("jawaban"));
        let engine = ChatEngine::new(backend.clone(), EngineConfig::default());

        engine.respond("pertama", None).await;
        engine.respond("kedua", None).await;

        let prompts = backend.prompts.lock().unwrap();
        assert!(!prompts[0].contains("RIWAYAT"));
        assert!(prompts[1].contains("RIWAYAT PERCAKAPAN TERBARU:"));
        assert!(prompts[1].contains("User: pertama"));
    }

    #[tokio::test]
    async fn restored_store_is_respected() {
        let mut store = ConversationStore::new();
        store.append(ConversationTurn {
            user_text: "lama".to_string(),
            assistant_text: "balasan lama".to_string(),
            timestamp: Utc::now(),
            context: None,
        });

        let engine = ChatEngine::with_store(
            Arc::new(StaticBackend::replying("baru")),
            EngineConfig::default(),
            store,
        );

        let (turns, _) = engine.store_stats().await;
        assert_eq!(turns, 1);

        engine.respond("apa kabar", None).await;
        let (turns, _) = engine.store_stats().await;
        assert_eq!(turns, 2);
    }

    #[tokio::test]
    async fn concurrent_responds_do_not_lose_turns() {
        let engine = Arc::new(engine(Arc::new(StaticBackend::replying("ok"))));

        let mut handles = Vec::new();
        for n in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine.respond(&format!("pesan {}", n), None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let (turns, _) = engine.store_stats().await;
        assert_eq!(turns, 8);
    }
}
