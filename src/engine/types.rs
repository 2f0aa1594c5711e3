//! Career Engine Types
//!
//! Core data structures shared across the engine. Turns and recommendations
//! are immutable once constructed; catalog entries are immutable after load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================
// CONVERSATION
// ============================================================

/// One completed user-message/assistant-reply exchange.
///
/// Created only after a verified successful backend call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub assistant_text: String,
    pub timestamp: DateTime<Utc>,
    /// Structured context the client attached to this message, if any.
    pub context: Option<UserContext>,
}

/// Structured context a client may attach to a chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Assessment answers collected earlier in the session.
    pub assessment: Option<UserProfile>,
    pub career_stage: Option<String>,
    pub goals: Option<String>,
}

// ============================================================
// ASSESSMENT
// ============================================================

/// Profile supplied with an assessment request. Read-only input; the engine
/// never owns it beyond the call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: String,
    pub education: String,
    #[serde(default)]
    pub work_values: Vec<String>,
}

/// A single career recommendation, produced fresh per assessment call.
///
/// Comes from exactly one of two sources: validated backend output, or the
/// deterministic catalog fallback in `recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecommendation {
    pub career_title: String,
    /// Fit score in [0, 100].
    pub match_score: u8,
    pub reasons: Vec<String>,
    pub next_steps: Vec<String>,
    pub salary_range: String,
    pub growth_prospect: String,
}

// ============================================================
// CATALOG
// ============================================================

/// Static catalog record describing one known career.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerCatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills_required: Vec<String>,
    pub education: String,
    pub salary_range: String,
    pub growth_prospects: String,
    pub career_path: String,
    pub trending_skills: Vec<String>,
}

// ============================================================
// INTROSPECTION
// ============================================================

/// Snapshot of engine health for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    /// Character length of the instruction block.
    pub prompt_length: usize,
    /// Number of catalog entries across all categories.
    pub catalog_size: usize,
    /// Turns recorded so far in this session.
    pub turn_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<DateTime<Utc>>,
}
