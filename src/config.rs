//! Runtime Configuration
//!
//! Process configuration comes from the environment once at start-up; engine
//! policy (prompt text, history window, sampling parameters) is fixed for the
//! process lifetime and not tunable per request.

use crate::engine::backend::GenerationOptions;
use std::time::Duration;
use thiserror::Error;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is not set; the Gemini backend cannot be reached")]
    MissingApiKey,
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

/// Process-level configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub model: String,
}

impl AppConfig {
    /// Loads configuration from the environment. A missing API key is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port_raw = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            host,
            port,
            api_key,
            model,
        })
    }
}

/// Fixed engine policy shared by the chat and recommendation engines.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Instruction block prepended verbatim to every prompt.
    pub system_prompt: String,
    /// How many recent turns enter the assembled context.
    pub history_window: usize,
    /// Canned reply served when the backend is unreachable.
    pub fallback_reply: String,
    /// Sampling parameters sent with every generation request.
    pub generation: GenerationOptions,
    /// Upper bound on one backend call; a timeout is an ordinary failure.
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            history_window: 3,
            fallback_reply: FALLBACK_REPLY.to_string(),
            generation: GenerationOptions::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The counseling persona. Product copy is Indonesian by design.
const SYSTEM_PROMPT: &str = "\
Anda adalah CareerMentorAI, seorang konselor karir profesional yang ahli membantu orang menemukan jalur karir yang tepat.

PERAN ANDA:
- Memberikan panduan karir yang personal dan relevan
- Membantu mengidentifikasi minat, bakat, dan potensi karir
- Memberikan informasi tentang berbagai profesi dan industri
- Menyarankan langkah-langkah pengembangan karir
- Memberikan motivasi dan dukungan dalam perjalanan karir

GAYA KOMUNIKASI:
- Ramah, supportif, dan profesional
- Menggunakan bahasa Indonesia yang mudah dipahami
- Memberikan jawaban yang praktis dan actionable
- Mengajukan pertanyaan yang membantu eksplorasi diri

Selalu berikan jawaban yang membantu dan konstruktif!";

const FALLBACK_REPLY: &str = "\
Maaf, saya mengalami kendala teknis saat ini.

Sebagai alternatif, saya tetap bisa membantu Anda dengan:
- Memberikan informasi umum tentang berbagai profesi
- Membantu Anda memahami skill yang dibutuhkan untuk karir tertentu
- Memberikan panduan pengembangan karir secara umum

Silakan ajukan pertanyaan spesifik Anda, dan saya akan berusaha membantu dengan pengetahuan yang ada.";
