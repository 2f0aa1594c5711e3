//! Career Mentor Backend
//!
//! A conversational career-advising service with:
//! - Free-form career counseling chat backed by a generative language model
//! - Structured career assessments with deterministic catalog fallback
//! - Bounded conversation history and reproducible context assembly
//!
//! The engine never surfaces backend trouble to callers: chat always returns
//! readable text and assessments always return at least one recommendation.

pub mod api;
pub mod config;
pub mod engine;
