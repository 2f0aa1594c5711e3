//! Career Recommendation
//!
//! Structured assessments. The primary path asks the backend for a JSON list
//! of recommendations and validates it strictly; any failure, malformed
//! reply, or partially valid list switches to the deterministic catalog
//! fallback. The two construction paths are disjoint so tests can force
//! either one. `assess` never fails and never returns an empty list.

use super::backend::GenerativeBackend;
use super::catalog::CareerCatalog;
use super::types::{CareerRecommendation, UserProfile};
use crate::config::EngineConfig;
use log::warn;
use serde::Deserialize;
use std::sync::Arc;

/// Holds no mutable state; safe for unsynchronized concurrent use.
pub struct RecommendationEngine {
    backend: Arc<dyn GenerativeBackend>,
    catalog: Arc<CareerCatalog>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        catalog: Arc<CareerCatalog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            backend,
            catalog,
            config,
        }
    }

    pub async fn assess(&self, profile: &UserProfile) -> Vec<CareerRecommendation> {
        let prompt = assessment_prompt(&self.config.system_prompt, profile);

        match self.backend.generate(&prompt, &self.config.generation).await {
            Ok(reply) => match parse_recommendations(&reply) {
                Some(recommendations) => recommendations,
                None => {
                    warn!("assessment reply failed validation, using catalog fallback");
                    self.fallback(profile)
                }
            },
            Err(err) => {
                warn!("assessment backend failed, using catalog fallback: {}", err);
                self.fallback(profile)
            }
        }
    }

    /// Deterministic keyword matching against the catalog. Groups are
    /// evaluated in the order of [`KEYWORD_GROUPS`]; output keeps that order
    /// and is never re-sorted by score.
    fn fallback(&self, profile: &UserProfile) -> Vec<CareerRecommendation> {
        let skills: Vec<String> = profile
            .skills
            .iter()
            .map(|skill| skill.to_lowercase())
            .collect();

        let mut recommendations = Vec::new();
        for group in KEYWORD_GROUPS {
            let matched = skills
                .iter()
                .any(|skill| group.keywords.contains(&skill.as_str()));
            if !matched {
                continue;
            }
            if let Some(entry) = self.catalog.get(group.category, group.entry_id) {
                recommendations.push(CareerRecommendation {
                    career_title: entry.title.clone(),
                    match_score: group.score,
                    reasons: group.reasons.iter().map(|s| s.to_string()).collect(),
                    next_steps: group.next_steps.iter().map(|s| s.to_string()).collect(),
                    salary_range: entry.salary_range.clone(),
                    growth_prospect: entry.growth_prospects.clone(),
                });
            }
        }

        if recommendations.is_empty() {
            recommendations.push(generic_recommendation());
        }
        recommendations
    }
}

/// Unlike chat context assembly, assessment renders every profile field even
/// when blank, so the backend sees the full questionnaire shape.
fn assessment_prompt(system_prompt: &str, profile: &UserProfile) -> String {
    format!(
        "{system_prompt}\n\n\
Berdasarkan profil berikut, berikan 5 rekomendasi karir terbaik dengan scoring:\n\n\
PROFIL USER:\n\
- Minat: {interests}\n\
- Skills: {skills}\n\
- Pengalaman: {experience}\n\
- Pendidikan: {education}\n\
- Work Values: {work_values}\n\n\
Format output sebagai JSON dengan struktur:\n\
[\n\
  {{\n\
    \"career_title\": \"Nama Profesi\",\n\
    \"match_score\": 85,\n\
    \"reasons\": [\"Alasan 1\", \"Alasan 2\"],\n\
    \"next_steps\": [\"Langkah 1\", \"Langkah 2\"],\n\
    \"salary_range\": \"Range gaji\",\n\
    \"growth_prospect\": \"Prospek karir\"\n\
  }}\n\
]",
        interests = profile.interests.join(", "),
        skills = profile.skills.join(", "),
        experience = profile.experience_level,
        education = profile.education,
        work_values = profile.work_values.join(", "),
    )
}

/// Record shape accepted from the backend. `career_title` and `match_score`
/// are mandatory; the rest default to empty.
#[derive(Deserialize)]
struct RecommendationWire {
    career_title: String,
    match_score: u8,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    next_steps: Vec<String>,
    #[serde(default)]
    salary_range: String,
    #[serde(default)]
    growth_prospect: String,
}

/// Strict validation: the reply must be a non-empty JSON list whose records
/// all carry a title and an in-range score. There is no partial acceptance —
/// one bad record invalidates the whole list.
fn parse_recommendations(reply: &str) -> Option<Vec<CareerRecommendation>> {
    let body = strip_code_fence(reply);
    let wire: Vec<RecommendationWire> = serde_json::from_str(body).ok()?;

    if wire.is_empty() {
        return None;
    }
    if wire
        .iter()
        .any(|record| record.career_title.trim().is_empty() || record.match_score > 100)
    {
        return None;
    }

    Some(
        wire.into_iter()
            .map(|record| CareerRecommendation {
                career_title: record.career_title,
                match_score: record.match_score,
                reasons: record.reasons,
                next_steps: record.next_steps,
                salary_range: record.salary_range,
                growth_prospect: record.growth_prospect,
            })
            .collect(),
    )
}

/// Models routinely wrap JSON in a Markdown code fence; accept that form.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

struct KeywordGroup {
    keywords: &'static [&'static str],
    category: &'static str,
    entry_id: &'static str,
    score: u8,
    reasons: &'static [&'static str],
    next_steps: &'static [&'static str],
}

/// Fixed evaluation order; also the output order of fallback results.
const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["programming", "coding", "software", "python"],
        category: "technology",
        entry_id: "software_engineer",
        score: 80,
        reasons: &["Memiliki skill programming", "Sesuai dengan trend teknologi"],
        next_steps: &["Perkuat portfolio coding", "Pelajari framework terbaru"],
    },
    KeywordGroup {
        keywords: &["data", "analysis", "statistics"],
        category: "technology",
        entry_id: "data_scientist",
        score: 75,
        reasons: &[
            "Memiliki kemampuan analisis",
            "Data science sedang berkembang",
        ],
        next_steps: &["Pelajari machine learning", "Buat project data analysis"],
    },
    KeywordGroup {
        keywords: &["design", "ui", "ux", "figma"],
        category: "creative",
        entry_id: "ux_designer",
        score: 72,
        reasons: &[
            "Memiliki ketertarikan pada desain",
            "Kebutuhan UX designer terus naik",
        ],
        next_steps: &["Bangun portfolio desain", "Pelajari design thinking"],
    },
    KeywordGroup {
        keywords: &["marketing", "seo", "social media"],
        category: "business",
        entry_id: "digital_marketer",
        score: 70,
        reasons: &[
            "Memiliki minat pemasaran",
            "Digital marketing dibutuhkan banyak industri",
        ],
        next_steps: &["Pelajari SEO dan SEM", "Kelola kampanye media sosial"],
    },
];

/// Served when no keyword group matches, so the result is never empty.
/// Fixed policy, independent of catalog contents.
fn generic_recommendation() -> CareerRecommendation {
    CareerRecommendation {
        career_title: "Business Analyst".to_string(),
        match_score: 60,
        reasons: vec![
            "Karir yang versatile".to_string(),
            "Cocok untuk berbagai background".to_string(),
        ],
        next_steps: vec![
            "Pelajari business analysis fundamentals".to_string(),
            "Dapatkan sertifikasi".to_string(),
        ],
        salary_range: "Rp 8.000.000 - Rp 22.000.000/bulan".to_string(),
        growth_prospect: "Tinggi".to_string(),
    }
}
