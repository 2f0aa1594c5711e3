//! Career Catalog
//!
//! Static, read-only reference data the recommendation fallback matches
//! against. Loaded once at start-up and never mutated afterwards, so it can
//! be shared across workers without locking.

use super::types::CareerCatalogEntry;
use std::collections::BTreeMap;

/// Immutable mapping of career entries keyed by id, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct CareerCatalog {
    categories: BTreeMap<String, BTreeMap<String, CareerCatalogEntry>>,
}

impl CareerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, entry: CareerCatalogEntry) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(entry.id.clone(), entry);
    }

    pub fn get(&self, category: &str, id: &str) -> Option<&CareerCatalogEntry> {
        self.categories.get(category)?.get(id)
    }

    /// Total entries across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(|entries| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

fn entry(
    id: &str,
    title: &str,
    description: &str,
    skills_required: &[&str],
    education: &str,
    salary_range: &str,
    growth_prospects: &str,
    career_path: &str,
    trending_skills: &[&str],
) -> CareerCatalogEntry {
    CareerCatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        skills_required: skills_required.iter().map(|s| s.to_string()).collect(),
        education: education.to_string(),
        salary_range: salary_range.to_string(),
        growth_prospects: growth_prospects.to_string(),
        career_path: career_path.to_string(),
        trending_skills: trending_skills.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in catalog. Salary bands are monthly, in Rupiah, matching the
/// product's market.
pub fn default_catalog() -> CareerCatalog {
    let mut catalog = CareerCatalog::new();

    catalog.insert(
        "technology",
        entry(
            "software_engineer",
            "Software Engineer",
            "Merancang, membangun, dan memelihara aplikasi perangkat lunak",
            &["programming", "problem solving", "git"],
            "S1 Informatika atau setara",
            "Rp 10.000.000 - Rp 30.000.000/bulan",
            "Tinggi",
            "Junior Engineer → Senior Engineer → Tech Lead",
            &["rust", "cloud", "ai engineering"],
        ),
    );
    catalog.insert(
        "technology",
        entry(
            "data_scientist",
            "Data Scientist",
            "Mengolah data menjadi insight yang mendukung keputusan bisnis",
            &["statistics", "python", "sql"],
            "S1 Statistika/Informatika atau setara",
            "Rp 12.000.000 - Rp 28.000.000/bulan",
            "Tinggi",
            "Data Analyst → Data Scientist → Lead Data Scientist",
            &["machine learning", "mlops", "visualisasi data"],
        ),
    );
    catalog.insert(
        "business",
        entry(
            "business_analyst",
            "Business Analyst",
            "Menjembatani kebutuhan bisnis dengan solusi teknis",
            &["analysis", "communication", "excel"],
            "S1 segala jurusan",
            "Rp 8.000.000 - Rp 22.000.000/bulan",
            "Tinggi",
            "Business Analyst → Senior BA → Product Manager",
            &["sql", "agile", "data storytelling"],
        ),
    );
    catalog.insert(
        "business",
        entry(
            "digital_marketer",
            "Digital Marketing Specialist",
            "Merancang dan mengeksekusi kampanye pemasaran digital",
            &["marketing", "seo", "copywriting"],
            "S1 segala jurusan",
            "Rp 7.000.000 - Rp 18.000.000/bulan",
            "Tinggi",
            "Specialist → Strategist → Head of Marketing",
            &["seo", "performance ads", "marketing analytics"],
        ),
    );
    catalog.insert(
        "creative",
        entry(
            "ux_designer",
            "UX Designer",
            "Merancang pengalaman pengguna untuk produk digital",
            &["design", "ux research", "figma"],
            "S1 Desain atau setara",
            "Rp 9.000.000 - Rp 24.000.000/bulan",
            "Tinggi",
            "UI/UX Designer → Senior Designer → Design Lead",
            &["design system", "prototyping", "ai tooling"],
        ),
    );

    catalog
}
