use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Single-value picker; `All` lets everything through
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse picker input, where `ALL` (any case) or blank means no restriction
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }
}

/// Deadline window filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineFilter {
    #[default]
    All,
    #[serde(rename = "7D")]
    Within7Days,
    #[serde(rename = "30D")]
    Within30Days,
    #[serde(rename = "90D")]
    Within90Days,
    NoDeadline,
}

impl DeadlineFilter {
    /// Window length for the `nD` variants
    pub fn days(self) -> Option<i64> {
        match self {
            DeadlineFilter::Within7Days => Some(7),
            DeadlineFilter::Within30Days => Some(30),
            DeadlineFilter::Within90Days => Some(90),
            DeadlineFilter::All | DeadlineFilter::NoDeadline => None,
        }
    }
}

impl std::str::FromStr for DeadlineFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(DeadlineFilter::All),
            "7D" => Ok(DeadlineFilter::Within7Days),
            "30D" => Ok(DeadlineFilter::Within30Days),
            "90D" => Ok(DeadlineFilter::Within90Days),
            "NO_DEADLINE" | "NONE" => Ok(DeadlineFilter::NoDeadline),
            other => Err(format!("unknown deadline filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    #[default]
    Newest,
    DeadlineAsc,
    DeadlineDesc,
    TitleAsc,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NEWEST" => Ok(SortKey::Newest),
            "DEADLINE_ASC" => Ok(SortKey::DeadlineAsc),
            "DEADLINE_DESC" => Ok(SortKey::DeadlineDesc),
            "TITLE_ASC" | "TITLE" => Ok(SortKey::TitleAsc),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Everything the position list is filtered and ordered by.
/// Lives for one browsing session; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Matched against title, company name and city
    pub search: String,
    pub city: Selection,
    pub company: Selection,
    pub tag_category: Selection,
    pub deadline: DeadlineFilter,
    /// Hide positions whose deadline already passed
    pub active_only: bool,
    /// Every tag named here must be present on the position
    pub selected_tags: BTreeSet<String>,
    pub sort: SortKey,
}
