use std::collections::HashSet;

use serde::Serialize;

use super::collate;
use crate::models::Position;

/// Distinct values offered by the filter pickers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub companies: Vec<String>,
    pub tag_categories: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Default)]
struct Distinct {
    seen: HashSet<String>,
    values: Vec<String>,
}

impl Distinct {
    fn push(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        // first spelling wins
        if self.seen.insert(value.to_lowercase()) {
            self.values.push(value.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.values.sort_by_cached_key(|v| collate::key(v));
        self.values
    }
}

impl FilterOptions {
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut cities = Distinct::default();
        let mut companies = Distinct::default();
        let mut categories = Distinct::default();
        let mut tags = Distinct::default();

        for position in positions {
            cities.push(&position.location.city);
            companies.push(position.company_name());
            for tag in &position.tags {
                categories.push(&tag.category);
                tags.push(&tag.name);
            }
        }

        Self {
            cities: cities.finish(),
            companies: companies.finish(),
            tag_categories: categories.finish(),
            tags: tags.finish(),
        }
    }
}

/// One page of a longer list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Number of items on the pages before this one
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Slice out `page` (1-based). Out-of-range pages come back empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total,
        total_pages,
    }
}
