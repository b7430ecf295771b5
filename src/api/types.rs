/// Server-side filters and paging for `GET /api/positions`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub company_id: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PositionQuery {
    /// Query-string pairs for the set fields only
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(company_id) = &self.company_id {
            pairs.push(("companyId", company_id.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
