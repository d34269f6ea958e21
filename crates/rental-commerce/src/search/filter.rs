//! Catalog filter and its query-string form.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::money::Money;

/// Sort options understood by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Newest first.
    #[default]
    Newest,
    /// Price: low to high.
    PriceAsc,
    /// Price: high to low.
    PriceDesc,
    /// Title: A to Z.
    TitleAsc,
    /// Title: Z to A.
    TitleDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::TitleAsc => "Title: A-Z",
            SortOption::TitleDesc => "Title: Z-A",
        }
    }

    pub fn all() -> &'static [SortOption] {
        &[
            SortOption::Newest,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::TitleAsc,
            SortOption::TitleDesc,
        ]
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::all()
            .iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown sort option: {s}"))
    }
}

/// Filters for the product listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub sort: Option<SortOption>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.max(1));
        self
    }

    /// Query pairs in a fixed order: `search`, `category`, `minPrice`,
    /// `maxPrice`, `sort`, `page`, `limit`. Unset or blank filters are
    /// left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = non_blank(&self.search) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(category) = non_blank(&self.category) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_decimal().to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_decimal().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
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

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
