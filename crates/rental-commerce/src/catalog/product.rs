//! Rental product and promotion types.
//!
//! Products are owned by the storefront API and arrive as JSON. Only the
//! fields the quote flow relies on are typed; descriptive fields such as
//! dimensions are carried verbatim so they can be echoed back in a quote.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rental product as served by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Value>,
    /// Base price per rental day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_day_pricing: Option<PriceField>,
    /// Category, either a plain name or an embedded category document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
}

impl Product {
    /// Create a product with a title and numeric base price.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, per_day: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            images: Vec::new(),
            height: None,
            length: None,
            width: None,
            shape: None,
            per_day_pricing: Some(PriceField::from(per_day)),
            category: None,
            description: None,
            promotion: None,
        }
    }

    /// Attach a promotion.
    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Set the category name.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(Value::String(category.into()));
        self
    }

    /// Human-readable category name, if any.
    pub fn category_name(&self) -> Option<&str> {
        match self.category.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map
                .get("name")
                .or_else(|| map.get("title"))
                .and_then(Value::as_str),
            _ => None,
        }
    }

    /// Cover image URL.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether an active promotion is attached.
    pub fn is_discounted(&self) -> bool {
        self.promotion.as_ref().map(|p| p.active).unwrap_or(false)
    }
}

/// A price as the API sends it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(serde_json::Number),
    Text(String),
}

impl PriceField {
    /// Numeric value, or `None` when the text does not parse.
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceField::Number(n) => n.as_f64(),
            PriceField::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for PriceField {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(PriceField::Number)
            .unwrap_or_else(|| PriceField::Text(value.to_string()))
    }
}

/// Promotion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionKind {
    /// Fixed amount off the per-day price.
    Flat,
    /// Percentage off the per-day price.
    Percent,
}

impl PromotionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionKind::Flat => "flat",
            PromotionKind::Percent => "percent",
        }
    }
}

/// A discount descriptor attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    /// Inactive promotions are ignored by pricing.
    #[serde(default)]
    pub active: bool,
    pub kind: PromotionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PriceField>,
}

impl Promotion {
    /// Active flat promotion.
    pub fn flat(amount: f64) -> Self {
        Self {
            active: true,
            kind: PromotionKind::Flat,
            value: Some(PriceField::from(amount)),
        }
    }

    /// Active percentage promotion.
    pub fn percent(percent: f64) -> Self {
        Self {
            active: true,
            kind: PromotionKind::Percent,
            value: Some(PriceField::from(percent)),
        }
    }

    /// Deactivate.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
