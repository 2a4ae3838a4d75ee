use serde::{Deserialize, Serialize};

/// Lowest and highest bound the price slider can take.
pub const PRICE_FLOOR: i64 = 0;
pub const PRICE_CEILING: i64 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PricingOption {
    Paid,
    Free,
    ViewOnly,
}

impl PricingOption {
    /// Token used in the `pricing` query parameter.
    pub fn as_token(self) -> &'static str {
        match self {
            PricingOption::Paid => "paid",
            PricingOption::Free => "free",
            PricingOption::ViewOnly => "viewOnly",
        }
    }

    /// Accepts the URL tokens plus the upper/snake-case spellings seen in payloads.
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(PricingOption::Paid),
            "free" => Some(PricingOption::Free),
            "viewonly" | "view_only" | "view-only" => Some(PricingOption::ViewOnly),
            _ => None,
        }
    }

    /// Integer code used by the numeric payload encoding.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PricingOption::Paid),
            1 => Some(PricingOption::Free),
            2 => Some(PricingOption::ViewOnly),
            _ => None,
        }
    }
}

impl std::fmt::Display for PricingOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

impl std::str::FromStr for PricingOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::from_token(s).ok_or_else(|| {
            anyhow::anyhow!("unknown pricing option `{}` (expected paid, free, viewOnly)", s)
        })
    }
}

/// Canonical content record. Built only through `mapping`, which enforces that
/// `price` is set for paid items alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub image_path: String,
    pub pricing_option: PricingOption,
    pub price: Option<f64>,
}

impl ContentItem {
    /// Price label as shown on a product card.
    pub fn price_label(&self) -> String {
        match self.pricing_option {
            PricingOption::ViewOnly => "View Only".to_string(),
            PricingOption::Free => "FREE".to_string(),
            PricingOption::Paid => match self.price {
                Some(p) => format!("${:.2}", p),
                None => "$-".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    ItemName,
    HigherPrice,
    LowerPrice,
    /// Token we don't know; the pipeline leaves the order untouched.
    Unrecognized(String),
}

impl SortKey {
    pub fn as_token(&self) -> &str {
        match self {
            SortKey::ItemName => "itemName",
            SortKey::HigherPrice => "higherPrice",
            SortKey::LowerPrice => "lowerPrice",
            SortKey::Unrecognized(s) => s.as_str(),
        }
    }

    pub fn from_token(s: &str) -> Self {
        match s {
            "" | "itemName" => SortKey::ItemName,
            "higherPrice" => SortKey::HigherPrice,
            "lowerPrice" => SortKey::LowerPrice,
            other => SortKey::Unrecognized(other.to_string()),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Inclusive price bounds, applied to paid items only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: PRICE_FLOOR, max: PRICE_CEILING }
    }
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }

    /// Keep both handles inside the slider domain, lower handle first.
    pub fn clamped(self) -> Self {
        let a = self.min.clamp(PRICE_FLOOR, PRICE_CEILING);
        let b = self.max.clamp(PRICE_FLOOR, PRICE_CEILING);
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
