use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::types::{ContentItem, PricingOption};

/// Record as it arrives from the catalog endpoint. Pricing may be a string tag or
/// an integer code, and the owner shows up as either `creator` or `userName`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawContentItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub image_path: String,
    #[serde(deserialize_with = "pricing_option")]
    pub pricing_option: PricingOption,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPricing {
    Code(i64),
    Tag(String),
}

fn pricing_option<'de, D: Deserializer<'de>>(d: D) -> Result<PricingOption, D::Error> {
    match RawPricing::deserialize(d)? {
        RawPricing::Code(c) => PricingOption::from_code(c)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown pricing code {}", c))),
        RawPricing::Tag(s) => PricingOption::from_token(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown pricing tag `{}`", s))),
    }
}

pub(crate) fn item_from_raw(raw: RawContentItem) -> ContentItem {
    let price = match raw.pricing_option {
        PricingOption::Paid => raw.price,
        _ => {
            if raw.price.is_some() {
                debug!(id = %raw.id, option = %raw.pricing_option, "dropping price on unpaid item");
            }
            None
        }
    };
    let creator = raw.creator.or(raw.user_name).unwrap_or_default();
    ContentItem {
        id: raw.id,
        title: raw.title,
        creator,
        image_path: raw.image_path,
        pricing_option: raw.pricing_option,
        price,
    }
}

/// Decode a catalog payload (a JSON array of records) into canonical items.
pub fn items_from_slice(body: &[u8]) -> Result<Vec<ContentItem>, serde_json::Error> {
    let raw: Vec<RawContentItem> = serde_json::from_slice(body)?;
    Ok(raw.into_iter().map(item_from_raw).collect())
}
