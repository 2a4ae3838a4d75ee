//! Query parameters and their query-string encoding.
//!
//! The query string is the only place filter state lives. Reads rebuild a
//! [`QueryParameters`] value from it; every mutation is a pure function from
//! the current query string to the next one, so unrelated keys survive.

use url::form_urlencoded;

use crate::types::{PriceRange, PricingOption, SortKey, PRICE_CEILING, PRICE_FLOOR};

pub const KEY_PRICING: &str = "pricing";
pub const KEY_KEYWORD: &str = "keyword";
pub const KEY_SORT: &str = "sort";
pub const KEY_PRICE_MIN: &str = "priceMin";
pub const KEY_PRICE_MAX: &str = "priceMax";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParameters {
    /// Selected pricing options in selection order; empty means no restriction.
    pub pricing_filters: Vec<PricingOption>,
    /// `pricing` tokens we don't recognise. They still count as a restriction,
    /// and no item carries them.
    pub unknown_pricing: Vec<String>,
    pub keyword: String,
    pub sort_by: SortKey,
    pub price_range: PriceRange,
    /// Zero-based page index. Not part of the query string.
    pub page: usize,
}

impl QueryParameters {
    pub fn from_query_string(qs: &str) -> Self {
        let (mut pricing, mut keyword, mut sort, mut min, mut max) = (None, None, None, None, None);
        for (k, v) in form_urlencoded::parse(strip_question_mark(qs).as_bytes()) {
            // First occurrence wins, like URLSearchParams::get.
            let slot = match k.as_ref() {
                KEY_PRICING => &mut pricing,
                KEY_KEYWORD => &mut keyword,
                KEY_SORT => &mut sort,
                KEY_PRICE_MIN => &mut min,
                KEY_PRICE_MAX => &mut max,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(v.into_owned());
            }
        }
        let (pricing_filters, unknown_pricing) =
            pricing.as_deref().map(parse_pricing_list).unwrap_or_default();
        Self {
            pricing_filters,
            unknown_pricing,
            keyword: keyword.unwrap_or_default(),
            sort_by: sort.as_deref().map(SortKey::from_token).unwrap_or_default(),
            price_range: PriceRange::new(
                min.as_deref().and_then(parse_leading_int).unwrap_or(PRICE_FLOOR),
                max.as_deref().and_then(parse_leading_int).unwrap_or(PRICE_CEILING),
            ),
            page: 0,
        }
    }

    /// Canonical encoding of the filter state (page is left out).
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if self.is_pricing_restricted() {
            let tokens: Vec<&str> = self
                .pricing_filters
                .iter()
                .map(|o| o.as_token())
                .chain(self.unknown_pricing.iter().map(String::as_str))
                .collect();
            out.append_pair(KEY_PRICING, &tokens.join(","));
        }
        if !self.keyword.is_empty() {
            out.append_pair(KEY_KEYWORD, &self.keyword);
        }
        out.append_pair(KEY_SORT, self.sort_by.as_token());
        if !self.price_range.is_default() {
            out.append_pair(KEY_PRICE_MIN, &self.price_range.min.to_string());
            out.append_pair(KEY_PRICE_MAX, &self.price_range.max.to_string());
        }
        out.finish()
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self { page, ..self.clone() }
    }

    /// The price slider only applies when paid items are selected.
    pub fn is_paid_filter_active(&self) -> bool {
        self.pricing_filters.contains(&PricingOption::Paid)
    }

    /// True when a `pricing` value is present, even one made only of unknown tokens.
    pub fn is_pricing_restricted(&self) -> bool {
        !self.pricing_filters.is_empty() || !self.unknown_pricing.is_empty()
    }
}

/// Adds or removes `option`, keeping the other tokens (unknown ones included) in order.
pub fn toggle_pricing_filter(qs: &str, option: PricingOption) -> String {
    let current = first_value(qs, KEY_PRICING).unwrap_or_default();
    let mut tokens: Vec<&str> = Vec::new();
    for token in current.split(',').filter(|t| !t.is_empty()) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    let before = tokens.len();
    tokens.retain(|t| PricingOption::from_token(t) != Some(option));
    if tokens.len() == before {
        tokens.push(option.as_token());
    }
    if tokens.is_empty() {
        rewrite(qs, KEY_PRICING, None)
    } else {
        rewrite(qs, KEY_PRICING, Some(&tokens.join(",")))
    }
}

pub fn set_keyword(qs: &str, value: &str) -> String {
    if value.is_empty() {
        rewrite(qs, KEY_KEYWORD, None)
    } else {
        rewrite(qs, KEY_KEYWORD, Some(value))
    }
}

pub fn set_sort(qs: &str, key: &SortKey) -> String {
    rewrite(qs, KEY_SORT, Some(key.as_token()))
}

pub fn set_price_range(qs: &str, range: PriceRange) -> String {
    let range = range.clamped();
    let qs = rewrite(qs, KEY_PRICE_MIN, Some(&range.min.to_string()));
    rewrite(&qs, KEY_PRICE_MAX, Some(&range.max.to_string()))
}

/// Clears every key; the resulting parameters are the defaults.
pub fn reset_filters(_qs: &str) -> String {
    String::new()
}

fn strip_question_mark(qs: &str) -> &str {
    qs.strip_prefix('?').unwrap_or(qs)
}

fn first_value(qs: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(strip_question_mark(qs).as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Splits a `pricing` value into known options and leftover tokens, both deduplicated.
fn parse_pricing_list(raw: &str) -> (Vec<PricingOption>, Vec<String>) {
    let (mut known, mut unknown): (Vec<PricingOption>, Vec<String>) = (Vec::new(), Vec::new());
    for token in raw.split(',').filter(|t| !t.is_empty()) {
        match PricingOption::from_token(token) {
            Some(opt) if !known.contains(&opt) => known.push(opt),
            Some(_) => {}
            None if !unknown.iter().any(|u| u == token) => {
                tracing::debug!(token, "unknown pricing token matches no item");
                unknown.push(token.to_string());
            }
            None => {}
        }
    }
    (known, unknown)
}

/// Leading-integer parse: optional whitespace and sign, then digits; trailing junk
/// is ignored. `None` when no digits lead the string.
fn parse_leading_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (neg, rest) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let digits: &str = &rest[..rest.bytes().take_while(|b| b.is_ascii_digit()).count()];
    if digits.is_empty() {
        return None;
    }
    // Every char is a digit, so a parse failure can only be overflow.
    let signed = format!("{}{}", if neg { "-" } else { "" }, digits);
    Some(signed.parse().unwrap_or(if neg { i64::MIN } else { i64::MAX }))
}

/// Set (in place of the first occurrence) or delete `key`, leaving other pairs alone.
fn rewrite(qs: &str, key: &str, value: Option<&str>) -> String {
    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(strip_question_mark(qs).as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    let first = pairs.iter().position(|(k, _)| k == key);
    match (value, first) {
        (Some(v), Some(i)) => {
            pairs[i].1 = v.to_string();
            let mut seen = false;
            pairs.retain(|(k, _)| {
                if k != key {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        (Some(v), None) => pairs.push((key.to_string(), v.to_string())),
        (None, _) => pairs.retain(|(k, _)| k != key),
    }
    form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}
