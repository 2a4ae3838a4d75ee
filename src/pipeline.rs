//! Filter → sort → paginate over a fully fetched item list.
//!
//! Every call starts from scratch on the whole list; nothing is cached between
//! calls, so the same inputs always produce the same page.

use icu_collator::{Collator, CollatorOptions};
use serde::Serialize;
use tracing::warn;

use crate::params::QueryParameters;
use crate::types::{ContentItem, PricingOption, SortKey};

pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPage {
    pub items: Vec<ContentItem>,
    /// Size of the filtered set, not of the raw source.
    pub total_items: usize,
    pub has_more: bool,
    pub page: usize,
}

impl ContentPage {
    pub fn next_page(&self) -> Option<usize> {
        self.has_more.then_some(self.page + 1)
    }
}

pub fn query(items: &[ContentItem], params: &QueryParameters) -> ContentPage {
    let mut matched = filter_items(items, params);
    sort_items(&mut matched, &params.sort_by);
    paginate(&matched, params.page)
}

/// Unknown `pricing` tokens keep the restriction on but match nothing, so
/// `pricing=bogus` yields an empty set rather than the whole catalog.
pub fn filter_items<'a>(
    items: &'a [ContentItem],
    params: &QueryParameters,
) -> Vec<&'a ContentItem> {
    let needle = params.keyword.to_lowercase();
    let restricted = params.is_pricing_restricted();
    items
        .iter()
        .filter(|item| !restricted || params.pricing_filters.contains(&item.pricing_option))
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.creator.to_lowercase().contains(&needle)
        })
        .filter(|item| match (item.pricing_option, item.price) {
            (PricingOption::Paid, Some(price)) => params.price_range.contains(price),
            _ => true,
        })
        .collect()
}

/// Stable sort; items without a price go last for both price orders.
pub fn sort_items(items: &mut [&ContentItem], key: &SortKey) {
    match key {
        SortKey::ItemName => match title_collator() {
            Some(collator) => items.sort_by(|a, b| collator.compare(&a.title, &b.title)),
            None => items.sort_by(|a, b| a.title.cmp(&b.title)),
        },
        SortKey::HigherPrice => items.sort_by(|a, b| {
            let pa = a.price.unwrap_or(-1.0);
            let pb = b.price.unwrap_or(-1.0);
            pb.total_cmp(&pa)
        }),
        SortKey::LowerPrice => items.sort_by(|a, b| {
            let pa = a.price.unwrap_or(f64::INFINITY);
            let pb = b.price.unwrap_or(f64::INFINITY);
            pa.total_cmp(&pb)
        }),
        SortKey::Unrecognized(_) => {}
    }
}

pub fn paginate(sorted: &[&ContentItem], page: usize) -> ContentPage {
    let start = page.saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE);
    let items = sorted
        .get(start.min(sorted.len())..end.min(sorted.len()))
        .unwrap_or_default()
        .iter()
        .map(|item| (*item).clone())
        .collect();
    ContentPage { items, total_items: sorted.len(), has_more: end < sorted.len(), page }
}

/// Root-locale collator for title order: accents and case only break ties
/// ("apple" < "Apple" < "banana", "Éclair" < "Fig").
fn title_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(error = ?e, "no collation data, falling back to code point order");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceRange;

    fn item(
        id: &str,
        title: &str,
        creator: &str,
        option: PricingOption,
        price: Option<f64>,
    ) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: title.to_string(),
            creator: creator.to_string(),
            image_path: format!("https://img.example/{id}.png"),
            pricing_option: option,
            price,
        }
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn catalog() -> Vec<ContentItem> {
        vec![
            item("1", "Blue Shirt", "anna", PricingOption::Paid, Some(25.0)),
            item("2", "Red Dress", "Bob", PricingOption::Free, None),
            item("3", "green hat", "carl", PricingOption::ViewOnly, None),
            item("4", "Shoes", "SHIRTMAKER", PricingOption::Paid, Some(120.0)),
            item("5", "Scarf", "dana", PricingOption::Paid, None),
        ]
    }

    #[test]
    fn pricing_filter_keeps_only_selected_options() {
        let items = catalog();
        let params = QueryParameters {
            pricing_filters: vec![PricingOption::Free, PricingOption::ViewOnly],
            ..Default::default()
        };
        let page = query(&items, &params);
        assert!(page.items.iter().all(|i| params.pricing_filters.contains(&i.pricing_option)));
        assert_eq!(page.total_items, 2);

        let page = query(&items, &QueryParameters::default());
        assert_eq!(page.total_items, items.len());
    }

    #[test]
    fn keyword_matches_title_or_creator_ignoring_case() {
        let items = catalog();
        let params = QueryParameters { keyword: "shirt".into(), ..Default::default() };
        let page = query(&items, &params);
        assert_eq!(ids(&page.items), vec!["1", "4"]);

        let params = QueryParameters { keyword: "BOB".into(), ..Default::default() };
        assert_eq!(ids(&query(&items, &params).items), vec!["2"]);
    }

    #[test]
    fn price_range_is_inclusive_and_skips_non_paid() {
        let items = vec![
            item("lo", "a", "x", PricingOption::Paid, Some(10.0)),
            item("hi", "b", "x", PricingOption::Paid, Some(20.0)),
            item("below", "c", "x", PricingOption::Paid, Some(9.0)),
            item("above", "d", "x", PricingOption::Paid, Some(21.0)),
            item("free", "e", "x", PricingOption::Free, None),
            item("view", "f", "x", PricingOption::ViewOnly, None),
            item("unpriced", "g", "x", PricingOption::Paid, None),
        ];
        let params = QueryParameters { price_range: PriceRange::new(10, 20), ..Default::default() };
        let page = query(&items, &params);
        assert_eq!(ids(&page.items), vec!["lo", "hi", "free", "view", "unpriced"]);
    }

    #[test]
    fn item_name_sort_orders_titles() {
        let items = vec![
            item("b", "B", "x", PricingOption::Paid, Some(5.0)),
            item("a", "A", "x", PricingOption::Paid, Some(5.0)),
        ];
        let page = query(&items, &QueryParameters::default());
        assert_eq!(ids(&page.items), vec!["a", "b"]);

        let items = vec![
            item("1", "banana", "x", PricingOption::Free, None),
            item("2", "Apple", "x", PricingOption::Free, None),
            item("3", "apple", "x", PricingOption::Free, None),
            item("4", "Cherry", "x", PricingOption::Free, None),
        ];
        let page = query(&items, &QueryParameters::default());
        assert_eq!(ids(&page.items), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn item_name_sort_ignores_accents_on_first_pass() {
        let items = vec![
            item("z", "Zebra", "x", PricingOption::Free, None),
            item("e", "Éclair", "x", PricingOption::Free, None),
            item("f", "Fig", "x", PricingOption::Free, None),
        ];
        let page = query(&items, &QueryParameters::default());
        let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Éclair", "Fig", "Zebra"]);
    }

    #[test]
    fn unknown_pricing_token_matches_nothing() {
        let items = catalog();
        let params = QueryParameters::from_query_string("pricing=bogus");
        let page = query(&items, &params);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert!(!page.has_more);

        let params = QueryParameters::from_query_string("pricing=free,bogus");
        assert_eq!(ids(&query(&items, &params).items), vec!["2"]);
    }

    #[test]
    fn missing_prices_sink_in_both_directions() {
        let items = vec![
            item("free", "a", "x", PricingOption::Free, None),
            item("cheap", "b", "x", PricingOption::Paid, Some(3.0)),
            item("view", "c", "x", PricingOption::ViewOnly, None),
            item("dear", "d", "x", PricingOption::Paid, Some(300.0)),
        ];
        let higher = QueryParameters { sort_by: SortKey::HigherPrice, ..Default::default() };
        assert_eq!(ids(&query(&items, &higher).items), vec!["dear", "cheap", "free", "view"]);
        let lower = QueryParameters { sort_by: SortKey::LowerPrice, ..Default::default() };
        assert_eq!(ids(&query(&items, &lower).items), vec!["cheap", "dear", "free", "view"]);
    }

    #[test]
    fn equal_keys_keep_source_order() {
        let items = vec![
            item("1", "same", "x", PricingOption::Paid, Some(5.0)),
            item("2", "same", "x", PricingOption::Paid, Some(5.0)),
            item("3", "same", "x", PricingOption::Paid, Some(5.0)),
        ];
        for sort_by in [SortKey::ItemName, SortKey::HigherPrice, SortKey::LowerPrice] {
            let params = QueryParameters { sort_by, ..Default::default() };
            assert_eq!(ids(&query(&items, &params).items), vec!["1", "2", "3"]);
        }
    }

    #[test]
    fn unrecognized_sort_passes_through() {
        let items = catalog();
        let params = QueryParameters {
            sort_by: SortKey::Unrecognized("newest".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&items, &params).items), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn pages_of_twelve() {
        let items: Vec<ContentItem> = (0..25)
            .map(|i| {
                let id = format!("{i:02}");
                item(&id, &format!("item {i:02}"), "x", PricingOption::Free, None)
            })
            .collect();
        let first = query(&items, &QueryParameters::default());
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.items[0].id, "00");
        assert!(first.has_more);
        assert_eq!(first.next_page(), Some(1));

        let second = query(&items, &QueryParameters::default().with_page(1));
        assert_eq!(second.items.first().map(|i| i.id.as_str()), Some("12"));
        assert_eq!(second.items.last().map(|i| i.id.as_str()), Some("23"));
        assert!(second.has_more);

        let third = query(&items, &QueryParameters::default().with_page(2));
        assert_eq!(ids(&third.items), vec!["24"]);
        assert!(!third.has_more);
        assert_eq!(third.next_page(), None);

        let past = query(&items, &QueryParameters::default().with_page(9));
        assert!(past.items.is_empty());
        assert!(!past.has_more);

        for page in [&first, &second, &third, &past] {
            assert_eq!(page.total_items, 25);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let items = catalog();
        let params = QueryParameters {
            sort_by: SortKey::LowerPrice,
            keyword: "s".into(),
            ..Default::default()
        };
        assert_eq!(query(&items, &params), query(&items, &params));
    }
}
