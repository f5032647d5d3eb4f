//! Normalization of the polymorphic `getUserShops` response.
//!
//! Etsy has returned this payload in three shapes over time: a bare shop
//! object, a bare list of shops, and a `{"results": [...]}` wrapper. The
//! tagged parse here produces a uniform candidate list so call sites never
//! branch on payload shape.

use serde_json::Value;

/// A shop identity candidate extracted from a shops response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopCandidate {
    pub shop_id: i64,
    pub shop_name: String,
}

/// Parses a shops payload into a uniform candidate list.
///
/// Accepted shapes:
/// - `{"results": [shop, ...]}` — the documented wrapper,
/// - `[shop, ...]` — a bare list,
/// - `{shop}` — a bare object, treated as a single-element list.
///
/// Entries without a numeric `shop_id` are dropped; anything else (including
/// a non-object payload) yields an empty list.
#[must_use]
pub fn parse_shop_candidates(payload: &Value) -> Vec<ShopCandidate> {
    let entries: Vec<&Value> = match payload {
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(results)) => results.iter().collect(),
            // No results key: the payload itself is the single shop.
            _ => vec![payload],
        },
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let shop_id = entry.get("shop_id").and_then(Value::as_i64)?;
            let shop_name = entry
                .get("shop_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(ShopCandidate { shop_id, shop_name })
        })
        .collect()
}
