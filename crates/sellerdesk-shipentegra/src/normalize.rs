//! Classification of free-text carrier tracking payloads.
//!
//! Carriers report status as unstructured text in up to three places (status,
//! summary, scan events). The classifier concatenates all three, case-folds,
//! and matches keyword sets. English and Turkish keywords are covered —
//! ShipEntegra fronts mostly Turkish-market carriers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sellerdesk_core::CarrierSignal;

use crate::types::ActivitiesPayload;

const DELIVERED_KEYWORDS: &[&str] = &["delivered", "completed", "teslim"];

const IN_TRANSIT_KEYWORDS: &[&str] = &[
    "in transit",
    "out for delivery",
    "shipped",
    "yolda",
    "transfer",
    "kargoya verildi",
    "dağıtım",
];

/// A carrier payload folded down to what reconciliation and persistence need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTracking {
    pub signal: CarrierSignal,
    /// Human-readable status for display: first non-empty of status text,
    /// summary, last scan event; `"unknown"` when all are blank.
    pub display_status: String,
    /// Only populated when classified delivered and the payload carried a
    /// parsable delivery date.
    pub delivered_at: Option<DateTime<Utc>>,
    /// The payload serialized back to JSON, kept for diagnostics.
    pub raw: String,
}

/// Classifies a tracking-activities payload.
///
/// Returns `None` when the top-level status marker is not `"success"` or the
/// payload carries no data — the caller treats that as "no signal", not an
/// error. A delivered match takes precedence over an in-transit match.
#[must_use]
pub fn normalize_tracking(payload: &ActivitiesPayload) -> Option<NormalizedTracking> {
    let success = payload
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("success"));
    if !success {
        return None;
    }
    let data = payload.data.as_ref()?;

    let status_text = data.status.as_deref().unwrap_or_default();
    let summary_text = data.summary.as_deref().unwrap_or_default();
    let last_event = data
        .activities
        .last()
        .and_then(|a| a.event.as_deref())
        .unwrap_or_default();

    let haystack = format!("{status_text} {summary_text} {last_event}").to_lowercase();

    let signal = if DELIVERED_KEYWORDS.iter().any(|k| haystack.contains(k)) {
        CarrierSignal::Delivered
    } else if IN_TRANSIT_KEYWORDS.iter().any(|k| haystack.contains(k)) {
        CarrierSignal::InTransit
    } else {
        CarrierSignal::Unknown
    };

    let delivered_at = if signal == CarrierSignal::Delivered {
        data.delivery_date.as_ref().and_then(parse_delivery_date)
    } else {
        None
    };

    let display_status = [status_text, summary_text, last_event]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string();

    Some(NormalizedTracking {
        signal,
        display_status,
        delivered_at,
        raw: serde_json::to_string(payload).unwrap_or_default(),
    })
}

/// Parses a delivery date that may arrive as epoch seconds or as an
/// ISO-8601-ish string. Unparsable values yield `None`; a bad date never
/// fails a sync run.
fn parse_delivery_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = value.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }

    let text = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: serde_json::Value) -> ActivitiesPayload {
        serde_json::from_value(value).expect("test payload should deserialize")
    }

    #[test]
    fn non_success_marker_is_no_signal() {
        let p = payload(serde_json::json!({
            "status": "error",
            "data": {"status": "Delivered"}
        }));
        assert!(normalize_tracking(&p).is_none());
    }

    #[test]
    fn missing_data_is_no_signal() {
        let p = payload(serde_json::json!({"status": "success"}));
        assert!(normalize_tracking(&p).is_none());
    }

    #[test]
    fn in_transit_activities_classify_as_in_transit() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {
                "status": "in transit",
                "activities": [
                    {"event": "picked up"},
                    {"event": "out for delivery"}
                ]
            }
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::InTransit);
        assert!(normalized.delivered_at.is_none());
        assert_eq!(normalized.display_status, "in transit");
    }

    #[test]
    fn delivered_summary_sets_delivered_at_from_delivery_date() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {
                "summary": "Delivered Successfully",
                "deliveryDate": "2026-03-01T10:30:00Z"
            }
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::Delivered);
        let delivered_at = normalized.delivered_at.unwrap();
        assert_eq!(delivered_at.to_rfc3339(), "2026-03-01T10:30:00+00:00");
    }

    #[test]
    fn delivered_takes_precedence_over_in_transit() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {
                "status": "shipped",
                "activities": [{"event": "Delivered to recipient"}]
            }
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::Delivered);
    }

    #[test]
    fn only_the_last_activity_event_is_classified() {
        // Earlier "delivered to depot"-style events must not count; only the
        // most recent scan participates in classification.
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {
                "activities": [
                    {"event": "Delivered to origin facility"},
                    {"event": "departed sorting hub"}
                ]
            }
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::Unknown);
    }

    #[test]
    fn turkish_status_text_is_classified() {
        let delivered = payload(serde_json::json!({
            "status": "success",
            "data": {"status": "Teslim Edildi"}
        }));
        assert_eq!(
            normalize_tracking(&delivered).unwrap().signal,
            CarrierSignal::Delivered
        );

        let moving = payload(serde_json::json!({
            "status": "success",
            "data": {"summary": "Kargoya verildi"}
        }));
        assert_eq!(
            normalize_tracking(&moving).unwrap().signal,
            CarrierSignal::InTransit
        );
    }

    #[test]
    fn unmatched_text_is_unknown_with_display_fallback() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {"activities": [{"event": "label created"}]}
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::Unknown);
        assert_eq!(normalized.display_status, "label created");
    }

    #[test]
    fn blank_payload_display_falls_back_to_unknown() {
        let p = payload(serde_json::json!({"status": "success", "data": {}}));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.display_status, "unknown");
    }

    #[test]
    fn unparsable_delivery_date_is_tolerated() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {"status": "delivered", "deliveryDate": "next tuesday"}
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.signal, CarrierSignal::Delivered);
        assert!(normalized.delivered_at.is_none());
    }

    #[test]
    fn epoch_delivery_date_is_parsed() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {"status": "delivered", "deliveryDate": 1_700_000_000}
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(normalized.delivered_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn date_only_delivery_date_is_parsed() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {"status": "delivered", "deliveryDate": "2026-03-01"}
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert_eq!(
            normalized.delivered_at.unwrap().to_rfc3339(),
            "2026-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn raw_payload_is_retained_for_diagnostics() {
        let p = payload(serde_json::json!({
            "status": "success",
            "data": {"status": "delivered"}
        }));
        let normalized = normalize_tracking(&p).unwrap();
        assert!(normalized.raw.contains("delivered"));
    }
}
