//! Wire schema of the freezing-zone `OpenAPI` response.
//!
//! Every numeric field is kept as a loosely typed [`Value`] here; the
//! portal sends most numbers as strings but occasionally as bare JSON
//! numbers or `null`. Conversion happens explicitly via
//! [`crate::coerce`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::coerce::coerce_count;

/// Top-level JSON envelope returned by the upstream endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEnvelope {
    /// Portal result code (`"00"` on success). Absent in some responses.
    #[serde(default)]
    pub result_code: Option<String>,
    /// Human-readable result message accompanying `result_code`.
    #[serde(default)]
    pub result_msg: Option<String>,
    /// Total number of matching rows on the server, regardless of paging.
    #[serde(default)]
    pub total_count: Option<Value>,
    /// Wrapped item list. Absent, `null` and a blank string (the portal's
    /// shape for an empty result) all read as empty.
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<ItemWrapper>,
}

impl ZoneEnvelope {
    /// Returns the item wrappers in upstream order.
    #[must_use]
    pub fn wrappers(&self) -> &[ItemWrapper] {
        &self.items
    }

    /// Server-side row count, if the envelope reported a usable one.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        coerce_count(self.total_count.as_ref()).ok()
    }

    /// Whether the portal reported a non-success result code.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.result_code
            .as_deref()
            .is_some_and(|code| code.trim() != SUCCESS_RESULT_CODE)
    }
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<ItemWrapper>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Items {
        List(Vec<ItemWrapper>),
        Text(String),
    }

    match Option::<Items>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Items::List(items)) => Ok(items),
        Some(Items::Text(text)) if text.trim().is_empty() => Ok(Vec::new()),
        Some(Items::Text(text)) => Err(D::Error::custom(format!(
            "expected an item list, got string '{text}'"
        ))),
    }
}

/// Result code the portal uses for a successful query.
pub const SUCCESS_RESULT_CODE: &str = "00";

/// A single `{ "item": { ... } }` wrapper inside `items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemWrapper {
    /// The wrapped record. `None` when the wrapper lacks the key.
    #[serde(default)]
    pub item: Option<RawZoneItem>,
}

/// One accident-zone record exactly as the portal sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawZoneItem {
    /// Combined province/district name (e.g. `"경기 고양시"`).
    #[serde(default)]
    pub sido_sgg_nm: Option<String>,
    /// Hazard spot description.
    #[serde(default)]
    pub spot_nm: Option<String>,
    /// Latitude.
    #[serde(default)]
    pub la_crd: Option<Value>,
    /// Longitude.
    #[serde(default)]
    pub lo_crd: Option<Value>,
    /// Accident occurrence count.
    #[serde(default)]
    pub occrrnc_cnt: Option<Value>,
    /// Casualty count.
    #[serde(default)]
    pub caslt_cnt: Option<Value>,
    /// Deaths.
    #[serde(default)]
    pub dth_dnv_cnt: Option<Value>,
    /// Serious injuries.
    #[serde(default)]
    pub se_dnv_cnt: Option<Value>,
    /// Minor injuries.
    #[serde(default)]
    pub sl_dnv_cnt: Option<Value>,
    /// Injury reports.
    #[serde(default)]
    pub wnd_dnv_cnt: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_wrappers_without_item() {
        let envelope: ZoneEnvelope = serde_json::from_str(
            r#"{
                "resultCode": "00",
                "items": [
                    {"item": {"sido_sgg_nm": "경기 고양시", "la_crd": "37.6"}},
                    {"other": 1},
                    {"item": {"sido_sgg_nm": "강원 춘천시"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(envelope.wrappers().len(), 3);
        let names: Vec<_> = envelope
            .wrappers()
            .iter()
            .filter_map(|w| w.item.as_ref())
            .filter_map(|i| i.sido_sgg_nm.as_deref())
            .collect();
        assert_eq!(names, ["경기 고양시", "강원 춘천시"]);
    }

    #[test]
    fn missing_or_null_items_is_empty() {
        let absent: ZoneEnvelope = serde_json::from_str(r#"{"resultCode": "00"}"#).unwrap();
        assert!(absent.wrappers().is_empty());

        let null: ZoneEnvelope = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(null.wrappers().is_empty());
    }

    #[test]
    fn blank_string_items_is_empty() {
        let blank: ZoneEnvelope =
            serde_json::from_str(r#"{"resultCode": "00", "totalCount": 0, "items": ""}"#).unwrap();
        assert!(blank.wrappers().is_empty());
        assert!(!blank.is_error());
    }

    #[test]
    fn non_blank_string_items_is_rejected() {
        let result = serde_json::from_str::<ZoneEnvelope>(r#"{"items": "oops"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn reads_total_count_from_string_or_number() {
        let s: ZoneEnvelope = serde_json::from_str(r#"{"totalCount": "812"}"#).unwrap();
        assert_eq!(s.total_count(), Some(812));

        let n: ZoneEnvelope = serde_json::from_str(r#"{"totalCount": 17}"#).unwrap();
        assert_eq!(n.total_count(), Some(17));
    }

    #[test]
    fn detects_error_result_code() {
        let ok: ZoneEnvelope = serde_json::from_str(r#"{"resultCode": "00"}"#).unwrap();
        assert!(!ok.is_error());

        let err: ZoneEnvelope =
            serde_json::from_str(r#"{"resultCode": "30", "resultMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"}"#)
                .unwrap();
        assert!(err.is_error());

        assert!(!ZoneEnvelope::default().is_error());
    }
}
