//! Turns raw portal items into [`AccidentZone`]s.
//!
//! Latitude, longitude and occurrence count are required. An item whose
//! value for any of them is missing or unparseable is rejected outright;
//! it is neither repaired nor defaulted. Optional counts degrade to
//! `None`.

use freezing_zones_zone_models::coerce::{FieldValue, coerce_count, coerce_f64};
use freezing_zones_zone_models::raw::{RawZoneItem, ZoneEnvelope};
use freezing_zones_zone_models::{AccidentZone, ZoneField, province_of};

/// Why a raw item was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneRejection {
    /// A required field was absent or blank.
    #[error("missing required field {0}")]
    Missing(ZoneField),
    /// A required field was present but not a usable number.
    #[error("unparseable {field}: {raw}")]
    Invalid {
        /// The offending field.
        field: ZoneField,
        /// The raw value as sent.
        raw: String,
    },
}

/// Output of cleaning a whole envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedZones {
    /// Records that passed cleaning, in upstream order.
    pub zones: Vec<AccidentZone>,
    /// Items rejected by [`clean_item`].
    pub dropped: usize,
    /// Wrappers that had no `item` key.
    pub skipped_wrappers: usize,
}

/// Cleans a single raw item.
///
/// # Errors
///
/// Returns [`ZoneRejection`] if latitude, longitude or occurrence count is
/// missing or non-numeric. Numeric counts are always kept (see
/// [`coerce_count`] for rounding).
pub fn clean_item(raw: &RawZoneItem) -> Result<AccidentZone, ZoneRejection> {
    let latitude = required(ZoneField::LaCrd, coerce_f64(raw.la_crd.as_ref()))?;
    let longitude = required(ZoneField::LoCrd, coerce_f64(raw.lo_crd.as_ref()))?;
    let occurrence_count = required(ZoneField::OccrrncCnt, coerce_count(raw.occrrnc_cnt.as_ref()))?;

    let province_district_name = raw
        .sido_sgg_nm
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let province = province_of(&province_district_name).to_string();

    Ok(AccidentZone {
        province,
        province_district_name,
        spot_name: raw
            .spot_nm
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        latitude,
        longitude,
        occurrence_count,
        casualty_count: coerce_count(raw.caslt_cnt.as_ref()).ok(),
        deaths: coerce_count(raw.dth_dnv_cnt.as_ref()).ok(),
        serious_injuries: coerce_count(raw.se_dnv_cnt.as_ref()).ok(),
        minor_injuries: coerce_count(raw.sl_dnv_cnt.as_ref()).ok(),
        reported_injuries: coerce_count(raw.wnd_dnv_cnt.as_ref()).ok(),
    })
}

/// Cleans every wrapped item of an envelope.
///
/// Wrappers without an `item` key and items rejected by [`clean_item`] are
/// skipped; only their counts are kept.
#[must_use]
pub fn clean_envelope(envelope: &ZoneEnvelope) -> CleanedZones {
    let wrappers = envelope.wrappers();
    let mut zones = Vec::with_capacity(wrappers.len());
    let mut dropped = 0;
    let mut skipped_wrappers = 0;

    for wrapper in wrappers {
        let Some(item) = &wrapper.item else {
            skipped_wrappers += 1;
            continue;
        };
        match clean_item(item) {
            Ok(zone) => zones.push(zone),
            Err(reason) => {
                log::trace!("Dropping item {:?}: {reason}", item.sido_sgg_nm);
                dropped += 1;
            }
        }
    }

    CleanedZones {
        zones,
        dropped,
        skipped_wrappers,
    }
}

fn required<T>(field: ZoneField, value: FieldValue<T>) -> Result<T, ZoneRejection> {
    match value {
        FieldValue::Parsed(v) => Ok(v),
        FieldValue::Missing => Err(ZoneRejection::Missing(field)),
        FieldValue::Invalid(raw) => Err(ZoneRejection::Invalid { field, raw }),
    }
}
