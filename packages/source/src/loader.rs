//! One uncached load: fetch, check, clean.

use freezing_zones_zone_models::raw::ZoneEnvelope;

use crate::cleaning::clean_envelope;
use crate::{SourceError, ZoneQuery, ZoneSet, ZoneSource};

/// Fetches `query` from `source` and cleans the result.
///
/// An envelope with zero usable items yields an empty [`ZoneSet`], not an
/// error.
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails or the portal reports a
/// non-success result code.
pub async fn load(source: &dyn ZoneSource, query: &ZoneQuery) -> Result<ZoneSet, SourceError> {
    let envelope = source.fetch(query).await?;
    build_zone_set(source.id(), query, &envelope)
}

/// Converts a fetched envelope into a [`ZoneSet`] for `query`.
///
/// # Errors
///
/// Returns [`SourceError::Api`] if the envelope carries a non-success
/// result code.
pub fn build_zone_set(
    source_id: &str,
    query: &ZoneQuery,
    envelope: &ZoneEnvelope,
) -> Result<ZoneSet, SourceError> {
    if envelope.is_error() {
        return Err(SourceError::Api {
            code: envelope.result_code.clone().unwrap_or_default(),
            message: envelope.result_msg.clone().unwrap_or_default(),
        });
    }

    let cleaned = clean_envelope(envelope);
    let received = envelope.wrappers().len() as u64;
    let total_count = envelope.total_count();
    let truncated = total_count.is_some_and(|total| total > received);

    if truncated {
        log::warn!(
            "[{source_id}] year={} returned {received} of {} rows; the rest were cut off by the \
             upstream page limit",
            query.year,
            total_count.unwrap_or_default(),
        );
    }

    if cleaned.dropped > 0 || cleaned.skipped_wrappers > 0 {
        log::debug!(
            "[{source_id}] Dropped {} unusable item(s), skipped {} empty wrapper(s)",
            cleaned.dropped,
            cleaned.skipped_wrappers,
        );
    }

    log::info!(
        "[{source_id}] Loaded {} zone(s) for year={}",
        cleaned.zones.len(),
        query.year
    );

    Ok(ZoneSet {
        query: query.clone(),
        zones: cleaned.zones,
        total_count,
        truncated,
        dropped: cleaned.dropped,
    })
}
