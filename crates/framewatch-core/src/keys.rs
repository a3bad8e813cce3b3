//! Object key conventions
//!
//! Frames are uploaded as `image_YYYY-MM-DD_HH:MM:SS.jpg`; detection JSON
//! sidecars reuse the frame key with a `.out` suffix. The timestamp embedded
//! in the key is the canonical partition key for statistics rows.

use chrono::NaiveDateTime;

use crate::error::{PipelineError, Result};

/// Marker preceding the embedded timestamp in frame keys.
const TIMESTAMP_MARKER: &str = "image_";

/// Format of the embedded timestamp, 19 characters long.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

const TIMESTAMP_LEN: usize = 19;

/// Filename stem: the basename portion before the first `.`.
///
/// `unprocessed/image_2024-01-02_03:04:05.jpg.out` and the matching `.jpg`
/// both map to the stem `image_2024-01-02_03:04:05`, which is how sidecars
/// are correlated with their source frames.
pub fn stem(key: &str) -> &str {
    let basename = key.rsplit('/').next().unwrap_or(key);
    basename.split('.').next().unwrap_or(basename)
}

/// Derive the canonical timestamp key from an object identifier.
///
/// Searches for `image_<YYYY-MM-DD_HH:MM:SS>` anywhere in the identifier and
/// normalizes it to the ISO-8601-with-underscore form used as the statistics
/// partition key. Fails with `MalformedFilename` when no occurrence parses.
pub fn timestamp_key(name: &str) -> Result<String> {
    for (idx, _) in name.match_indices(TIMESTAMP_MARKER) {
        let start = idx + TIMESTAMP_MARKER.len();
        let Some(candidate) = name.get(start..start + TIMESTAMP_LEN) else {
            continue;
        };
        if let Ok(dt) = NaiveDateTime::parse_from_str(candidate, TIMESTAMP_FORMAT) {
            return Ok(dt.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    Err(PipelineError::malformed_filename(name))
}

/// Canonical upload key for a frame captured at `ts`.
pub fn frame_key(ts: NaiveDateTime) -> String {
    format!("{}{}.jpg", TIMESTAMP_MARKER, ts.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stem_strips_prefix_and_extensions() {
        assert_eq!(
            stem("unprocessed/image_2024-01-02_03:04:05.jpg.out"),
            "image_2024-01-02_03:04:05"
        );
        assert_eq!(
            stem("image_2024-01-02_03:04:05.jpg"),
            "image_2024-01-02_03:04:05"
        );
        assert_eq!(stem("no_extension"), "no_extension");
    }

    #[test]
    fn timestamp_key_extracts_embedded_datetime() {
        let key = timestamp_key("image_2024-01-02_03:04:05").unwrap();
        assert_eq!(key, "2024-01-02_03:04:05");
    }

    #[test]
    fn timestamp_key_ignores_surrounding_text() {
        let key = timestamp_key("some/prefix/image_2023-12-31_23:59:59.jpg").unwrap();
        assert_eq!(key, "2023-12-31_23:59:59");
    }

    #[test]
    fn timestamp_key_rejects_missing_pattern() {
        let err = timestamp_key("snapshot_2024-01-02.jpg").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedFilename { .. }));
    }

    #[test]
    fn timestamp_key_rejects_invalid_datetime() {
        let err = timestamp_key("image_2024-13-99_99:99:99.jpg").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedFilename { .. }));
    }

    #[test]
    fn timestamp_key_skips_false_marker_matches() {
        // First marker occurrence is not followed by a timestamp
        let key = timestamp_key("image_archive/image_2024-01-02_03:04:05.jpg").unwrap();
        assert_eq!(key, "2024-01-02_03:04:05");
    }

    #[test]
    fn frame_key_round_trips_through_timestamp_key() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let key = frame_key(ts);
        assert_eq!(key, "image_2024-01-02_03:04:05.jpg");
        assert_eq!(timestamp_key(&key).unwrap(), "2024-01-02_03:04:05");
    }
}
