//! Grouping prefix listings into per-image records

use std::collections::BTreeMap;

use framewatch_core::keys::stem;

/// Transient pairing of one frame's artifacts, correlated by filename stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRecord {
    pub unique_id: String,
    pub json_key: Option<String>,
    pub jpeg_key: Option<String>,
}

/// Group object keys by filename stem.
///
/// `.out` keys are detection sidecars, `.jpg` keys are frames; anything else
/// is ignored. Records come out ordered by stem, which keeps reconciliation
/// passes deterministic even though processing order is contractually
/// unspecified.
pub fn group_by_stem<I, S>(keys: I) -> Vec<ImageRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records: BTreeMap<String, ImageRecord> = BTreeMap::new();

    for key in keys {
        let key = key.as_ref();
        let unique_id = stem(key);

        let slot = if key.ends_with(".out") {
            Slot::Json
        } else if key.ends_with(".jpg") {
            Slot::Jpeg
        } else {
            continue;
        };

        let record = records
            .entry(unique_id.to_string())
            .or_insert_with(|| ImageRecord {
                unique_id: unique_id.to_string(),
                ..Default::default()
            });

        match slot {
            Slot::Json => record.json_key = Some(key.to_string()),
            Slot::Jpeg => record.jpeg_key = Some(key.to_string()),
        }
    }

    records.into_values().collect()
}

enum Slot {
    Json,
    Jpeg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_sidecar_with_frame_by_stem() {
        let records = group_by_stem([
            "unprocessed/image_2024-01-02_03:04:05.jpg",
            "unprocessed/image_2024-01-02_03:04:05.jpg.out",
        ]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.unique_id, "image_2024-01-02_03:04:05");
        assert_eq!(
            record.jpeg_key.as_deref(),
            Some("unprocessed/image_2024-01-02_03:04:05.jpg")
        );
        assert_eq!(
            record.json_key.as_deref(),
            Some("unprocessed/image_2024-01-02_03:04:05.jpg.out")
        );
    }

    #[test]
    fn unpaired_artifacts_produce_partial_records() {
        let records = group_by_stem([
            "unprocessed/image_2024-01-02_03:04:05.jpg",
            "unprocessed/image_2024-01-02_03:04:06.jpg.out",
        ]);

        assert_eq!(records.len(), 2);
        assert!(records[0].json_key.is_none());
        assert!(records[0].jpeg_key.is_some());
        assert!(records[1].json_key.is_some());
        assert!(records[1].jpeg_key.is_none());
    }

    #[test]
    fn ignores_unrelated_extensions() {
        let records = group_by_stem(["unprocessed/manifest.txt", "unprocessed/notes.csv"]);
        assert!(records.is_empty());
    }
}
