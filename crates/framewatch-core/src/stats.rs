//! Statistics rows and the exact-decimal storage representation

use serde::{Deserialize, Serialize};

use crate::detection::CategoryStats;

/// Synthetic category for image-level statistics.
pub const WHOLE_IMAGE_CATEGORY: &str = "whole_image";

/// Exact-decimal value produced by round-tripping an f64 through its
/// shortest display form.
///
/// The statistics store speaks decimal strings, not binary floats; sending
/// the display form verbatim is a contract of the storage adapters, so the
/// value is captured as a string at construction time rather than at
/// serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decimal(String);

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Decimal(value.to_string())
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the statistics table, keyed by (timestamp, category).
///
/// Detection rows carry count/mean_area/mean_score; the `whole_image` row
/// carries mean_brightness only. Absent attributes are omitted from the
/// serialized form, matching the store's sparse row schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    /// Partition key: canonical timestamp of the source frame.
    pub id: String,
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_area: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_brightness: Option<Decimal>,
}

impl StatRow {
    /// Row for one allow-listed detection category of one frame.
    pub fn detection(timestamp: &str, stats: &CategoryStats) -> Self {
        Self {
            id: timestamp.to_string(),
            category_name: stats.category_name.clone(),
            count: Some(stats.count),
            mean_area: Some(Decimal::from(stats.mean_area)),
            mean_score: Some(Decimal::from(stats.mean_score)),
            mean_brightness: None,
        }
    }

    /// Image-level row for one frame.
    pub fn whole_image(timestamp: &str, brightness: f64) -> Self {
        Self {
            id: timestamp.to_string(),
            category_name: WHOLE_IMAGE_CATEGORY.to_string(),
            count: None,
            mean_area: None,
            mean_score: None,
            mean_brightness: Some(Decimal::from(brightness)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_keeps_shortest_round_trip_form() {
        assert_eq!(Decimal::from(150.0).as_str(), "150");
        assert_eq!(Decimal::from(0.85).as_str(), "0.85");
        assert_eq!(Decimal::from(127.5).as_str(), "127.5");
    }

    #[test]
    fn decimal_survives_non_terminating_binary_fractions() {
        // 0.1 + 0.2 in binary is not 0.3; the display form still parses back
        // to the identical f64
        let value = 0.1_f64 + 0.2_f64;
        let decimal = Decimal::from(value);
        assert_eq!(decimal.as_str().parse::<f64>().unwrap(), value);
    }

    #[test]
    fn detection_row_has_no_brightness() {
        let row = StatRow::detection(
            "2024-01-02_03:04:05",
            &CategoryStats {
                category_name: "car".to_string(),
                count: 2,
                mean_area: 150.0,
                mean_score: 0.85,
            },
        );

        assert_eq!(row.id, "2024-01-02_03:04:05");
        assert_eq!(row.category_name, "car");
        assert_eq!(row.count, Some(2));
        assert_eq!(row.mean_area.as_ref().unwrap().as_str(), "150");
        assert_eq!(row.mean_score.as_ref().unwrap().as_str(), "0.85");
        assert!(row.mean_brightness.is_none());
    }

    #[test]
    fn whole_image_row_has_only_brightness() {
        let row = StatRow::whole_image("2024-01-02_03:04:05", 127.5);

        assert_eq!(row.category_name, WHOLE_IMAGE_CATEGORY);
        assert!(row.count.is_none());
        assert!(row.mean_area.is_none());
        assert!(row.mean_score.is_none());
        assert_eq!(row.mean_brightness.as_ref().unwrap().as_str(), "127.5");
    }

    #[test]
    fn serialized_row_omits_absent_attributes() {
        let row = StatRow::whole_image("2024-01-02_03:04:05", 100.0);
        let json = serde_json::to_string(&row).unwrap();

        assert!(json.contains("mean_brightness"));
        assert!(!json.contains("mean_area"));
        assert!(!json.contains("count"));
    }
}
