//! Detection sidecar schema and per-category aggregation

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Detection categories persisted to the statistics store. Everything else
/// is dropped, not folded into an "other" bucket.
pub const ALLOWED_CATEGORIES: [&str; 6] = ["person", "bicycle", "car", "motorcycle", "bus", "truck"];

pub fn is_allowed_category(name: &str) -> bool {
    ALLOWED_CATEGORIES.contains(&name)
}

/// One record of the detection JSON sidecar.
///
/// `bbox` is `[x, y, w, h]` in pixel coordinates, origin top-left. The
/// aggregation only consumes `category_name`, `area` and `score`, but the
/// full schema is validated so a malformed sidecar fails with a typed error
/// instead of surfacing mid-aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub category_name: String,
    pub category_id: i64,
    #[serde(default)]
    pub bbox: [f64; 4],
    pub area: f64,
    pub score: f64,
}

/// Per-category aggregate over one image's detections.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category_name: String,
    pub count: u64,
    pub mean_area: f64,
    pub mean_score: f64,
}

/// Parse a detection sidecar body.
pub fn parse_detections(bytes: &[u8]) -> Result<Vec<Detection>> {
    serde_json::from_slice(bytes).map_err(|e| PipelineError::parse("detection sidecar", e))
}

/// Group detections by category and compute count, mean area and mean score.
///
/// Categories outside the allow-list are dropped here. Groups are emitted in
/// first-seen order so the output is stable for a given sidecar.
pub fn aggregate_by_category(detections: &[Detection]) -> Vec<CategoryStats> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: Vec<(u64, f64, f64)> = Vec::new();

    for det in detections {
        let idx = match order.iter().position(|name| *name == det.category_name) {
            Some(idx) => idx,
            None => {
                order.push(det.category_name.as_str());
                sums.push((0, 0.0, 0.0));
                order.len() - 1
            }
        };
        let entry = &mut sums[idx];
        entry.0 += 1;
        entry.1 += det.area;
        entry.2 += det.score;
    }

    order
        .into_iter()
        .zip(sums)
        .filter(|(name, _)| is_allowed_category(name))
        .map(|(name, (count, area_sum, score_sum))| CategoryStats {
            category_name: name.to_string(),
            count,
            mean_area: area_sum / count as f64,
            mean_score: score_sum / count as f64,
        })
        .collect()
}
