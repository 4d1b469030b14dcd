use crate::error::MetricIssue;
use crate::score::Score;
use serde::{Deserialize, Serialize};

/// The outcome of encoding a metrics record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Encoded {
    /// The vector string, with `ERROR` in place of every unusable metric.
    pub vector: String,
    /// The base score, absent if any metric needed for it is unusable.
    pub score: Option<Score>,
}

/// The outcome of decoding a vector string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Decoded<M> {
    #[serde(flatten)]
    pub metrics: M,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

/// Collapse an explicit scoring result into the optional score handed to callers.
pub(crate) fn collapse(result: Result<Score, Vec<MetricIssue>>) -> Option<Score> {
    match result {
        Ok(score) => Some(score),
        Err(issues) => {
            for issue in &issues {
                log::debug!("unable to score: {issue}");
            }
            None
        }
    }
}
