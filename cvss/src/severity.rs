use crate::error::CvssError;
use crate::score::Score;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use utoipa::ToSchema;

/// The rating shown next to a base score.
///
/// Each CVSS version has its own scale, see [`Severity::cvss2`] and
/// [`Severity::cvss3`]. Not every rating exists on every scale.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// A rating scale as `(lowest score, rating)`, highest band first.
type Bands = &'static [(f64, Severity)];

/// NVD scale for CVSS v2 base scores.
const CVSS2_BANDS: Bands = &[
    (7.0, Severity::High),
    (4.0, Severity::Medium),
    (0.0, Severity::Low),
];

/// Qualitative Severity Rating Scale, CVSS v3.1 section 5.
///
/// <https://www.first.org/cvss/v3.1/specification-document#Qualitative-Severity-Rating-Scale>
const CVSS3_BANDS: Bands = &[
    (9.0, Severity::Critical),
    (7.0, Severity::High),
    (4.0, Severity::Medium),
    (0.1, Severity::Low),
    (0.0, Severity::None),
];

fn rate(bands: Bands, score: Score) -> Severity {
    let value = score.value();
    bands
        .iter()
        .find(|(lowest, _)| value >= *lowest)
        .or(bands.last())
        .map_or(Severity::None, |(_, severity)| *severity)
}

impl Severity {
    /// Rate a CVSS v2 base score: `low`, `medium` or `high`.
    pub fn cvss2(score: Score) -> Self {
        rate(CVSS2_BANDS, score)
    }

    /// Rate a CVSS v3.x base score: `none` up to `critical`.
    pub fn cvss3(score: Score) -> Self {
        rate(CVSS3_BANDS, score)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        })
    }
}

impl FromStr for Severity {
    type Err = CvssError;

    /// Parse a rating, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::None,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::Critical,
        ]
        .into_iter()
        .find(|severity| severity.to_string().eq_ignore_ascii_case(s))
        .ok_or_else(|| CvssError::InvalidSeverity { name: s.to_owned() })
    }
}
