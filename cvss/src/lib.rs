//! CVSS v2 and v3.1 vector strings and base scores.

use crate::cvss2::Cvss2Metrics;
use crate::cvss3::Cvss3Metrics;
use crate::score::Score;
use crate::severity::Severity;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod codec;
pub mod cvss2;
pub mod cvss3;
pub mod error;
pub mod metric;
pub mod score;
pub mod severity;
pub mod vector;

pub use codec::{Decoded, Encoded};
pub use cvss2::{decode_v2, encode_v2};
pub use cvss3::{decode_v3, encode_v3};
pub use error::{CvssError, MetricIssue};
pub use metric::{Enumerant, Metric};

/// A complete CVSS base vector, of either version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cvss {
    V2(Cvss2Metrics),
    V3(Cvss3Metrics),
}

impl Cvss {
    /// The major version, `2` or `3`.
    pub fn version(&self) -> u8 {
        match self {
            Self::V2(_) => 2,
            Self::V3(_) => 3,
        }
    }

    pub fn score(&self) -> Result<Score, Vec<MetricIssue>> {
        match self {
            Self::V2(metrics) => metrics.base_score(),
            Self::V3(metrics) => metrics.base_score(),
        }
    }

    /// Rate the base score on the scale of this vector's version.
    pub fn severity(&self) -> Result<Severity, Vec<MetricIssue>> {
        match self {
            Self::V2(metrics) => metrics.base_score().map(Severity::cvss2),
            Self::V3(metrics) => metrics.base_score().map(Severity::cvss3),
        }
    }
}

impl Display for Cvss {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V2(metrics) => f.write_str(&metrics.vector()),
            Self::V3(metrics) => f.write_str(&metrics.vector()),
        }
    }
}

impl FromStr for Cvss {
    type Err = CvssError;

    /// Parse a vector, requiring every base metric to be present and recognized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CvssError::Empty);
        }

        // the version tag is matched ignoring case, like the metrics
        let tag = s.split('/').next().unwrap_or_default().to_ascii_uppercase();

        let (cvss, issues) = if tag.starts_with("CVSS:3") {
            let metrics = decode_v3(Some(s)).metrics;
            let issues = metrics.issues();
            (Cvss::V3(metrics), issues)
        } else if let Some(version) = tag.strip_prefix("CVSS:") {
            return Err(CvssError::MajorVersion(version.to_string()));
        } else {
            let metrics = decode_v2(Some(s)).metrics;
            let issues = metrics.issues();
            (Cvss::V2(metrics), issues)
        };

        if issues.is_empty() {
            Ok(cvss)
        } else {
            Err(CvssError::Incomplete(with_values(s, issues)))
        }
    }
}

/// The decoders drop values they can't match. Put the last value seen for
/// such a metric back, so it's reported as unrecognized instead of missing.
fn with_values(vector: &str, issues: Vec<MetricIssue>) -> Vec<MetricIssue> {
    let seen = vector::pairs(vector).collect::<Vec<_>>();

    issues
        .into_iter()
        .map(|issue| match issue {
            MetricIssue::Missing { metric } => seen
                .iter()
                .rev()
                .find(|(key, _)| key.eq_ignore_ascii_case(metric))
                .map_or(MetricIssue::Missing { metric }, |(_, value)| {
                    MetricIssue::Unrecognized {
                        metric,
                        value: value.clone().unwrap_or_default(),
                    }
                }),
            issue => issue,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn parse_v2() {
        let cvss = Cvss::from_str("av:n/ac:l/au:n/c:c/i:c/a:c").expect("must parse");

        assert_eq!(cvss.version(), 2);
        assert_eq!(cvss.to_string(), "AV:N/AC:L/Au:N/C:C/I:C/A:C");
        assert_eq!(cvss.score(), Ok(Score::new(10.0)));
        assert_eq!(cvss.severity(), Ok(Severity::High));
    }

    #[test_log::test]
    fn parse_v3() {
        let cvss =
            Cvss::from_str("CVSS:3.0/AV:L/AC:L/PR:L/UI:N/S:U/C:L/I:N/A:N").expect("must parse");

        assert_eq!(cvss.version(), 3);
        assert_eq!(
            cvss.to_string(),
            "CVSS:3.1/AV:L/AC:L/PR:L/UI:N/S:U/C:L/I:N/A:N"
        );
        assert_eq!(cvss.severity(), Ok(Severity::Low));
    }

    #[test_log::test]
    fn parse_errors() {
        assert_eq!(Cvss::from_str(" "), Err(CvssError::Empty));
        assert_eq!(
            Cvss::from_str("CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N"),
            Err(CvssError::MajorVersion("4.0".into()))
        );
        assert_eq!(
            Cvss::from_str("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H"),
            Err(CvssError::Incomplete(vec![MetricIssue::Missing {
                metric: "A"
            }]))
        );
    }

    #[test_log::test]
    fn parse_reports_unrecognized_values() {
        assert_eq!(
            Cvss::from_str("CVSS:3.1/AV:N/AC:L/PR:N/UI:Z/S:U/C:H/I:H/A:H"),
            Err(CvssError::Incomplete(vec![MetricIssue::Unrecognized {
                metric: "UI",
                value: "Z".into()
            }]))
        );
        assert_eq!(
            Cvss::from_str("AV:N/AC:L/au:x/AU:Q/C:P/I/A:P"),
            Err(CvssError::Incomplete(vec![
                MetricIssue::Unrecognized {
                    metric: "Au",
                    value: "Q".into()
                },
                MetricIssue::Unrecognized {
                    metric: "I",
                    value: "".into()
                },
            ]))
        );
    }

    #[test_log::test]
    fn severity_per_version() {
        let v2 = Cvss::from_str("AV:N/AC:L/Au:N/C:N/I:N/A:N").expect("must parse");
        assert_eq!(v2.severity(), Ok(Severity::Low));

        let v3 = Cvss::from_str("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:N/I:N/A:N")
            .expect("must parse");
        assert_eq!(v3.severity(), Ok(Severity::None));

        let v3 = Cvss::from_str("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H")
            .expect("must parse");
        assert_eq!(v3.severity(), Ok(Severity::Critical));
    }
}
