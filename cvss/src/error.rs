use std::fmt::{Display, Formatter};

/// A problem with a single metric of a vector or metrics record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MetricIssue {
    #[error("metric {metric} is missing")]
    Missing { metric: &'static str },
    #[error("metric {metric} has unrecognized value '{value}'")]
    Unrecognized { metric: &'static str, value: String },
}

impl MetricIssue {
    /// The vector code of the affected metric, e.g. `AV`.
    pub fn metric(&self) -> &'static str {
        match self {
            Self::Missing { metric } | Self::Unrecognized { metric, .. } => *metric,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CvssError {
    #[error("empty vector")]
    Empty,
    #[error("unsupported CVSS version: {0}")]
    MajorVersion(String),
    #[error("incomplete vector: {}", Issues(.0))]
    Incomplete(Vec<MetricIssue>),
    #[error("invalid severity: {name}")]
    InvalidSeverity { name: String },
}

struct Issues<'a>(&'a [MetricIssue]);

impl Display for Issues<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (n, issue) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn incomplete_lists_all_issues() {
        let err = CvssError::Incomplete(vec![
            MetricIssue::Missing { metric: "AV" },
            MetricIssue::Unrecognized {
                metric: "Au",
                value: "x".into(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "incomplete vector: metric AV is missing, metric Au has unrecognized value 'x'"
        );
    }
}
