//! CVSS version 2 base metrics.
//!
//! <https://www.first.org/cvss/v2/guide>

use crate::codec::{collapse, Decoded, Encoded};
use crate::error::MetricIssue;
use crate::metric::{self, enumerant, Metric};
use crate::score::Score;
use crate::vector;
use serde::{Deserialize, Serialize};

const AV: &str = "AV";
const AC: &str = "AC";
const AU: &str = "Au";
const C: &str = "C";
const I: &str = "I";
const A: &str = "A";

enumerant! {
    AccessVector {
        Local => ("LOCAL", 'L', 0.395),
        AdjacentNetwork => ("ADJACENT_NETWORK", 'A', 0.646),
        Network => ("NETWORK", 'N', 1.0),
    }
}

enumerant! {
    AccessComplexity {
        Low => ("LOW", 'L', 0.71),
        Medium => ("MEDIUM", 'M', 0.61),
        High => ("HIGH", 'H', 0.35),
    }
}

enumerant! {
    Authentication {
        None => ("NONE", 'N', 0.704),
        MultipleInstances => ("MULTIPLE_INSTANCES", 'M', 0.45),
        SingleInstance => ("SINGLE_INSTANCE", 'S', 0.56),
    }
}

enumerant! {
    /// Confidentiality, integrity and availability impact.
    Impact {
        None => ("NONE", 'N', 0.0),
        Partial => ("PARTIAL", 'P', 0.275),
        Complete => ("COMPLETE", 'C', 0.66),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cvss2Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_vector: Option<Metric<AccessVector>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_complexity: Option<Metric<AccessComplexity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Metric<Authentication>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_impact: Option<Metric<Impact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity_impact: Option<Metric<Impact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_impact: Option<Metric<Impact>>,
}

impl Cvss2Metrics {
    pub fn new(
        access_vector: AccessVector,
        access_complexity: AccessComplexity,
        authentication: Authentication,
        confidentiality_impact: Impact,
        integrity_impact: Impact,
        availability_impact: Impact,
    ) -> Self {
        Self {
            access_vector: Some(access_vector.into()),
            access_complexity: Some(access_complexity.into()),
            authentication: Some(authentication.into()),
            confidentiality_impact: Some(confidentiality_impact.into()),
            integrity_impact: Some(integrity_impact.into()),
            availability_impact: Some(availability_impact.into()),
        }
    }

    /// No metric was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.access_vector.is_none()
            && self.access_complexity.is_none()
            && self.authentication.is_none()
            && self.confidentiality_impact.is_none()
            && self.integrity_impact.is_none()
            && self.availability_impact.is_none()
    }

    /// The vector segments, in canonical order.
    pub fn segments(&self) -> [(&'static str, Option<char>); 6] {
        [
            (AV, self.access_vector.as_ref().and_then(Metric::letter)),
            (AC, self.access_complexity.as_ref().and_then(Metric::letter)),
            (AU, self.authentication.as_ref().and_then(Metric::letter)),
            (C, self.confidentiality_impact.as_ref().and_then(Metric::letter)),
            (I, self.integrity_impact.as_ref().and_then(Metric::letter)),
            (A, self.availability_impact.as_ref().and_then(Metric::letter)),
        ]
    }

    /// Render as a vector string, e.g. `AV:N/AC:L/Au:N/C:C/I:C/A:C`.
    pub fn vector(&self) -> String {
        vector::join(None, &self.segments())
    }

    /// Every metric which is missing or unrecognized.
    pub fn issues(&self) -> Vec<MetricIssue> {
        [
            metric::resolve(AV, self.access_vector.as_ref()).err(),
            metric::resolve(AC, self.access_complexity.as_ref()).err(),
            metric::resolve(AU, self.authentication.as_ref()).err(),
            metric::resolve(C, self.confidentiality_impact.as_ref()).err(),
            metric::resolve(I, self.integrity_impact.as_ref()).err(),
            metric::resolve(A, self.availability_impact.as_ref()).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Calculate the Base Score.
    ///
    /// ```text
    /// BaseScore = round_to_1_decimal(((0.6*Impact)+(0.4*Exploitability)-1.5)*f(Impact))
    /// f(Impact) = 0 if Impact=0, 1.176 otherwise
    /// ```
    pub fn base_score(&self) -> Result<Score, Vec<MetricIssue>> {
        self.score().ok_or_else(|| self.issues())
    }

    /// `Exploitability = 20 * AccessVector * AccessComplexity * Authentication`
    pub fn exploitability(&self) -> Option<Score> {
        let av = metric::weight(&self.access_vector)?;
        let ac = metric::weight(&self.access_complexity)?;
        let au = metric::weight(&self.authentication)?;

        Some((20.0 * ac * av * au).into())
    }

    /// `Impact = 10.41 * (1 - (1 - ConfImpact) * (1 - IntegImpact) * (1 - AvailImpact))`
    pub fn impact(&self) -> Option<Score> {
        let c = metric::weight(&self.confidentiality_impact)?;
        let i = metric::weight(&self.integrity_impact)?;
        let a = metric::weight(&self.availability_impact)?;

        Some((10.41 * (1.0 - (1.0 - c) * (1.0 - i) * (1.0 - a))).into())
    }

    fn score(&self) -> Option<Score> {
        let impact = self.impact()?.value();
        let exploitability = self.exploitability()?.value();

        // f(Impact) is zero, which would otherwise leave us with -0.0
        if impact == 0.0 {
            return Some(Score::ZERO);
        }

        Some(Score::new(((0.6 * impact) + (0.4 * exploitability) - 1.5) * 1.176).round1())
    }
}

/// Encode metrics into a CVSS v2 vector string and its base score.
///
/// Returns `None` if no metric was supplied at all. Unrecognized metrics are
/// encoded as `ERROR` and leave the score absent.
pub fn encode_v2(metrics: &Cvss2Metrics) -> Option<Encoded> {
    if metrics.is_empty() {
        return None;
    }

    Some(Encoded {
        vector: metrics.vector(),
        score: collapse(metrics.base_score()),
    })
}

/// Decode a CVSS v2 vector string, along with its base score.
///
/// Metric codes and values are matched ignoring case, unknown metrics are skipped.
pub fn decode_v2(vector: Option<&str>) -> Decoded<Cvss2Metrics> {
    let Some(vector) = vector.filter(|vector| !vector.trim().is_empty()) else {
        return Decoded::default();
    };

    let mut metrics = Cvss2Metrics::default();

    for (key, value) in vector::pairs(vector) {
        let value = value.unwrap_or_default();
        match key.as_str() {
            "av" => metrics.access_vector = metric::decode(AV, &value),
            "ac" => metrics.access_complexity = metric::decode(AC, &value),
            "au" => metrics.authentication = metric::decode(AU, &value),
            "c" => metrics.confidentiality_impact = metric::decode(C, &value),
            "i" => metrics.integrity_impact = metric::decode(I, &value),
            "a" => metrics.availability_impact = metric::decode(A, &value),
            _ => log::trace!("ignoring metric '{key}'"),
        }
    }

    let score = collapse(metrics.base_score());
    Decoded { metrics, score }
}

#[cfg(test)]
mod test {
    use super::*;

    fn score(vector: &str) -> Option<f64> {
        decode_v2(Some(vector)).score.map(Score::value)
    }

    #[test_log::test(rstest::rstest)]
    #[case("AV:N/AC:L/Au:N/C:C/I:C/A:C", 10.0)]
    #[case("AV:L/AC:H/Au:M/C:N/I:N/A:N", 0.0)]
    #[case("AV:N/AC:L/Au:N/C:P/I:P/A:P", 7.5)]
    #[case("AV:N/AC:M/Au:N/C:N/I:P/A:N", 4.3)]
    #[case("AV:L/AC:L/Au:N/C:C/I:C/A:C", 7.2)]
    #[case("AV:N/AC:L/Au:S/C:P/I:N/A:N", 4.0)]
    #[case("AV:N/AC:L/Au:N/C:N/I:N/A:P", 5.0)]
    #[case("AV:A/AC:L/Au:N/C:C/I:C/A:C", 8.3)]
    fn verify_scores(#[case] vector: &str, #[case] expected: f64) {
        assert_eq!(score(vector), Some(expected));
    }

    #[test_log::test]
    fn decode_fields() {
        let decoded = decode_v2(Some("AV:A/AC:M/Au:S/C:N/I:P/A:C"));
        assert_eq!(
            decoded.metrics,
            Cvss2Metrics::new(
                AccessVector::AdjacentNetwork,
                AccessComplexity::Medium,
                Authentication::SingleInstance,
                Impact::None,
                Impact::Partial,
                Impact::Complete,
            )
        );
    }

    #[test_log::test]
    fn decode_ignores_case() {
        let lower = decode_v2(Some("av:l/ac:l/au:n/c:n/i:n/a:n"));
        let upper = decode_v2(Some("AV:L/AC:L/Au:N/C:N/I:N/A:N"));
        let mixed = decode_v2(Some("Av:L/aC:l/AU:N/C:n/i:N/A:n"));

        assert_eq!(lower, upper);
        assert_eq!(mixed, upper);
        assert_eq!(
            upper.metrics.access_vector,
            Some(Metric::Known(AccessVector::Local))
        );
    }

    #[test_log::test]
    fn decode_unrecognized_value() {
        let decoded = decode_v2(Some("AV:Q/AC:L/Au:N/C:N/I:N/A:N"));

        assert_eq!(decoded.metrics.access_vector, None);
        assert_eq!(
            decoded.metrics.access_complexity,
            Some(Metric::Known(AccessComplexity::Low))
        );
        assert_eq!(decoded.score, None);
    }

    #[test_log::test]
    fn decode_skips_unknown_metrics() {
        let decoded = decode_v2(Some("AV:N/E:F/AC:L/Au:N/RL:OF/C:C/I:C/A:C/RC:C"));
        assert_eq!(decoded.score.map(Score::value), Some(10.0));
    }

    #[test_log::test]
    fn decode_blank() {
        assert_eq!(decode_v2(None), Decoded::default());
        assert_eq!(decode_v2(Some("")), Decoded::default());
        assert_eq!(decode_v2(Some("  \t")), Decoded::default());
    }

    #[test_log::test]
    fn decode_partial() {
        let decoded = decode_v2(Some("AV:N/AC:L"));

        assert_eq!(
            decoded.metrics.access_vector,
            Some(Metric::Known(AccessVector::Network))
        );
        assert_eq!(decoded.metrics.authentication, None);
        assert_eq!(decoded.score, None);
    }

    #[test_log::test]
    fn encode_all() {
        let metrics = Cvss2Metrics::new(
            AccessVector::Network,
            AccessComplexity::Low,
            Authentication::None,
            Impact::Complete,
            Impact::Complete,
            Impact::Complete,
        );

        let encoded = encode_v2(&metrics).expect("must encode");
        assert_eq!(encoded.vector, "AV:N/AC:L/Au:N/C:C/I:C/A:C");
        assert_eq!(encoded.score, Some(Score::new(10.0)));
    }

    #[test_log::test]
    fn encode_nothing() {
        assert_eq!(encode_v2(&Cvss2Metrics::default()), None);
    }

    #[test_log::test]
    fn encode_unrecognized() {
        let metrics = Cvss2Metrics {
            access_vector: Some("network".into()),
            authentication: Some(Authentication::MultipleInstances.into()),
            ..Default::default()
        };

        let encoded = encode_v2(&metrics).expect("must encode");
        assert_eq!(
            encoded.vector,
            "AV:ERROR/AC:ERROR/Au:M/C:ERROR/I:ERROR/A:ERROR"
        );
        assert_eq!(encoded.score, None);

        let issues = metrics.issues();
        assert_eq!(issues.len(), 5);
        assert_eq!(
            issues[0],
            MetricIssue::Unrecognized {
                metric: "AV",
                value: "network".into()
            }
        );
        assert_eq!(issues[1], MetricIssue::Missing { metric: "AC" });
    }

    #[test_log::test]
    fn segments_per_field() {
        let metrics = Cvss2Metrics {
            integrity_impact: Some(Impact::Partial.into()),
            ..Default::default()
        };

        assert_eq!(
            metrics.segments(),
            [
                ("AV", None),
                ("AC", None),
                ("Au", None),
                ("C", None),
                ("I", Some('P')),
                ("A", None),
            ]
        );
    }

    #[test_log::test]
    fn sub_scores() {
        let metrics = decode_v2(Some("AV:N/AC:L/Au:N/C:N/I:N/A:N")).metrics;

        assert_eq!(metrics.impact(), Some(Score::ZERO));
        let exploitability = metrics.exploitability().expect("must score").value();
        assert!((exploitability - 9.9968).abs() < 1e-9);
        assert_eq!(metrics.base_score(), Ok(Score::ZERO));
    }
}
