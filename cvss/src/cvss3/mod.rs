//! CVSS version 3.1 base metrics.
//!
//! <https://www.first.org/cvss/v3.1/specification-document>

use crate::codec::{collapse, Decoded, Encoded};
use crate::error::MetricIssue;
use crate::metric::{self, enumerant, Enumerant, Metric};
use crate::score::Score;
use crate::vector;
use serde::{Deserialize, Serialize};

/// The version prefix of every vector we produce.
pub const PREFIX: &str = "CVSS:3.1";

const AV: &str = "AV";
const AC: &str = "AC";
const PR: &str = "PR";
const UI: &str = "UI";
const S: &str = "S";
const C: &str = "C";
const I: &str = "I";
const A: &str = "A";

enumerant! {
    AttackVector {
        Physical => ("PHYSICAL", 'P', 0.2),
        Local => ("LOCAL", 'L', 0.55),
        AdjacentNetwork => ("ADJACENT_NETWORK", 'A', 0.62),
        Network => ("NETWORK", 'N', 0.85),
    }
}

enumerant! {
    AttackComplexity {
        High => ("HIGH", 'H', 0.44),
        Low => ("LOW", 'L', 0.77),
    }
}

enumerant! {
    /// The weight is the one for an unchanged scope, see
    /// [`PrivilegesRequired::scoped_weight`].
    PrivilegesRequired {
        High => ("HIGH", 'H', 0.27),
        Low => ("LOW", 'L', 0.62),
        None => ("NONE", 'N', 0.85),
    }
}

enumerant! {
    UserInteraction {
        Required => ("REQUIRED", 'R', 0.62),
        None => ("NONE", 'N', 0.85),
    }
}

enumerant! {
    Scope {
        Unchanged => ("UNCHANGED", 'U', 6.42),
        Changed => ("CHANGED", 'C', 7.52),
    }
}

enumerant! {
    /// Confidentiality, integrity and availability impact.
    Impact {
        High => ("HIGH", 'H', 0.56),
        Low => ("LOW", 'L', 0.22),
        None => ("NONE", 'N', 0.0),
    }
}

impl PrivilegesRequired {
    pub fn scoped_weight(self, scope_change: bool) -> f64 {
        match self {
            PrivilegesRequired::High if scope_change => 0.50,
            PrivilegesRequired::Low if scope_change => 0.68,
            _ => self.weight(),
        }
    }
}

impl Scope {
    pub fn is_changed(self) -> bool {
        self == Scope::Changed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cvss3Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_vector: Option<Metric<AttackVector>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_complexity: Option<Metric<AttackComplexity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileges_required: Option<Metric<PrivilegesRequired>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_interaction: Option<Metric<UserInteraction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Metric<Scope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality_impact: Option<Metric<Impact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity_impact: Option<Metric<Impact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_impact: Option<Metric<Impact>>,
}

impl Cvss3Metrics {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        attack_vector: AttackVector,
        attack_complexity: AttackComplexity,
        privileges_required: PrivilegesRequired,
        user_interaction: UserInteraction,
        scope: Scope,
        confidentiality_impact: Impact,
        integrity_impact: Impact,
        availability_impact: Impact,
    ) -> Self {
        Self {
            attack_vector: Some(attack_vector.into()),
            attack_complexity: Some(attack_complexity.into()),
            privileges_required: Some(privileges_required.into()),
            user_interaction: Some(user_interaction.into()),
            scope: Some(scope.into()),
            confidentiality_impact: Some(confidentiality_impact.into()),
            integrity_impact: Some(integrity_impact.into()),
            availability_impact: Some(availability_impact.into()),
        }
    }

    /// No metric was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.attack_vector.is_none()
            && self.attack_complexity.is_none()
            && self.privileges_required.is_none()
            && self.user_interaction.is_none()
            && self.scope.is_none()
            && self.confidentiality_impact.is_none()
            && self.integrity_impact.is_none()
            && self.availability_impact.is_none()
    }

    /// The vector segments following the prefix, in canonical order.
    pub fn segments(&self) -> [(&'static str, Option<char>); 8] {
        [
            (AV, self.attack_vector.as_ref().and_then(Metric::letter)),
            (AC, self.attack_complexity.as_ref().and_then(Metric::letter)),
            (PR, self.privileges_required.as_ref().and_then(Metric::letter)),
            (UI, self.user_interaction.as_ref().and_then(Metric::letter)),
            (S, self.scope.as_ref().and_then(Metric::letter)),
            (C, self.confidentiality_impact.as_ref().and_then(Metric::letter)),
            (I, self.integrity_impact.as_ref().and_then(Metric::letter)),
            (A, self.availability_impact.as_ref().and_then(Metric::letter)),
        ]
    }

    /// Render as a vector string, e.g. `CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H`.
    pub fn vector(&self) -> String {
        vector::join(Some(PREFIX), &self.segments())
    }

    /// Every metric which is missing or unrecognized.
    pub fn issues(&self) -> Vec<MetricIssue> {
        [
            metric::resolve(AV, self.attack_vector.as_ref()).err(),
            metric::resolve(AC, self.attack_complexity.as_ref()).err(),
            metric::resolve(PR, self.privileges_required.as_ref()).err(),
            metric::resolve(UI, self.user_interaction.as_ref()).err(),
            metric::resolve(S, self.scope.as_ref()).err(),
            metric::resolve(C, self.confidentiality_impact.as_ref()).err(),
            metric::resolve(I, self.integrity_impact.as_ref()).err(),
            metric::resolve(A, self.availability_impact.as_ref()).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Calculate Base CVSS score: overall value for determining the severity
    /// of a vulnerability, generally referred to as the "CVSS score".
    ///
    /// Described in CVSS v3.1 Specification: Section 2:
    /// <https://www.first.org/cvss/specification-document#t6>
    ///
    /// > When the Base metrics are assigned values by an analyst, the Base
    /// > equation computes a score ranging from 0.0 to 10.0.
    ///
    /// A record without any impact scores `0.0`, even if its exploitability
    /// metrics are incomplete.
    pub fn base_score(&self) -> Result<Score, Vec<MetricIssue>> {
        self.score().ok_or_else(|| self.issues())
    }

    /// Calculate Base Exploitability score: sub-score for measuring
    /// ease of exploitation.
    ///
    /// Described in CVSS v3.1 Specification: Section 2:
    /// <https://www.first.org/cvss/specification-document#t6>
    pub fn exploitability(&self) -> Option<Score> {
        let av = metric::weight(&self.attack_vector)?;
        let ac = metric::weight(&self.attack_complexity)?;
        let ui = metric::weight(&self.user_interaction)?;
        let pr = self
            .privileges_required
            .as_ref()
            .and_then(Metric::known)?
            .scoped_weight(self.is_scope_changed());

        Some((8.22 * av * ac * pr * ui).into())
    }

    /// Calculate Base Impact Sub-Score (ISS): sub-score for measuring the
    /// consequences of successful exploitation, before taking the scope
    /// into account.
    ///
    /// Described in CVSS v3.1 Specification: Section 2:
    /// <https://www.first.org/cvss/specification-document#t6>
    pub fn impact(&self) -> Option<Score> {
        let c = metric::weight(&self.confidentiality_impact)?;
        let i = metric::weight(&self.integrity_impact)?;
        let a = metric::weight(&self.availability_impact)?;

        Some((1.0 - ((1.0 - c) * (1.0 - i) * (1.0 - a))).into())
    }

    fn is_scope_changed(&self) -> bool {
        self.scope
            .as_ref()
            .and_then(Metric::known)
            .is_some_and(Scope::is_changed)
    }

    fn score(&self) -> Option<Score> {
        let scope = self.scope.as_ref().and_then(Metric::known)?;
        let iss = self.impact()?.value();

        let impact = if !scope.is_changed() {
            scope.weight() * iss
        } else {
            (scope.weight() * (iss - 0.029)) - (3.25 * (iss - 0.02).powf(15.0))
        };

        if impact <= 0.0 {
            return Some(Score::ZERO);
        }

        let exploitability = self.exploitability()?.value();

        let score = if !scope.is_changed() {
            (impact + exploitability).min(10.0)
        } else {
            (1.08 * (impact + exploitability)).min(10.0)
        };

        Some(Score::new(score).roundup())
    }
}

/// Encode metrics into a CVSS v3.1 vector string and its base score.
///
/// Returns `None` if no metric was supplied at all. Unrecognized metrics are
/// encoded as `ERROR` and leave the score absent.
pub fn encode_v3(metrics: &Cvss3Metrics) -> Option<Encoded> {
    if metrics.is_empty() {
        return None;
    }

    Some(Encoded {
        vector: metrics.vector(),
        score: collapse(metrics.base_score()),
    })
}

/// Decode a CVSS v3.x vector string, along with its base score.
///
/// The `CVSS:3.x` prefix isn't checked. Metric codes and values are matched
/// ignoring case, unknown metrics are skipped.
pub fn decode_v3(vector: Option<&str>) -> Decoded<Cvss3Metrics> {
    let Some(vector) = vector.filter(|vector| !vector.trim().is_empty()) else {
        return Decoded::default();
    };

    let mut metrics = Cvss3Metrics::default();

    for (key, value) in vector::pairs(vector) {
        let value = value.unwrap_or_default();
        match key.as_str() {
            "av" => metrics.attack_vector = metric::decode(AV, &value),
            "ac" => metrics.attack_complexity = metric::decode(AC, &value),
            "pr" => metrics.privileges_required = metric::decode(PR, &value),
            "ui" => metrics.user_interaction = metric::decode(UI, &value),
            "s" => metrics.scope = metric::decode(S, &value),
            "c" => metrics.confidentiality_impact = metric::decode(C, &value),
            "i" => metrics.integrity_impact = metric::decode(I, &value),
            "a" => metrics.availability_impact = metric::decode(A, &value),
            _ => log::trace!("ignoring metric '{key}'"),
        }
    }

    let score = collapse(metrics.base_score());
    Decoded { metrics, score }
}
