use serde::{Deserialize, Serialize};

/// A CVSS base score, or one of its sub-scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);

    /// Create a new score object
    pub fn new(score: f64) -> Score {
        Score(score)
    }

    /// Get the score as a floating point value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Round to one decimal, half away from zero, as required by
    /// CVSS v2.
    pub fn round1(self) -> Score {
        Score((self.0 * 10.0).round() / 10.0)
    }

    /// Round the score up to the algorithm described in
    /// CVSS v3.1: Appendix A - Floating Point Rounding.
    ///
    /// <https://www.first.org/cvss/specification-document#t25>
    ///
    /// The value is scaled to an integer first, so that binary floating
    /// point noise (e.g. `4.000000000000001`) doesn't bump it to the next
    /// decimal.
    pub fn roundup(self) -> Score {
        let score_int = (self.0 * 100_000.0).round() as u64;

        if score_int % 10_000 == 0 {
            Score((score_int as f64) / 100_000.0)
        } else {
            let score_floor = ((score_int as f64) / 10_000.0).floor();
            Score((score_floor + 1.0) / 10.0)
        }
    }
}

impl From<f64> for Score {
    fn from(score: f64) -> Score {
        Score(score)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        score.value()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test(rstest::rstest)]
    #[case(0.0, 0.0)]
    #[case(4.0, 4.0)]
    #[case(4.02, 4.1)]
    #[case(4.000_000_000_000_001, 4.0)]
    #[case(9.999, 10.0)]
    #[case(0.001, 0.1)]
    fn roundup(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(Score::new(input).roundup().value(), expected);
    }

    /// Never rounds down, always lands on a single decimal.
    #[test_log::test]
    fn roundup_is_monotone() {
        for n in 0..=10_000u32 {
            let x = f64::from(n) / 1000.0;
            let rounded = Score::new(x).roundup().value();

            let tenths = rounded * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-9, "{x} -> {rounded}");
            assert!(rounded >= x, "{x} -> {rounded}");
            assert!(rounded - x < 0.1 + 1e-9, "{x} -> {rounded}");

            if n % 100 == 0 {
                assert_eq!(rounded, x);
            }
        }
    }

    #[test_log::test(rstest::rstest)]
    #[case(9.9951, 10.0)]
    #[case(7.15004, 7.2)]
    #[case(4.2961, 4.3)]
    #[case(0.05, 0.1)]
    #[case(0.0, 0.0)]
    fn round1(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(Score::new(input).round1().value(), expected);
    }

    #[test_log::test]
    fn serialize_as_number() {
        assert_eq!(serde_json::to_string(&Score::new(9.8)).unwrap(), "9.8");
    }
}
