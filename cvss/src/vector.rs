//! Building and splitting vector strings.

/// Placeholder emitted for a metric which has no recognized value.
pub const ERROR_TOKEN: &str = "ERROR";

/// Join an ordered list of `(code, letter)` segments into a vector string.
pub(crate) fn join(prefix: Option<&str>, segments: &[(&'static str, Option<char>)]) -> String {
    let mut parts = Vec::with_capacity(segments.len() + 1);
    parts.extend(prefix.map(ToString::to_string));
    parts.extend(segments.iter().map(|(code, letter)| match letter {
        Some(letter) => format!("{code}:{letter}"),
        None => format!("{code}:{ERROR_TOKEN}"),
    }));
    parts.join("/")
}

/// Split a vector string into `(metric, value)` pairs, with the metric lower-cased.
///
/// A segment without a colon yields its metric and no value.
pub(crate) fn pairs(vector: &str) -> impl Iterator<Item = (String, Option<String>)> + '_ {
    vector.trim().split('/').map(|segment| match segment.split_once(':') {
        Some((metric, value)) => (metric.to_lowercase(), Some(value.to_string())),
        None => (segment.to_lowercase(), None),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn join_with_error() {
        assert_eq!(
            join(Some("CVSS:3.1"), &[("AV", Some('N')), ("AC", None)]),
            "CVSS:3.1/AV:N/AC:ERROR"
        );
        assert_eq!(join(None, &[("AV", Some('L')), ("Au", Some('N'))]), "AV:L/Au:N");
    }

    #[test]
    fn split_pairs() {
        let pairs = pairs(" CVSS:3.1/AV:n/Au:X:Y/foo ").collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                ("cvss".to_string(), Some("3.1".to_string())),
                ("av".to_string(), Some("n".to_string())),
                ("au".to_string(), Some("X:Y".to_string())),
                ("foo".to_string(), None),
            ]
        );
    }
}
