use crate::error::MetricIssue;
use serde::{de, ser, Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A closed set of values a single CVSS metric may take.
pub trait Enumerant: Copy + Sized + 'static {
    /// All variants, in table order.
    const VARIANTS: &'static [Self];

    /// The canonical literal, e.g. `ADJACENT_NETWORK`.
    fn name(self) -> &'static str;

    /// The letter used in a vector string.
    fn letter(self) -> char;

    /// The weight published by the CVSS standard.
    fn weight(self) -> f64;

    /// Look up a variant by its exact canonical literal.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }

    /// Look up a variant by its vector letter, ignoring case.
    fn from_letter(letter: &str) -> Option<Self> {
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::VARIANTS
                .iter()
                .copied()
                .find(|v| v.letter().eq_ignore_ascii_case(&c)),
            _ => None,
        }
    }
}

/// Declare an enumerant from its table of `Variant => (literal, letter, weight)`.
macro_rules! enumerant {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($literal:literal, $letter:literal, $weight:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $crate::metric::Enumerant for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $literal),+
                }
            }

            fn letter(self) -> char {
                match self {
                    $(Self::$variant => $letter),+
                }
            }

            fn weight(self) -> f64 {
                match self {
                    $(Self::$variant => $weight),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::metric::Enumerant::name(*self))
            }
        }
    };
}

pub(crate) use enumerant;

/// The value supplied for one metric field.
///
/// Callers hand in free-form literals. Anything which isn't exactly one of the
/// canonical literals is kept as [`Metric::Unrecognized`], so that it can still
/// be reported back (as an `ERROR` token in a vector string).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Enumerant> Metric<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn letter(&self) -> Option<char> {
        self.known().map(T::letter)
    }

    pub fn weight(&self) -> Option<f64> {
        self.known().map(T::weight)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(value) => value.name(),
            Self::Unrecognized(value) => value,
        }
    }
}

impl<T: Enumerant> From<T> for Metric<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: Enumerant> From<&str> for Metric<T> {
    fn from(value: &str) -> Self {
        match T::from_name(value) {
            Some(known) => Self::Known(known),
            None => Self::Unrecognized(value.to_string()),
        }
    }
}

impl<T: Enumerant> From<String> for Metric<T> {
    fn from(value: String) -> Self {
        match T::from_name(&value) {
            Some(known) => Self::Known(known),
            None => Self::Unrecognized(value),
        }
    }
}

impl<T: Enumerant> Display for Metric<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de, T: Enumerant> Deserialize<'de> for Metric<T> {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

impl<T: Enumerant> Serialize for Metric<T> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

/// Resolve one field of a metrics record, reporting why it can't be used.
pub(crate) fn resolve<T: Enumerant>(
    metric: &'static str,
    value: Option<&Metric<T>>,
) -> Result<T, MetricIssue> {
    match value {
        Some(Metric::Known(value)) => Ok(*value),
        Some(Metric::Unrecognized(value)) => Err(MetricIssue::Unrecognized {
            metric,
            value: value.clone(),
        }),
        None => Err(MetricIssue::Missing { metric }),
    }
}

/// The weight of an optional field, if it holds a recognized value.
pub(crate) fn weight<T: Enumerant>(value: &Option<Metric<T>>) -> Option<f64> {
    value.as_ref().and_then(Metric::weight)
}

/// Decode the value of a `metric:value` vector segment.
pub(crate) fn decode<T: Enumerant>(metric: &'static str, value: &str) -> Option<Metric<T>> {
    let result = T::from_letter(value);
    if result.is_none() {
        log::debug!("unrecognized value '{value}' for metric {metric}");
    }
    result.map(Metric::Known)
}
