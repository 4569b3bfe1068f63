use std::fmt;

use super::{Context, Value};

/// A membership predicate: the named feature must be present in a
/// [`Context`] and its value must be one of `allowed`.
///
/// Used for both product filters and buyer descriptors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    #[cfg_attr(feature = "serde", serde(rename = "feature"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "in"))]
    pub allowed: Vec<Value>,
}

impl Feature {
    /// Returns `false` when the feature is absent from `ctx`.
    #[must_use]
    pub fn matches(&self, ctx: &Context) -> bool {
        ctx.get(&self.name)
            .is_some_and(|observed| self.allowed.iter().any(|v| v.matches(observed)))
    }
}

/// A list of predicates matches iff every predicate matches. The empty list
/// matches every context.
#[must_use]
pub fn all_match(features: &[Feature], ctx: &Context) -> bool {
    features.iter().all(|f| f.matches(ctx))
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in [", self.name)?;
        for (i, v) in self.allowed.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Intermediate builder returned by [`feature()`].
#[derive(Debug, Clone)]
pub struct FeatureName {
    name: String,
}

impl FeatureName {
    /// Allow any of the given values.
    #[must_use]
    pub fn is_in<I, V>(self, values: I) -> Feature
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Feature {
            name: self.name,
            allowed: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Allow exactly one value.
    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Feature {
        Feature {
            name: self.name,
            allowed: vec![value.into()],
        }
    }
}

#[must_use]
pub fn feature(name: &str) -> FeatureName {
    FeatureName {
        name: name.to_owned(),
    }
}
