//! Option and visibility-limit types.

use serde::{Deserialize, Serialize};

/// One selectable entry. Matching only looks at `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption<T> {
    pub value: T,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl<T> DropdownOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// How many ranked options to keep.
///
/// Serialized as a signed integer; any negative value means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum MaxVisible {
    #[default]
    Unlimited,
    Limit(usize),
}

impl MaxVisible {
    pub fn apply<T>(self, items: &mut Vec<T>) {
        if let Self::Limit(limit) = self {
            items.truncate(limit);
        }
    }
}

impl From<i64> for MaxVisible {
    fn from(raw: i64) -> Self {
        usize::try_from(raw).map_or(Self::Unlimited, Self::Limit)
    }
}

impl From<MaxVisible> for i64 {
    fn from(value: MaxVisible) -> Self {
        match value {
            MaxVisible::Unlimited => -1,
            MaxVisible::Limit(limit) => i64::try_from(limit).unwrap_or(i64::MAX),
        }
    }
}
