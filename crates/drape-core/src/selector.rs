use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Background-removal control parameter. The wire shape is loose (absent,
/// one bool, or a list of bools), so the variant is decided once when the
/// payload is deserialized and everything downstream consumes only this.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RemovalSelector {
    #[default]
    Absent,
    Uniform(bool),
    PerImage(Vec<bool>),
}

impl RemovalSelector {
    /// Classify a raw JSON value. Unrecognized shapes fall back to
    /// `Absent` (no removal) rather than failing the job.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(flag) => Self::Uniform(*flag),
            Value::Array(items) => Self::PerImage(items.iter().map(truthy).collect()),
            _ => Self::Absent,
        }
    }

    /// Resolve to exactly one flag per image. Total: never fails, for any
    /// selector and any `n`.
    pub fn resolve(&self, n: usize) -> Vec<bool> {
        match self {
            Self::Absent => vec![false; n],
            Self::Uniform(flag) => vec![*flag; n],
            Self::PerImage(flags) => (0..n)
                .map(|i| flags.get(i).copied().unwrap_or(false))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RemovalSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// JSON truthiness for per-image list entries, matching the permissive
/// coercion the wire format allows.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
