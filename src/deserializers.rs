use serde::{Deserialize, Deserializer};

// The web form posts select values as strings ("3") while the quiz view posts numbers,
// so ids and ratings accept both.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

/// An integer that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "IntOrString")]
pub struct FlexibleInt(pub i64);

impl TryFrom<IntOrString> for FlexibleInt {
    type Error = String;

    fn try_from(value: IntOrString) -> Result<Self, Self::Error> {
        match value {
            IntOrString::Int(v) => Ok(FlexibleInt(v)),
            IntOrString::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(FlexibleInt)
                .map_err(|_| format!("Wrong value {s:?}, can not parse to integer")),
        }
    }
}

impl From<FlexibleInt> for i64 {
    fn from(value: FlexibleInt) -> Self {
        value.0
    }
}

/// Query-string page numbers fall back to `None` (page 1) when they do not parse.
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}
