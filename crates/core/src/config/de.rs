//! Lenient deserializers for loosely typed setting values.
//!
//! Figment's env provider parses values before serde sees them, so `DRY_RUN=1`
//! arrives as an integer, and a TOML file may write `password = 1234`. These
//! helpers accept whatever shape the provider produced.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }
}

/// Accept a string, number or bool and keep its textual form.
pub(super) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

/// `true`, `1` and `t` (any case) enable the flag; everything else disables it.
pub(super) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Scalar::deserialize(deserializer)?;
    Ok(match value {
        Scalar::Bool(b) => b,
        Scalar::Int(i) => i == 1,
        Scalar::Float(_) => false,
        Scalar::Str(s) => parse_flag(&s),
    })
}

pub(super) fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsRepr {
    List(Vec<Scalar>),
    One(Scalar),
}

/// Tags come either as a list or as one string that may hold a JSON array.
pub(super) fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match TagsRepr::deserialize(deserializer)? {
        TagsRepr::List(items) => items.into_iter().map(Scalar::into_string).collect(),
        TagsRepr::One(value) => parse_tag_list(&value.into_string()),
    };
    Ok(tags)
}

pub(super) fn parse_tag_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return list;
        }
    }
    vec![trimmed.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("t"));
        assert!(parse_flag(" T "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_tag_list_json() {
        assert_eq!(
            parse_tag_list(r#"["cross-seed", "xseed"]"#),
            vec!["cross-seed".to_string(), "xseed".to_string()]
        );
    }

    #[test]
    fn test_parse_tag_list_single() {
        assert_eq!(parse_tag_list("cross-seed"), vec!["cross-seed".to_string()]);
    }

    #[test]
    fn test_parse_tag_list_broken_json_is_one_tag() {
        assert_eq!(parse_tag_list("[oops"), vec!["[oops".to_string()]);
    }
}
