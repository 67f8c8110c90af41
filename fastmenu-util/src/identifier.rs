use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced id such as `minecraft:chest` or `myplugin:coin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    pub namespace: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierParseError(pub String);

impl Display for IdentifierParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid identifier: {:?}", self.0)
    }
}

impl std::error::Error for IdentifierParseError {}

impl Identifier {
    pub fn vanilla(path: &str) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: path.to_string(),
        }
    }

    pub fn new(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    pub fn is_vanilla(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }
}

fn valid_part(part: &str, allow_slash: bool) -> bool {
    !part.is_empty()
        && part.chars().all(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '_' | '-' | '.')
                || (allow_slash && c == '/')
        })
}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    /// Accepts `namespace:path` or a bare `path`, which lands in the vanilla namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s.split_once(':').unwrap_or((DEFAULT_NAMESPACE, s));
        if !valid_part(namespace, false) || !valid_part(path, true) {
            return Err(IdentifierParseError(s.to_string()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::Identifier;

    #[test]
    fn test_parse_identifier() {
        let id: Identifier = "myplugin:coins/gold".parse().unwrap();
        assert_eq!(id.namespace, "myplugin");
        assert_eq!(id.path, "coins/gold");

        let bare: Identifier = "chest".parse().unwrap();
        assert_eq!(bare, Identifier::vanilla("chest"));
        assert!(bare.is_vanilla());

        assert!("Bad:Name".parse::<Identifier>().is_err());
        assert!(":stone".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_identifier_serde() {
        let id = Identifier::vanilla("diamond_sword");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"minecraft:diamond_sword\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
