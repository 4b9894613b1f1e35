use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Which bundled baseline dataset (re)seeds the local cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedSource {
    /// Small hand-picked demo library.
    #[default]
    #[serde(rename = "static", alias = "compact", alias = "demo")]
    Compact,
    /// Full catalog exported from the server. Authoritative and not mirrored
    /// remotely, so the remote catalog is never consulted while it's active.
    #[serde(rename = "server", alias = "full")]
    Server,
}
impl SeedSource {
    /// Value persisted in the local cache.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "static",
            Self::Server => "server",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compact => "Demo library",
            Self::Server => "Server catalog",
        }
    }
}
impl FromStr for SeedSource {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "static" | "compact" | "demo" => Self::Compact,
            "server" | "full" => Self::Server,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "seed source",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for SeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("static", SeedSource::Compact)]
    #[case("Compact", SeedSource::Compact)]
    #[case(" demo ", SeedSource::Compact)]
    #[case("server", SeedSource::Server)]
    #[case("FULL", SeedSource::Server)]
    fn test_parse(#[case] input: &str, #[case] expected: SeedSource) {
        assert_eq!(input.parse::<SeedSource>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("remote")]
    #[case("{\"static\"}")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = input.parse::<SeedSource>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "seed source", .. }));
    }

    #[test]
    fn test_persisted_form_round_trips() {
        for seed in [SeedSource::Compact, SeedSource::Server] {
            assert_eq!(seed.as_str().parse::<SeedSource>().unwrap(), seed);
        }
        assert_eq!(serde_json::to_string(&SeedSource::Compact).unwrap(), r#""static""#);
        assert_eq!(serde_json::from_str::<SeedSource>(r#""full""#).unwrap(), SeedSource::Server);
    }
}
