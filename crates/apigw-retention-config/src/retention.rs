// Retention duration for a CloudWatch log group.
//
// Accepts a positive day count (integer or numeric string) or the
// "never expire" sentinel in any casing.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NEVER_EXPIRE: &str = "never expire";

/// Day counts CloudWatch Logs accepts for `PutRetentionPolicy`.
pub const CLOUDWATCH_RETENTION_DAYS: &[u32] = &[
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557, 2922,
    3288, 3653,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDays {
    /// Keep events for this many days.
    Days(u32),
    /// Remove any retention policy so events never expire.
    NeverExpire,
}

impl RetentionDays {
    /// Whether CloudWatch Logs is known to accept this value.
    pub fn is_supported(&self) -> bool {
        match self {
            RetentionDays::Days(days) => CLOUDWATCH_RETENTION_DAYS.contains(days),
            RetentionDays::NeverExpire => true,
        }
    }
}

impl std::fmt::Display for RetentionDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionDays::Days(days) => write!(f, "{}", days),
            RetentionDays::NeverExpire => write!(f, "{}", NEVER_EXPIRE),
        }
    }
}

impl std::str::FromStr for RetentionDays {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(NEVER_EXPIRE) {
            return Ok(RetentionDays::NeverExpire);
        }

        let days = trimmed.parse::<u32>().map_err(|_| {
            anyhow!(
                "Invalid retention '{}': expected a number of days or \"{}\"",
                s,
                NEVER_EXPIRE
            )
        })?;
        RetentionDays::from_days(i64::from(days))
    }
}

impl RetentionDays {
    fn from_days(days: i64) -> Result<Self> {
        if days <= 0 {
            bail!("Invalid retention {}: days must be greater than 0", days);
        }
        let days = u32::try_from(days)
            .map_err(|_| anyhow!("Invalid retention {}: too many days", days))?;
        Ok(RetentionDays::Days(days))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRetention {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RetentionDays {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match RawRetention::deserialize(deserializer)? {
            RawRetention::Number(days) => RetentionDays::from_days(days),
            RawRetention::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl Serialize for RetentionDays {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RetentionDays::Days(days) => serializer.serialize_u32(*days),
            RetentionDays::NeverExpire => serializer.serialize_str(NEVER_EXPIRE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        days: RetentionDays,
    }

    fn parse_toml(value: &str) -> Result<RetentionDays, toml::de::Error> {
        toml::from_str::<Wrapper>(&format!("days = {}", value)).map(|w| w.days)
    }

    #[test]
    fn test_never_expire_any_casing() {
        for text in ["never expire", "Never Expire", "NEVER EXPIRE", " never expire "] {
            assert_eq!(
                text.parse::<RetentionDays>().unwrap(),
                RetentionDays::NeverExpire
            );
        }
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(parse_toml("30").unwrap(), RetentionDays::Days(30));
        assert_eq!(parse_toml("\"14\"").unwrap(), RetentionDays::Days(14));
        assert_eq!(
            parse_toml("\"Never Expire\"").unwrap(),
            RetentionDays::NeverExpire
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(parse_toml("0").is_err());
        assert!(parse_toml("-7").is_err());
        assert!(parse_toml("\"forever\"").is_err());
        assert!("".parse::<RetentionDays>().is_err());
    }

    #[test]
    fn test_supported_values() {
        assert!(RetentionDays::Days(30).is_supported());
        assert!(RetentionDays::NeverExpire.is_supported());
        assert!(!RetentionDays::Days(31).is_supported());
    }

    #[test]
    fn test_display() {
        assert_eq!(RetentionDays::Days(90).to_string(), "90");
        assert_eq!(RetentionDays::NeverExpire.to_string(), "never expire");
    }
}
