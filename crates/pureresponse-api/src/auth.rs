use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// PureResponse account level.
///
/// Determines how many custom contact fields a list upload may carry;
/// columns past the limit are dropped from the upload's field mapping.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountTier {
    #[default]
    Lite,
    Pro,
    Expert,
}

impl AccountTier {
    /// Maximum number of custom fields a contact list may define.
    pub fn max_custom_fields(self) -> usize {
        match self {
            Self::Lite => 10,
            Self::Pro => 20,
            Self::Expert => 40,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tier_capacity() {
        assert_eq!(AccountTier::Lite.max_custom_fields(), 10);
        assert_eq!(AccountTier::Pro.max_custom_fields(), 20);
        assert_eq!(AccountTier::Expert.max_custom_fields(), 40);
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("Expert".parse::<AccountTier>().unwrap(), AccountTier::Expert);
        assert_eq!("pro".parse::<AccountTier>().unwrap(), AccountTier::Pro);
        assert!("platinum".parse::<AccountTier>().is_err());
    }
}
