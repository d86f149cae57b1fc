//! Normalized rule records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::RuleType;

/// A single rule in sing-box headless rule form.
///
/// Exactly one field is populated per record; the enum makes a record with
/// zero or several fields unrepresentable. Serializes as a one-key object:
///
/// ```
/// use sbrule::NormalizedRule;
///
/// let rule = NormalizedRule::DomainSuffix("example.com".to_string());
/// assert_eq!(
///     serde_json::to_string(&rule).unwrap(),
///     r#"{"domain_suffix":"example.com"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedRule {
    Domain(String),
    DomainSuffix(String),
    DomainKeyword(String),
    IpCidr(String),
}

impl NormalizedRule {
    /// Get the rule type of this record.
    pub fn rule_type(&self) -> RuleType {
        match self {
            NormalizedRule::Domain(_) => RuleType::Domain,
            NormalizedRule::DomainSuffix(_) => RuleType::DomainSuffix,
            NormalizedRule::DomainKeyword(_) => RuleType::DomainKeyword,
            NormalizedRule::IpCidr(_) => RuleType::IpCidr,
        }
    }

    /// Field name of the populated tag.
    pub fn key(&self) -> &'static str {
        self.rule_type().key()
    }

    /// Value of the populated tag.
    pub fn value(&self) -> &str {
        match self {
            NormalizedRule::Domain(v)
            | NormalizedRule::DomainSuffix(v)
            | NormalizedRule::DomainKeyword(v)
            | NormalizedRule::IpCidr(v) => v,
        }
    }
}

impl fmt::Display for NormalizedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rule_type(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_key_serialization() {
        let cases = [
            (NormalizedRule::Domain("a.com".into()), json!({"domain": "a.com"})),
            (NormalizedRule::DomainSuffix("b.com".into()), json!({"domain_suffix": "b.com"})),
            (NormalizedRule::DomainKeyword("ads".into()), json!({"domain_keyword": "ads"})),
            (NormalizedRule::IpCidr("10.0.0.0/8".into()), json!({"ip_cidr": "10.0.0.0/8"})),
        ];

        for (rule, expected) in cases {
            let value = serde_json::to_value(&rule).unwrap();
            assert_eq!(value, expected);
            assert_eq!(value.as_object().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_deserialize_record() {
        let rule: NormalizedRule = serde_json::from_str(r#"{"ip_cidr":"fc00::/7"}"#).unwrap();
        assert_eq!(rule, NormalizedRule::IpCidr("fc00::/7".into()));
    }

    #[test]
    fn test_display() {
        let rule = NormalizedRule::DomainKeyword("google".into());
        assert_eq!(rule.to_string(), "DOMAIN-KEYWORD,google");
    }
}
