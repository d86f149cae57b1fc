//! Rule type definitions.

use std::fmt;

use crate::rule::NormalizedRule;

/// RuleType represents the match kind named by a typed rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    /// Exact domain match
    Domain,
    /// Domain and all of its subdomains
    DomainSuffix,
    /// Substring of the domain
    DomainKeyword,
    /// IP CIDR range (IPv4 or IPv6)
    IpCidr,
}

impl RuleType {
    /// All supported rule types.
    pub const ALL: [RuleType; 4] = [
        RuleType::Domain,
        RuleType::DomainSuffix,
        RuleType::DomainKeyword,
        RuleType::IpCidr,
    ];

    /// Parse a rule type from a type token (case-insensitive).
    ///
    /// Returns `None` for anything outside the supported set, including
    /// Surge kinds such as `USER-AGENT` or `IP-CIDR6`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DOMAIN" => Some(RuleType::Domain),
            "DOMAIN-SUFFIX" => Some(RuleType::DomainSuffix),
            "DOMAIN-KEYWORD" => Some(RuleType::DomainKeyword),
            "IP-CIDR" => Some(RuleType::IpCidr),
            _ => None,
        }
    }

    /// Get the canonical token.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Domain => "DOMAIN",
            RuleType::DomainSuffix => "DOMAIN-SUFFIX",
            RuleType::DomainKeyword => "DOMAIN-KEYWORD",
            RuleType::IpCidr => "IP-CIDR",
        }
    }

    /// Field name used in rule documents.
    pub fn key(&self) -> &'static str {
        match self {
            RuleType::Domain => "domain",
            RuleType::DomainSuffix => "domain_suffix",
            RuleType::DomainKeyword => "domain_keyword",
            RuleType::IpCidr => "ip_cidr",
        }
    }

    /// Build a normalized rule of this type.
    pub fn build(self, value: impl Into<String>) -> NormalizedRule {
        let value = value.into();
        match self {
            RuleType::Domain => NormalizedRule::Domain(value),
            RuleType::DomainSuffix => NormalizedRule::DomainSuffix(value),
            RuleType::DomainKeyword => NormalizedRule::DomainKeyword(value),
            RuleType::IpCidr => NormalizedRule::IpCidr(value),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_type_from_str() {
        assert_eq!(RuleType::parse("DOMAIN"), Some(RuleType::Domain));
        assert_eq!(RuleType::parse("domain"), Some(RuleType::Domain));
        assert_eq!(RuleType::parse("Domain-Suffix"), Some(RuleType::DomainSuffix));
        assert_eq!(RuleType::parse(" DOMAIN-KEYWORD "), Some(RuleType::DomainKeyword));
        assert_eq!(RuleType::parse("IP-CIDR"), Some(RuleType::IpCidr));
        assert_eq!(RuleType::parse("IP-CIDR6"), None);
        assert_eq!(RuleType::parse("USER-AGENT"), None);
        assert_eq!(RuleType::parse(""), None);
    }

    #[test]
    fn test_token_roundtrip() {
        for rule_type in RuleType::ALL {
            assert_eq!(RuleType::parse(rule_type.as_str()), Some(rule_type));
        }
    }

    #[test]
    fn test_build_matches_key() {
        for rule_type in RuleType::ALL {
            let rule = rule_type.build("x");
            assert_eq!(rule.rule_type(), rule_type);
            assert_eq!(rule.key(), rule_type.key());
            assert_eq!(rule.value(), "x");
        }
    }
}
