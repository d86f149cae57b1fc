//! Surge rule list and plain list parser.
//!
//! Two source shapes are accepted, line by line:
//!
//! - typed rules: `TYPE,value[,modifiers]` (Surge ruleset syntax)
//! - bare lines: an IP address, a CIDR network, or a domain
//!
//! Comma presence is the only discriminator between the two. A bare line
//! that parses as an IP network becomes `ip_cidr`, anything else becomes
//! `domain_suffix`.

use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr};

use crate::error::RuleParseError;
use crate::{NormalizedRule, RuleType};

/// Options controlling line classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Drop `,no-resolve` style modifiers after a typed rule's value.
    ///
    /// Off by default: the whole remainder after the first comma is kept.
    pub strip_modifiers: bool,
}

/// Rules and skip count produced from one rule list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedList {
    /// Rules in source line order
    pub rules: Vec<NormalizedRule>,
    /// Lines dropped as unsupported or malformed
    pub skipped: usize,
}

/// Classify one raw line.
///
/// Returns `Ok(None)` for blank lines and `#` comments, and an error for
/// typed rules that cannot be converted. Callers are expected to warn and
/// move on to the next line.
pub fn classify_line(
    line: &str,
    options: ClassifyOptions,
) -> Result<Option<NormalizedRule>, RuleParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if let Some((token, value)) = line.split_once(',') {
        return classify_typed(line, token, value, options).map(Some);
    }

    if is_ip_or_cidr(line) {
        Ok(Some(NormalizedRule::IpCidr(line.to_string())))
    } else {
        Ok(Some(NormalizedRule::DomainSuffix(line.to_string())))
    }
}

fn classify_typed(
    line: &str,
    token: &str,
    value: &str,
    options: ClassifyOptions,
) -> Result<NormalizedRule, RuleParseError> {
    let token = token.trim();
    let mut value = value.trim();

    if options.strip_modifiers {
        if let Some((head, _)) = value.split_once(',') {
            value = head.trim();
        }
    }

    if token.is_empty() || value.is_empty() {
        return Err(RuleParseError::Malformed(line.to_string()));
    }

    match RuleType::parse(token) {
        Some(rule_type) => Ok(rule_type.build(value)),
        None => Err(RuleParseError::Unsupported(line.to_string())),
    }
}

/// Whether a line is an IP address or network.
///
/// Host bits are allowed in the network form (`10.0.0.1/8`), and IPv4
/// networks may use a netmask or hostmask instead of a prefix length.
fn is_ip_or_cidr(s: &str) -> bool {
    s.parse::<IpNet>().is_ok() || s.parse::<IpAddr>().is_ok() || is_ipv4_mask_network(s)
}

/// `192.168.0.0/255.255.0.0` or `192.168.0.0/0.0.255.255`.
fn is_ipv4_mask_network(s: &str) -> bool {
    let Some((addr, mask)) = s.split_once('/') else {
        return false;
    };
    if addr.parse::<Ipv4Addr>().is_err() {
        return false;
    }
    match mask.parse::<Ipv4Addr>() {
        Ok(mask) => {
            let bits = u32::from(mask);
            is_contiguous_mask(bits) || is_contiguous_mask(!bits)
        }
        Err(_) => false,
    }
}

/// Ones from the top, then zeros.
fn is_contiguous_mask(bits: u32) -> bool {
    bits.leading_ones() + bits.trailing_zeros() >= 32
}

/// Line terminators recognised in list bodies: `\n`, `\r`, and the other
/// Unicode line boundaries some generators emit.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Parse a whole rule list body.
///
/// Lines may end in `\n`, `\r\n` or a bare `\r`. Every skipped line is
/// logged at `warn` level with its reason.
pub fn parse_list(content: &str, options: ClassifyOptions) -> ParsedList {
    let mut parsed = ParsedList::default();

    for line in content.split(is_line_break) {
        match classify_line(line, options) {
            Ok(Some(rule)) => parsed.rules.push(rule),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Skipping line: {}", e);
                parsed.skipped += 1;
            }
        }
    }

    parsed
}
