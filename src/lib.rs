//! sbrule - convert Surge and plain rule lists into sing-box rule sets.
//!
//! Rule lists are downloaded from a configured table of groups, each line
//! is classified into a single-field rule record, and every non-empty group
//! is written as a `<GROUP>.json` source rule set.
//!
//! # Quick Start
//!
//! ```ignore
//! use sbrule::{DocumentWriter, GroupConfig, HttpFetcher, Pipeline};
//!
//! let pipeline = Pipeline::new(HttpFetcher::new()?, GroupConfig::default());
//! let summary = pipeline.run(&DocumentWriter::new("dist"))?;
//! println!("{} documents written", summary.written());
//! ```
//!
//! # Line Formats
//!
//! - **Typed rules**: `DOMAIN-SUFFIX,example.com`, `DOMAIN,a.example.com`,
//!   `DOMAIN-KEYWORD,google`, `IP-CIDR,10.0.0.0/8`
//! - **Bare IPs/CIDRs**: `192.168.0.0/16`, `1.1.1.1`, `fc00::/7`
//! - **Bare domains**: anything else, emitted as `domain_suffix`
//!
//! Blank lines and `#` comments are ignored. Other typed rule kinds are
//! skipped with a warning.
//!
//! # Output
//!
//! ```json
//! {
//!   "version": 1,
//!   "rules": [
//!     { "domain_suffix": "example.com" },
//!     { "ip_cidr": "10.0.0.0/8" }
//!   ]
//! }
//! ```

mod error;
mod rule;
mod rule_type;

pub mod config;
pub mod converter;
pub mod document;
pub mod fetch;
pub mod pipeline;

// Re-export core types
pub use error::{Error, FetchError, Result, RuleParseError};
pub use rule::NormalizedRule;
pub use rule_type::RuleType;

pub use config::{GroupConfig, RuleGroup};
pub use converter::{classify_line, parse_list, ClassifyOptions, ParsedList};
pub use document::{DocumentWriter, RuleDocument, RULE_DOCUMENT_VERSION};
pub use fetch::{Fetcher, HttpFetcher};
pub use pipeline::{GroupOutcome, GroupRules, Pipeline, RunSummary};
