//! Format converters for rule lists.

mod surge;

pub use surge::{classify_line, parse_list, ClassifyOptions, ParsedList};
