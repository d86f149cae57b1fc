//! Rule documents and the output directory writer.

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{NormalizedRule, Result};

/// Version number written into every rule document.
pub const RULE_DOCUMENT_VERSION: u32 = 1;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// A sing-box source rule set: `{ "version": 1, "rules": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub version: u32,
    pub rules: Vec<NormalizedRule>,
}

impl RuleDocument {
    /// Create a document at the current version.
    pub fn new(rules: Vec<NormalizedRule>) -> Self {
        Self {
            version: RULE_DOCUMENT_VERSION,
            rules,
        }
    }

    /// Number of rules in the document.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the document has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialize with two-space indentation and ASCII-only output.
    ///
    /// Non-ASCII characters are written as `\uXXXX` escapes (surrogate
    /// pairs above the BMP), so documents are byte-stable across tools.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, AsciiFormatter::default());
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Pretty formatter that escapes every non-ASCII character.
#[derive(Default)]
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Writes rule documents into a single flat directory.
pub struct DocumentWriter {
    dir: PathBuf,
}

impl DocumentWriter {
    /// Create a writer for `dir`. Nothing is touched until [`create`](Self::create).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document for `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Create the output directory and any missing parents.
    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Write `document` as `<dir>/<name>.json`, replacing any previous file.
    ///
    /// The document goes to a temp file in the same directory first and is
    /// renamed into place, so readers never see a partial file.
    pub fn write(&self, name: &str, document: &RuleDocument) -> Result<PathBuf> {
        let path = self.path_for(name);
        let json = document.to_json()?;

        let mut temp_file = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path).map_err(|e| e.error)?;

        Ok(path)
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> RuleDocument {
        RuleDocument::new(vec![
            NormalizedRule::DomainSuffix("example.com".into()),
            NormalizedRule::IpCidr("10.0.0.0/8".into()),
        ])
    }

    #[test]
    fn test_to_json_layout() {
        let json = sample().to_json().unwrap();
        let expected = r#"{
  "version": 1,
  "rules": [
    {
      "domain_suffix": "example.com"
    },
    {
      "ip_cidr": "10.0.0.0/8"
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_escapes_non_ascii() {
        let doc = RuleDocument::new(vec![
            NormalizedRule::DomainSuffix("bücher.example".into()),
            NormalizedRule::DomainKeyword("日本".into()),
            NormalizedRule::Domain("a\u{1F600}b".into()),
        ]);
        let json = doc.to_json().unwrap();

        assert!(json.is_ascii());
        assert!(json.contains(r#""domain_suffix": "b\u00fccher.example""#));
        assert!(json.contains(r#""domain_keyword": "\u65e5\u672c""#));
        assert!(json.contains(r#""domain": "a\ud83d\ude00b""#));

        let loaded: RuleDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempdir().unwrap();
        let writer = DocumentWriter::new(dir.path().join("nested").join("out"));
        writer.create().unwrap();

        let path = writer.write("REJECT", &sample()).unwrap();
        assert_eq!(path, writer.dir().join("REJECT.json"));

        let content = fs::read_to_string(&path).unwrap();
        let loaded: RuleDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let writer = DocumentWriter::new(dir.path());
        writer.create().unwrap();

        writer.write("A", &sample()).unwrap();
        let smaller = RuleDocument::new(vec![NormalizedRule::Domain("a.com".into())]);
        let path = writer.write("A", &smaller).unwrap();

        let loaded: RuleDocument =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, smaller);
        // Only the document itself, no leftover temp files.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_without_directory_fails() {
        let dir = tempdir().unwrap();
        let writer = DocumentWriter::new(dir.path().join("missing"));
        assert!(writer.write("A", &sample()).is_err());
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(DocumentWriter::default().dir(), Path::new("dist"));
    }
}
