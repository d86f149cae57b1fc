//! Group driver: fetch, classify and write every configured group.
//!
//! Groups are processed one after another, URLs within a group in order,
//! and lines within a body in order. Failures are contained at the
//! smallest unit that makes sense:
//!
//! - a URL that cannot be fetched is skipped
//! - a line that cannot be converted is skipped
//! - a group with no rules is not written
//! - a document that cannot be written does not stop later groups
//!
//! Only failing to create the output directory aborts the run.

use std::path::PathBuf;

use crate::config::{GroupConfig, RuleGroup};
use crate::converter::parse_list;
use crate::document::{DocumentWriter, RuleDocument};
use crate::fetch::Fetcher;
use crate::{Error, NormalizedRule, Result};

/// Rules collected for one group, plus what was lost along the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupRules {
    /// Rules in URL-then-line order
    pub rules: Vec<NormalizedRule>,
    /// URLs fetched successfully
    pub fetched: usize,
    /// URLs that failed to fetch
    pub failed: usize,
    /// Lines skipped as unsupported or malformed
    pub skipped_lines: usize,
}

/// Final state of one group.
#[derive(Debug)]
pub enum GroupOutcome {
    /// Document written to `path` with `rules` entries
    Written { path: PathBuf, rules: usize },
    /// No rules were produced, nothing written
    Empty,
    /// Serializing or persisting the document failed
    WriteFailed(Error),
}

/// Per-group results of a run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub groups: Vec<(String, GroupOutcome)>,
}

impl RunSummary {
    /// Number of documents written.
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Written { .. }))
    }

    /// Number of groups skipped for having no rules.
    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Empty))
    }

    /// Number of groups whose document could not be written.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::WriteFailed(_)))
    }

    /// Outcome for a group by name.
    pub fn outcome(&self, name: &str) -> Option<&GroupOutcome> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.groups.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Sequential conversion pipeline over a group table.
pub struct Pipeline<F: Fetcher> {
    fetcher: F,
    config: GroupConfig,
}

impl<F: Fetcher> Pipeline<F> {
    /// Create a pipeline.
    pub fn new(fetcher: F, config: GroupConfig) -> Self {
        Self { fetcher, config }
    }

    /// Group table this pipeline runs over.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Fetch and classify every source of one group.
    pub fn collect_group(&self, group: &RuleGroup) -> GroupRules {
        let options = self.config.classify_options();
        let mut collected = GroupRules::default();

        for url in &group.urls {
            log::info!("  - Downloading from {}", url);
            let body = match self.fetcher.fetch(url) {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("  Failed to download {}: {}", url, e);
                    collected.failed += 1;
                    continue;
                }
            };

            let parsed = parse_list(&body, options);
            log::debug!(
                "  {} rules, {} skipped lines from {}",
                parsed.rules.len(),
                parsed.skipped,
                url
            );
            collected.fetched += 1;
            collected.skipped_lines += parsed.skipped;
            collected.rules.extend(parsed.rules);
        }

        collected
    }

    /// Process one group and write its document if it has any rules.
    pub fn process_group(&self, group: &RuleGroup, writer: &DocumentWriter) -> GroupOutcome {
        log::info!("Processing group: {}", group.name);

        let collected = self.collect_group(group);
        log::info!(
            "Group '{}' processed with {} rules",
            group.name,
            collected.rules.len()
        );

        if collected.rules.is_empty() {
            log::warn!(
                "No rules found for group '{}', skipping file creation",
                group.name
            );
            return GroupOutcome::Empty;
        }

        let document = RuleDocument::new(collected.rules);
        match writer.write(&group.name, &document) {
            Ok(path) => {
                log::info!("  -> Created {:?}", path);
                GroupOutcome::Written {
                    path,
                    rules: document.len(),
                }
            }
            Err(e) => {
                log::error!(
                    "Failed to write {:?}: {}",
                    writer.path_for(&group.name),
                    e
                );
                GroupOutcome::WriteFailed(e)
            }
        }
    }

    /// Run every group in configured order.
    ///
    /// Returns an error only if the output directory cannot be created.
    pub fn run(&self, writer: &DocumentWriter) -> Result<RunSummary> {
        writer.create()?;

        let mut summary = RunSummary::default();
        for group in self.config.iter() {
            let outcome = self.process_group(group, writer);
            summary.groups.push((group.name.clone(), outcome));
        }

        Ok(summary)
    }
}
