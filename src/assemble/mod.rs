//! Notice assembly.
//!
//! [`NoticeAssembler`] turns organization groups into notices. The template
//! bytes are read once; every group gets a freshly parsed document so no
//! edit leaks from one notice into the next. Per group the pipeline is:
//!
//! 1. extract the style profile
//! 2. replace the placeholder with the organization name
//! 3. rewrite the accounts table
//! 4. place the organization name below the anchor
//! 5. apply tone emphasis
//! 6. save as `Notice_<ORG>_<CODE>.docx`
//!
//! A failure in any step is recorded against that group and the run moves
//! on to the next one.

mod options;
mod report;

pub use options::{NoticeOptions, DEFAULT_ANCHOR, DEFAULT_OUTPUT_DIR, DEFAULT_PLACEHOLDER};
pub use report::{GroupOutcome, GroupReport, GroupWarning, RunReport, REJECTED_SAMPLE_SIZE};

use crate::anchor::place_org_below_anchor;
use crate::docx::Document;
use crate::error::{Error, Result};
use crate::extract::extract_style;
use crate::model::{AccountRecord, OrganizationGroup};
use crate::placeholder::replace_placeholder;
use crate::routing::{self, Partition};
use crate::table::rewrite_accounts_table;
use crate::tone::strategy_for;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds one notice per organization group from a template.
#[derive(Debug, Clone)]
pub struct NoticeAssembler {
    template: Vec<u8>,
    options: NoticeOptions,
}

impl NoticeAssembler {
    /// Create an assembler from template bytes.
    ///
    /// The template is parsed once up front so an unusable template fails
    /// here instead of once per group.
    pub fn new(template: Vec<u8>, options: NoticeOptions) -> Result<Self> {
        Document::from_bytes(&template)?;
        Ok(Self { template, options })
    }

    /// Create an assembler from a template file.
    pub fn from_template_path<P: AsRef<Path>>(path: P, options: NoticeOptions) -> Result<Self> {
        let template = fs::read(path.as_ref())?;
        Self::new(template, options)
    }

    /// Options in use.
    pub fn options(&self) -> &NoticeOptions {
        &self.options
    }

    /// A fresh copy of the template.
    pub fn load_template(&self) -> Result<Document> {
        Document::from_bytes(&self.template)
    }

    /// Build the notice for one group without saving it.
    pub fn build_notice(&self, group: &OrganizationGroup) -> Result<(Document, Vec<GroupWarning>)> {
        let mut doc = self.load_template()?;
        let mut warnings = Vec::new();
        // Auto tone reads the template wording, not the group's data.
        let tone = self.options.tone.resolve(&doc);

        let profile = extract_style(&doc, &self.options.style_defaults);
        log::debug!(
            "{}: font {} {}pt, widths {:?}",
            group.org_name,
            profile.font_name,
            profile.font_size,
            profile.column_widths
        );

        let replaced = replace_placeholder(&mut doc, &self.options.placeholder, &group.org_name);
        if replaced == 0 {
            log::warn!(
                "{}: placeholder '{}' not found in template",
                group.org_name,
                self.options.placeholder
            );
            warnings.push(GroupWarning::PlaceholderAbsent {
                placeholder: self.options.placeholder.clone(),
            });
        }

        rewrite_accounts_table(&mut doc, &profile, &group.records)?;
        place_org_below_anchor(&mut doc, &self.options.anchor, &group.org_name, &profile)?;

        let strategy = strategy_for(tone, &doc);
        let emphasized = strategy.emphasize(&mut doc);
        if emphasized > 0 {
            log::debug!("{}: {} emphasis on {} paragraphs", group.org_name, strategy.name(), emphasized);
        }

        Ok((doc, warnings))
    }

    /// Output path for a group.
    pub fn output_path(&self, group: &OrganizationGroup) -> PathBuf {
        self.options.output_dir.join(group.file_name())
    }

    /// Build and save the notice for one group.
    pub fn write_group(&self, group: &OrganizationGroup) -> Result<(PathBuf, Vec<GroupWarning>)> {
        let (doc, warnings) = self.build_notice(group)?;
        let path = self.output_path(group);
        doc.save(&path)?;
        log::info!("Wrote {} ({} records)", path.display(), group.len());
        Ok((path, warnings))
    }

    /// Validate, group and generate notices for `records`.
    pub fn run(&self, records: Vec<AccountRecord>) -> Result<RunReport> {
        self.run_with(records, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_group` after each group.
    pub fn run_with<F>(&self, records: Vec<AccountRecord>, on_group: F) -> Result<RunReport>
    where
        F: FnMut(&GroupReport),
    {
        let partition = routing::partition(records);
        self.run_partition(partition, on_group)
    }

    /// Generate notices for records that are already validated and grouped.
    pub fn run_partition<F>(&self, partition: Partition, mut on_group: F) -> Result<RunReport>
    where
        F: FnMut(&GroupReport),
    {
        let mut report = RunReport::new();
        report.rejected = partition.rejected;
        if !report.rejected.is_empty() {
            log::warn!(
                "{} records have invalid routing codes or empty fields",
                report.rejected.len()
            );
        }

        let output_dir = &self.options.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| Error::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;

        for group in &partition.groups {
            let outcome = match self.write_group(group) {
                Ok((path, warnings)) => GroupOutcome::Written { path, warnings },
                Err(e) => {
                    log::error!("{} ({}): {}", group.org_name, group.routing_code(), e);
                    GroupOutcome::Failed {
                        kind: e.failure_kind(),
                        message: e.to_string(),
                    }
                }
            };
            let entry = GroupReport {
                org_name: group.org_name.clone(),
                routing_prefix: group.routing_prefix.clone(),
                routing_code: group.routing_code().to_string(),
                record_count: group.len(),
                outcome,
            };
            on_group(&entry);
            report.groups.push(entry);
        }

        report.finished_at = Utc::now();
        log::info!("{}", report.summary());
        Ok(report)
    }
}
