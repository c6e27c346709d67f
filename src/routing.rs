//! Routing code validation, grouping and organization-name lookup.
//!
//! A routing code has the IFSC shape `XXXX0YYYYYY`: four characters naming
//! the bank, a literal `0`, and six characters naming the branch. Records
//! are grouped by the four-character prefix.

use crate::error::{Error, Result};
use crate::model::{AccountRecord, OrganizationGroup};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded prefix → organization name table.
const BANK_CODES_JSON: &str = include_str!("../data/bank_codes.json");

fn bank_codes() -> &'static HashMap<String, String> {
    static CODES: OnceLock<HashMap<String, String>> = OnceLock::new();
    CODES.get_or_init(|| {
        serde_json::from_str(BANK_CODES_JSON).unwrap_or_else(|e| {
            log::error!("Embedded bank code table is malformed: {}", e);
            HashMap::new()
        })
    })
}

fn routing_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{4}0[A-Z0-9]{6}$").expect("valid routing code regex"))
}

/// Check a routing code against the `XXXX0YYYYYY` shape.
pub fn is_valid_routing_code(code: &str) -> bool {
    routing_code_pattern().is_match(code)
}

/// Validate a record.
///
/// Fails with [`Error::FailsValidation`] when the routing code is malformed
/// or the account number or holder name is empty.
pub fn validate(record: &AccountRecord) -> Result<()> {
    let reason = if record.account_number.is_empty() {
        Some("account number is empty".to_string())
    } else if record.holder_name.is_empty() {
        Some("account name is empty".to_string())
    } else if !is_valid_routing_code(&record.routing_code) {
        Some(format!("malformed IFSC code '{}'", record.routing_code))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::FailsValidation {
            line: record.line,
            reason,
        }),
        None => Ok(()),
    }
}

/// Resolve the organization name for a routing prefix.
///
/// Unknown prefixes get a synthesized `"<PREFIX> BANK"` name.
pub fn resolve_org_name(prefix: &str) -> String {
    let prefix = prefix.to_uppercase();
    match bank_codes().get(&prefix) {
        Some(name) => name.clone(),
        None => {
            log::debug!("Unknown routing prefix {}, synthesizing a name", prefix);
            format!("{} BANK", prefix)
        }
    }
}

/// Group records by routing prefix.
///
/// Groups appear in order of each prefix's first occurrence, and records
/// keep their input order within a group.
pub fn group(records: impl IntoIterator<Item = AccountRecord>) -> Vec<OrganizationGroup> {
    let mut groups: Vec<OrganizationGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let prefix = record.routing_prefix().to_string();
        let slot = *index.entry(prefix.clone()).or_insert_with(|| {
            groups.push(OrganizationGroup::new(resolve_org_name(&prefix), prefix.clone()));
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

/// A record excluded by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// The offending record
    pub record: AccountRecord,

    /// Why it was rejected
    pub reason: String,
}

/// Valid records grouped, invalid ones set aside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Groups in first-appearance order
    pub groups: Vec<OrganizationGroup>,

    /// Records that failed validation, in input order
    pub rejected: Vec<RejectedRecord>,
}

impl Partition {
    /// Total number of valid records.
    pub fn valid_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }
}

/// Validate and group records in one pass.
pub fn partition(records: impl IntoIterator<Item = AccountRecord>) -> Partition {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for record in records {
        match validate(&record) {
            Ok(()) => valid.push(record),
            Err(e) => {
                log::warn!("Skipping record: {}", e);
                let reason = match e {
                    Error::FailsValidation { reason, .. } => reason,
                    other => other.to_string(),
                };
                rejected.push(RejectedRecord { record, reason });
            }
        }
    }

    Partition {
        groups: group(valid),
        rejected,
    }
}
