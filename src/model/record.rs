//! Account records and routing-code groups.

use serde::{Deserialize, Serialize};

/// One account row from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account number
    pub account_number: String,

    /// Account holder name
    pub holder_name: String,

    /// IFSC-style routing code (uppercased)
    pub routing_code: String,

    /// 1-based source row, 0 when not read from a file
    pub line: usize,
}

impl AccountRecord {
    /// Create a record. Fields are trimmed and the routing code uppercased.
    pub fn new(
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        routing_code: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into().trim().to_string(),
            holder_name: holder_name.into().trim().to_string(),
            routing_code: routing_code.into().trim().to_uppercase(),
            line: 0,
        }
    }

    /// Set the source row and return self.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// First four characters of the routing code.
    pub fn routing_prefix(&self) -> &str {
        self.routing_code
            .char_indices()
            .nth(4)
            .map(|(i, _)| &self.routing_code[..i])
            .unwrap_or(&self.routing_code)
    }

    /// Cell values in accounts-table column order.
    pub fn cells(&self) -> [&str; 3] {
        [&self.account_number, &self.holder_name, &self.routing_code]
    }
}

/// Valid records sharing a routing-code prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationGroup {
    /// Resolved organization name
    pub org_name: String,

    /// First four characters of the routing code
    pub routing_prefix: String,

    /// Records in input order
    pub records: Vec<AccountRecord>,
}

impl OrganizationGroup {
    /// Create an empty group.
    pub fn new(org_name: impl Into<String>, routing_prefix: impl Into<String>) -> Self {
        Self {
            org_name: org_name.into(),
            routing_prefix: routing_prefix.into(),
            records: Vec::new(),
        }
    }

    /// Routing code of the first record, used to name the output.
    pub fn routing_code(&self) -> &str {
        self.records
            .first()
            .map(|r| r.routing_code.as_str())
            .unwrap_or(&self.routing_prefix)
    }

    /// Number of records in the group.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the group has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output file name: `Notice_<ORG_NAME>_<ROUTING_CODE>.docx`.
    ///
    /// Spaces are kept; characters that are not valid in file names on
    /// common platforms are replaced with `_`.
    pub fn file_name(&self) -> String {
        let raw = format!(
            "Notice_{}_{}.docx",
            self.org_name.to_uppercase(),
            self.routing_code()
        );
        raw.chars()
            .map(|c| match c {
                '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    }
}
