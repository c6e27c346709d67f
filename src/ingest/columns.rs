//! Header detection for account listings.

use crate::error::{Error, Result};

/// Column an input header maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Account number
    AccountNumber,
    /// Account holder name
    HolderName,
    /// IFSC routing code
    RoutingCode,
}

impl Field {
    /// Classify a header. Each header maps to at most one field, checked
    /// in the order account number, holder name, routing code.
    pub fn classify(header: &str) -> Option<Field> {
        let h = normalize(header);
        let has = |needle: &str| h.contains(needle);

        let account_number = (has("account") && (has("number") || has("no") || has("#")))
            || ["a/c", "ac no", "acc no", "acno"].iter().any(|n| has(n));
        if account_number && !has("name") {
            return Some(Field::AccountNumber);
        }

        let holder_name = (has("account") && has("name"))
            || (has("name") && (has("beneficiary") || has("holder")))
            || (has("account") && has("holder"));
        if holder_name {
            return Some(Field::HolderName);
        }

        if has("ifsc") {
            return Some(Field::RoutingCode);
        }
        None
    }
}

fn normalize(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Positions of the three required columns in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Account number column
    pub account_number: usize,

    /// Holder name column
    pub holder_name: usize,

    /// Routing code column
    pub routing_code: usize,
}

impl ColumnMap {
    /// Detect the required columns. The first matching header wins for
    /// each field.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut account_number = None;
        let mut holder_name = None;
        let mut routing_code = None;

        for (idx, header) in headers.iter().enumerate() {
            let slot = match Field::classify(header.as_ref()) {
                Some(Field::AccountNumber) => &mut account_number,
                Some(Field::HolderName) => &mut holder_name,
                Some(Field::RoutingCode) => &mut routing_code,
                None => continue,
            };
            slot.get_or_insert(idx);
        }

        match (account_number, holder_name, routing_code) {
            (Some(account_number), Some(holder_name), Some(routing_code)) => {
                log::debug!(
                    "Detected columns: account={} name={} ifsc={}",
                    account_number,
                    holder_name,
                    routing_code
                );
                Ok(Self {
                    account_number,
                    holder_name,
                    routing_code,
                })
            }
            _ => Err(Error::MissingColumns {
                available: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
            }),
        }
    }
}
