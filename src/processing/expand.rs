//! Range expansion.
//!
//! Turns free-form text, one address, range or CIDR block per line, into a
//! flat list of addresses capped at [`ExpandOptions::max_total`], with one
//! diagnostic per input line.

use crate::config::DEFAULT_MAX_TOTAL;
use crate::models::{format_address, AddressRangeSpec, LineKind};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Order of the expanded address list.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Default, Serialize)]
pub enum SortOrder {
    /// Encounter order.
    #[default]
    #[serde(rename = "original")]
    Original,
    /// Numeric order, lowest address first.
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(SortOrder::Original),
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!(
                "unknown sort order '{other}', expected original, asc or desc"
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let order = match self {
            SortOrder::Original => "original",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        write!(f, "{order}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Cap on the total number of addresses, across all lines.
    pub max_total: usize,
    /// Drop repeated addresses, keeping the first occurrence.
    pub deduplicate: bool,
    pub sort_order: SortOrder,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            max_total: DEFAULT_MAX_TOTAL,
            deduplicate: false,
            sort_order: SortOrder::Original,
        }
    }
}

/// Outcome of one input line.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// The trimmed input line.
    pub line: String,
    pub kind: LineKind,
    /// Addresses this line added to the output (0 once the cap is reached).
    pub count: usize,
    /// Addresses the line describes, ignoring the cap.
    pub expected: u64,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandResult {
    pub addresses: Vec<Ipv4Addr>,
    pub diagnostics: Vec<LineDiagnostic>,
    /// Set when the cap cut off at least one address.
    pub truncated: bool,
}

impl ExpandResult {
    pub fn valid_lines(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.valid).count()
    }

    pub fn invalid_lines(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.valid).count()
    }

    /// Number of distinct /24 networks among the expanded addresses.
    pub fn network_groups(&self) -> usize {
        self.addresses
            .iter()
            .map(|addr| u32::from(*addr) & 0xFFFF_FF00)
            .unique()
            .count()
    }

    pub fn address_strings(&self) -> Vec<String> {
        self.addresses
            .iter()
            .map(|addr| format_address(u32::from(*addr)))
            .collect()
    }
}

/// Expand every line of `text` into addresses.
///
/// The cap is checked while enumerating, so a `/0` block never materializes
/// more than `max_total` entries. Bad lines are reported and skipped.
pub fn expand_ranges(text: &str, options: &ExpandOptions) -> ExpandResult {
    log::debug!(
        "#Start expand_ranges() max_total={} dedup={} sort={}",
        options.max_total,
        options.deduplicate,
        options.sort_order
    );

    let mut addresses: Vec<u32> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut truncated = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let diagnostic = match AddressRangeSpec::parse(line) {
            Ok(spec) => {
                let remaining = options.max_total.saturating_sub(addresses.len());
                let before = addresses.len();
                addresses.extend(spec.iter().take(remaining));
                let count = addresses.len() - before;

                if (count as u64) < spec.count() {
                    truncated = true;
                    log::warn!(
                        "Line '{line}' capped at {count} of {} addresses (max_total={})",
                        spec.count(),
                        options.max_total
                    );
                }
                log::trace!("Line '{line}' -> {spec} ({count} addresses)");

                LineDiagnostic {
                    line: line.to_string(),
                    kind: spec.kind(),
                    count,
                    expected: spec.count(),
                    valid: true,
                    error: None,
                }
            }
            Err(e) => {
                log::warn!("Skipping invalid line '{line}': {e}");
                LineDiagnostic {
                    line: line.to_string(),
                    kind: LineKind::classify(line),
                    count: 0,
                    expected: 0,
                    valid: false,
                    error: Some(e.to_string()),
                }
            }
        };
        diagnostics.push(diagnostic);
    }

    if options.deduplicate {
        addresses = addresses.into_iter().unique().collect();
    }

    // u32 order, never dotted-decimal string order
    match options.sort_order {
        SortOrder::Original => {}
        SortOrder::Ascending => addresses.sort_unstable(),
        SortOrder::Descending => addresses.sort_unstable_by(|a, b| b.cmp(a)),
    }

    if addresses.len() > options.max_total {
        addresses.truncate(options.max_total);
        truncated = true;
    }

    let result = ExpandResult {
        addresses: addresses.into_iter().map(Ipv4Addr::from).collect(),
        diagnostics,
        truncated,
    };
    log::info!(
        "Expanded {} lines ({} invalid) into {} addresses",
        result.diagnostics.len(),
        result.invalid_lines(),
        result.addresses.len()
    );
    result
}
