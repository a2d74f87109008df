//! Terminal output.
//!
//! Renders expansion results and subnet calculations as text. Addresses are
//! plain lines; summaries are `#` prefixed and colored.

use crate::models::SubnetDescriptor;
use crate::processing::{DerivedView, ExpandResult, LineDiagnostic, SubnetCalculation};
use colored::Colorize;
use std::fmt::Write;

/// Width of the label column in subnet tables.
const LABEL_WIDTH: usize = 18;

/// One address per line.
pub fn render_addresses(result: &ExpandResult) -> String {
    let mut out = String::new();
    for addr in &result.addresses {
        let _ = writeln!(out, "{addr}");
    }
    out
}

/// Per-line diagnostics and totals for an expansion.
pub fn render_expand_summary(result: &ExpandResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {lines} lines: {valid} valid, {invalid} invalid; {count} addresses in {groups} /24 networks",
        lines = result.diagnostics.len(),
        valid = result.valid_lines(),
        invalid = result.invalid_lines(),
        count = result.addresses.len(),
        groups = result.network_groups(),
    );
    for diagnostic in &result.diagnostics {
        let _ = writeln!(out, "{}", render_diagnostic(diagnostic));
    }
    if result.truncated {
        let _ = writeln!(
            out,
            "#{}# output capped, some addresses were not listed",
            "NOTE".on_red()
        );
    }
    out
}

fn render_diagnostic(d: &LineDiagnostic) -> String {
    let status = if d.valid {
        format!("{:<7}", "ok").green()
    } else {
        format!("{:<7}", "invalid").red()
    };
    let mut line = format!(
        "# {status} {kind:<6} {count:>8}/{expected:<10} {text}",
        kind = d.kind.to_string(),
        count = d.count,
        expected = d.expected,
        text = d.line,
    );
    if let Some(error) = &d.error {
        let _ = write!(line, " ({})", error.yellow());
    }
    line
}

fn format_row(label: &str, value: impl ToString) -> String {
    format!("{label:<LABEL_WIDTH$} {}", value.to_string())
}

/// Label/value table for one descriptor.
pub fn render_descriptor(d: &SubnetDescriptor) -> String {
    [
        format_row("Address", d.address),
        format_row("Network", d.network),
        format_row("Broadcast", d.broadcast),
        format_row("CIDR", d.cidr),
        format_row("Subnet mask", d.mask),
        format_row("Wildcard mask", d.wildcard),
        format_row("Binary mask", &d.binary_mask),
        format_row("First host", d.first_host),
        format_row("Last host", d.last_host),
        format_row("Total addresses", d.total_addresses),
        format_row("Usable hosts", d.usable_hosts),
        format_row("Class", d.class),
        format_row("Scope", d.scope),
    ]
    .join("\n")
}

/// Descriptor table followed by the derived view, if any.
pub fn render_calculation(calc: &SubnetCalculation) -> String {
    let mut out = render_descriptor(&calc.subnet);
    out.push('\n');
    match &calc.derived {
        DerivedView::Basic => {}
        DerivedView::Divided(children) if children.is_empty() => {
            let _ = writeln!(
                out,
                "\n{}",
                format!("{} cannot be divided as requested", calc.subnet.cidr).red()
            );
        }
        DerivedView::Divided(children) => {
            let _ = writeln!(out, "\n{} subnets:", children.len().to_string().bold());
            for (i, child) in children.iter().enumerate() {
                let _ = writeln!(out, "{:>4}. {child}", i + 1);
            }
        }
        DerivedView::Merged(Some(supernet)) => {
            let _ = writeln!(out, "\n{}", "Supernet:".bold());
            let _ = writeln!(out, "{}", render_descriptor(supernet));
        }
        DerivedView::Merged(None) => {
            let _ = writeln!(
                out,
                "\n{}",
                format!("{} cannot be merged further", calc.subnet.cidr).red()
            );
        }
    }
    out
}
