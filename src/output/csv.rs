//! CSV output for subnet lists and expansion diagnostics.

use crate::models::SubnetDescriptor;
use crate::processing::LineDiagnostic;

const SUBNET_HEADER: &str = r#""cidr","network","broadcast","mask","first_host","last_host","total","usable","class","scope""#;
const DIAGNOSTIC_HEADER: &str = r#""line","kind","count","expected","valid","error""#;

/// Quote a field when it contains a comma or double quote.
///
/// Excel does not like spaces after the comma between fields, so rows are
/// joined with a bare comma.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| escape_csv_field(field))
        .collect::<Vec<String>>()
        .join(",")
}

/// Header plus one row per subnet.
pub fn subnets_csv(subnets: &[SubnetDescriptor]) -> String {
    let mut lines = vec![SUBNET_HEADER.to_string()];
    lines.extend(subnets.iter().map(|s| {
        csv_row(&[
            s.cidr.to_string(),
            s.network.to_string(),
            s.broadcast.to_string(),
            s.mask.to_string(),
            s.first_host.to_string(),
            s.last_host.to_string(),
            s.total_addresses.to_string(),
            s.usable_hosts.to_string(),
            s.class.to_string(),
            s.scope.to_string(),
        ])
    }));
    lines.join("\n") + "\n"
}

/// Header plus one row per expanded input line.
pub fn diagnostics_csv(diagnostics: &[LineDiagnostic]) -> String {
    let mut lines = vec![DIAGNOSTIC_HEADER.to_string()];
    lines.extend(diagnostics.iter().map(|d| {
        csv_row(&[
            d.line.clone(),
            d.kind.to_string(),
            d.count.to_string(),
            d.expected.to_string(),
            d.valid.to_string(),
            d.error.clone().unwrap_or_default(),
        ])
    }));
    lines.join("\n") + "\n"
}
