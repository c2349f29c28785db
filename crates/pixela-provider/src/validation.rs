//! Plan-time validation of graph attributes against what Pixela accepts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Diagnostic;
use crate::graph_config::GraphConfig;

/// Colors Pixela can render a graph in
pub const GRAPH_COLORS: [&str; 6] = ["shibafu", "momiji", "sora", "ichou", "ajisai", "kuro"];

/// Quantity types of a graph
pub const GRAPH_TYPES: [&str; 2] = ["int", "float"];

/// Accepted `self_sufficient` policies
pub const SELF_SUFFICIENT_POLICIES: [&str; 3] = ["increment", "decrement", "none"];

static GRAPH_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]{1,16}$").expect("graph id pattern compiles"));

fn one_of(attribute: &str, value: &str, allowed: &[&str]) -> Option<Diagnostic> {
    if allowed.contains(&value) {
        return None;
    }
    Some(
        Diagnostic::error(format!("Invalid {} {:?}", attribute, value))
            .with_detail(format!("expected one of: {}", allowed.join(", ")))
            .with_attribute(attribute),
    )
}

fn non_empty(attribute: &str, value: &str) -> Option<Diagnostic> {
    if !value.trim().is_empty() {
        return None;
    }
    Some(Diagnostic::error(format!("{} must not be empty", attribute)).with_attribute(attribute))
}

/// Validate a config, returning one diagnostic per invalid attribute.
pub fn validate_graph_config(config: &GraphConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !GRAPH_ID_PATTERN.is_match(&config.graph_id) {
        diagnostics.push(
            Diagnostic::error(format!("Invalid graph_id {:?}", config.graph_id))
                .with_detail("graph_id must match ^[a-z][a-z0-9-]{1,16}$")
                .with_attribute("graph_id"),
        );
    }

    diagnostics.extend(non_empty("name", &config.name));
    diagnostics.extend(non_empty("unit", &config.unit));
    diagnostics.extend(one_of("type", &config.graph_type, &GRAPH_TYPES));
    diagnostics.extend(one_of("color", &config.color, &GRAPH_COLORS));
    diagnostics.extend(one_of(
        "self_sufficient",
        &config.self_sufficient,
        &SELF_SUFFICIENT_POLICIES,
    ));
    diagnostics.extend(non_empty("timezone", &config.timezone));

    diagnostics
}
