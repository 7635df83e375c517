//! Post-enrichment filtering of leads
//!
//! Three independent predicates, all combined with AND. A predicate left at
//! its zero value (false, 0, empty string) does not filter anything. The
//! filter is stable: surviving leads keep their relative order.

use crate::app::models::{EnrichedLead, LeadFilters};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Optional whitespace, optional sign, then ASCII digits
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+)").expect("leading integer pattern is valid")
});

/// Apply `filters` to `leads`, keeping the leads that pass every active predicate
///
/// # Arguments
///
/// * `leads` - Parsed enrichment output
/// * `filters` - Filter specification from the request
///
/// # Returns
///
/// The passing leads, cloned, in their original order
pub fn apply_lead_filters(leads: &[EnrichedLead], filters: &LeadFilters) -> Vec<EnrichedLead> {
    if filters.is_empty() {
        return leads.to_vec();
    }

    let location = filters.location.to_lowercase();

    let filtered: Vec<EnrichedLead> = leads
        .iter()
        .filter(|lead| passes_lead_filters(lead, filters, &location))
        .cloned()
        .collect();

    debug!(
        "Lead filtering complete: {} -> {} leads ({} filtered out)",
        leads.len(),
        filtered.len(),
        leads.len() - filtered.len()
    );

    filtered
}

/// Check a single lead; `location_lower` is the pre-lowercased location filter
fn passes_lead_filters(lead: &EnrichedLead, filters: &LeadFilters, location_lower: &str) -> bool {
    if filters.exclude_no_email && !lead.has_email() {
        return false;
    }

    if filters.min_reviews > 0 && parse_review_count(&lead.google_reviews) < filters.min_reviews {
        return false;
    }

    if !location_lower.is_empty()
        && !lead
            .company_location
            .to_lowercase()
            .contains(location_lower)
    {
        return false;
    }

    true
}

/// Parse the leading integer of a review count field
///
/// "128" and " 128 reviews" give 128, "1,204" gives 1. Text without a
/// leading integer, or one that overflows, gives 0.
pub fn parse_review_count(text: &str) -> i64 {
    LEADING_INTEGER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}
