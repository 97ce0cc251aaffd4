//! Deterministic company-name extraction from free-text queries.
//!
//! The original system let an LLM decide which company a query was about; here
//! the common phrasings are recognized directly. Matching is ASCII
//! case-insensitive on the keywords while the company name keeps its original
//! casing.

const LOOKUP_PREFIXES: [&str; 2] = ["get customer id for ", "customer id for "];
const DEAL_FOR_MARKER: &str = "deal for ";
const POSSESSIVE_MARKERS: [&str; 2] = ["'s deal", "\u{2019}s deal"];
const LEADING_VERBS: [&str; 6] = ["find ", "show me ", "show ", "get ", "fetch ", "lookup "];

/// Pull a company name out of a query, if one of the known phrasings matches.
///
/// Recognized shapes: "Get customer ID for X", "find the deal for X",
/// "Find X's deal", "Show me X's deal". Returns `None` for anything else; the
/// caller then passes the raw query through to the sales service unchanged.
pub fn extract_company(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();

    for prefix in LOOKUP_PREFIXES {
        if let Some(index) = lowered.find(prefix) {
            return clean_company(&trimmed[index + prefix.len()..]);
        }
    }

    for marker in POSSESSIVE_MARKERS {
        if let Some(index) = lowered.find(marker) {
            return clean_company(strip_leading_verbs(&trimmed[..index], &lowered[..index]));
        }
    }

    if let Some(index) = lowered.find(DEAL_FOR_MARKER) {
        return clean_company(&trimmed[index + DEAL_FOR_MARKER.len()..]);
    }

    None
}

/// The canonical lookup query the pipeline sends to the sales service. When no
/// company can be extracted the raw query goes through as-is.
pub fn lookup_query_for(query: &str) -> String {
    match extract_company(query) {
        Some(company) => format!("Get customer ID for {company}"),
        None => query.trim().to_string(),
    }
}

fn strip_leading_verbs<'a>(original: &'a str, lowered: &str) -> &'a str {
    let mut start = 0;
    loop {
        let remainder = &lowered[start..];
        let Some(verb) = LEADING_VERBS.iter().find(|verb| remainder.starts_with(**verb)) else {
            break;
        };
        start += verb.len();
    }
    &original[start..]
}

fn clean_company(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_end_matches(['.', '?', '!', ',']).trim_start_matches("the ");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_company, lookup_query_for};

    #[test]
    fn extracts_from_customer_id_request() {
        assert_eq!(
            extract_company("Get customer ID for CompanyABC").as_deref(),
            Some("CompanyABC")
        );
    }

    #[test]
    fn extracts_from_possessive_deal_request() {
        assert_eq!(extract_company("Find CompanyABC's deal").as_deref(), Some("CompanyABC"));
        assert_eq!(
            extract_company("Show me TechCorp Solutions's deal").as_deref(),
            Some("TechCorp Solutions")
        );
    }

    #[test]
    fn extracts_from_deal_for_phrase() {
        assert_eq!(
            extract_company("fetch the deal for Global Logistics Inc.").as_deref(),
            Some("Global Logistics Inc")
        );
    }

    #[test]
    fn keeps_original_casing() {
        assert_eq!(extract_company("find companyabc's deal").as_deref(), Some("companyabc"));
        assert_eq!(extract_company("FIND CompanyABC's deal").as_deref(), Some("CompanyABC"));
    }

    #[test]
    fn unknown_phrasing_yields_none() {
        assert_eq!(extract_company("what deals closed last week?"), None);
        assert_eq!(extract_company(""), None);
        assert_eq!(extract_company("find 's deal"), None);
    }

    #[test]
    fn lookup_query_is_canonical_when_company_is_known() {
        assert_eq!(
            lookup_query_for("Find CompanyABC's deal"),
            "Get customer ID for CompanyABC"
        );
    }

    #[test]
    fn lookup_query_passes_raw_text_through_otherwise() {
        assert_eq!(
            lookup_query_for("  which customers have open deals? "),
            "which customers have open deals?"
        );
    }
}
