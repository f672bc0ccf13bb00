//! Parameter extraction from free text.
//!
//! Two passes: a generic `key: value` / `key=value` capture, then domain
//! heuristics for appointment phrases. Domain keys win on collision since
//! they are more specific than the generic pass.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tools::ToolParams;

static KV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*[:=]\s*([^,\n]+)").expect("valid kv pattern"));

static APPOINTMENT_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:apt|appt|appointment)\s*id\s*(?:is\s*)?([a-z0-9_-]+)")
        .expect("valid appointment id pattern")
});

static TOMORROW_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"tomorrow(?:\s+at)?\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?)")
        .expect("valid relative time pattern")
});

/// Extracts candidate parameter values from a message.
pub fn extract_parameters(text: &str) -> ToolParams {
    let mut params = ToolParams::new();

    for captures in KV_PATTERN.captures_iter(text) {
        let key = captures[1].trim().to_string();
        let value = captures[2].trim().to_string();
        params.insert(key, value);
    }

    for (key, value) in extract_domain_parameters(text) {
        params.insert(key, value);
    }

    params
}

/// Domain heuristics: appointment identifiers and relative-time phrases.
fn extract_domain_parameters(text: &str) -> ToolParams {
    let lowered = text.to_lowercase();
    let mut params = ToolParams::new();

    if let Some(captures) = APPOINTMENT_ID_PATTERN.captures(&lowered) {
        params.insert("appointment_id".to_string(), captures[1].to_string());
    }

    if lowered.contains("same time tomorrow") {
        params.insert(
            "new_start_time".to_string(),
            "tomorrow same time".to_string(),
        );
    } else if let Some(captures) = TOMORROW_TIME_PATTERN.captures(&lowered) {
        params.insert(
            "new_start_time".to_string(),
            format!("tomorrow {}", captures[1].trim()),
        );
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_colon_separated_pairs() {
        let params = extract_parameters("patient_id: pat_001, provider_id: prov_1");

        assert_eq!(params.get("patient_id").map(String::as_str), Some("pat_001"));
        assert_eq!(params.get("provider_id").map(String::as_str), Some("prov_1"));
    }

    #[test]
    fn extracts_equals_separated_pairs() {
        let params = extract_parameters("location_id=loc_9");
        assert_eq!(params.get("location_id").map(String::as_str), Some("loc_9"));
    }

    #[test]
    fn value_runs_to_comma_or_end_of_line() {
        let params = extract_parameters("visit_reason: knee pain after running, patient_id: p1\nquery: labs");

        assert_eq!(
            params.get("visit_reason").map(String::as_str),
            Some("knee pain after running")
        );
        assert_eq!(params.get("patient_id").map(String::as_str), Some("p1"));
        assert_eq!(params.get("query").map(String::as_str), Some("labs"));
    }

    #[test]
    fn trims_whitespace_around_keys_and_values() {
        let params = extract_parameters("service_id :   svc_22  ");
        assert_eq!(params.get("service_id").map(String::as_str), Some("svc_22"));
    }

    #[test]
    fn recognizes_appointment_id_phrase() {
        for message in [
            "my appointment id is apt_555",
            "APT ID apt_555",
            "appt id is apt_555",
        ] {
            let params = extract_parameters(message);
            assert_eq!(
                params.get("appointment_id").map(String::as_str),
                Some("apt_555"),
                "message: {message}"
            );
        }
    }

    #[test]
    fn same_time_tomorrow_maps_to_symbolic_value() {
        let params = extract_parameters("move it to the same time tomorrow please");
        assert_eq!(
            params.get("new_start_time").map(String::as_str),
            Some("tomorrow same time")
        );
    }

    #[test]
    fn tomorrow_with_clock_time_is_normalized() {
        let params = extract_parameters("can we do tomorrow at 10:30am?");
        assert_eq!(
            params.get("new_start_time").map(String::as_str),
            Some("tomorrow 10:30am")
        );

        let params = extract_parameters("tomorrow 3pm works");
        assert_eq!(
            params.get("new_start_time").map(String::as_str),
            Some("tomorrow 3pm")
        );
    }

    #[test]
    fn domain_pass_overrides_generic_pass() {
        // The generic pass captures `new_start_time: whatever`; the more
        // specific domain value replaces it.
        let params = extract_parameters("new_start_time: whatever, same time tomorrow");
        assert_eq!(
            params.get("new_start_time").map(String::as_str),
            Some("tomorrow same time")
        );
    }

    #[test]
    fn empty_text_yields_no_parameters() {
        assert!(extract_parameters("").is_empty());
        assert!(extract_parameters("no structured data here").is_empty());
    }
}
