//! Builtin tool catalog for the care workflow domain.
//!
//! Every handler is a stub that returns a canned payload; the descriptors
//! (names, required parameters, keywords, schemas) are the real contract
//! the dispatcher works against. Real integrations replace the handlers
//! without touching the dispatch logic.

use serde_json::json;

use super::catalog::ToolCatalog;
use super::descriptor::ToolDescriptor;
use super::handler::{FnHandler, HandlerError, ToolParams};

fn ok(payload: serde_json::Value) -> Result<serde_json::Value, HandlerError> {
    Ok(json!({ "status": "ok", "data": payload }))
}

fn param(params: &ToolParams, key: &str) -> serde_json::Value {
    params.get(key).cloned().map_or(serde_json::Value::Null, serde_json::Value::String)
}

/// Builds the full builtin catalog.
///
/// Registration order matters: it fixes the ordering of score distributions
/// and of the tool list shown to the LLM backend.
pub fn builtin_catalog() -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    for descriptor in builtin_descriptors() {
        catalog
            .register(descriptor)
            .expect("builtin tool names are unique");
    }
    catalog
}

fn builtin_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "service_catalog_search",
            "Search the service catalog for available care services.",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." },
                    "patient_id": { "type": "string", "description": "Patient identifier." }
                },
                "required": ["query"]
            }),
            ["query"],
            ["service", "catalog", "find service", "visit type"],
            FnHandler(|_| ok(json!({ "results": ["Primary Care Visit", "Dermatology", "Therapy"] }))),
        ),
        ToolDescriptor::new(
            "provider_search",
            "Find clinicians by specialty, location, or preference.",
            json!({
                "type": "object",
                "properties": {
                    "specialty": { "type": "string", "description": "Provider specialty." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." },
                    "language": { "type": "string", "description": "Preferred language." },
                    "gender_preference": { "type": "string", "description": "Preferred gender." },
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." }
                },
                "required": ["specialty"]
            }),
            ["specialty"],
            ["provider", "doctor", "clinician", "specialist"],
            FnHandler(|_| ok(json!({ "providers": ["Dr. Patel", "Dr. Nguyen", "Dr. Chen"] }))),
        ),
        ToolDescriptor::new(
            "availability_search",
            "Check appointment slots for a provider and service.",
            json!({
                "type": "object",
                "properties": {
                    "provider_id": { "type": "string", "description": "Clinician identifier." },
                    "service_id": { "type": "string", "description": "Service or visit type identifier." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." },
                    "date_range_start": { "type": "string", "description": "Start date (YYYY-MM-DD)." },
                    "date_range_end": { "type": "string", "description": "End date (YYYY-MM-DD)." },
                    "time_of_day": { "type": "string", "description": "morning/afternoon/evening" }
                },
                "required": ["provider_id", "service_id"]
            }),
            ["provider_id", "service_id"],
            ["availability", "openings", "slots", "schedule"],
            FnHandler(|_| ok(json!({ "slots": ["2026-02-12T10:00:00", "2026-02-12T14:30:00"] }))),
        ),
        ToolDescriptor::new(
            "appointment_book",
            "Book an appointment for a patient.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Unique patient identifier." },
                    "provider_id": { "type": "string", "description": "Clinician identifier." },
                    "service_id": { "type": "string", "description": "Service or visit type identifier." },
                    "start_time": { "type": "string", "description": "ISO 8601 datetime." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." },
                    "visit_reason": { "type": "string", "description": "Short reason for visit." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." }
                },
                "required": ["patient_id", "provider_id", "service_id", "start_time", "location_id"]
            }),
            ["patient_id", "provider_id", "service_id", "start_time", "location_id"],
            ["book", "schedule appointment", "set up appointment"],
            FnHandler(|_| ok(json!({ "appointment_id": "apt_123", "status": "confirmed" }))),
        ),
        ToolDescriptor::new(
            "appointment_reschedule",
            "Reschedule an existing appointment.",
            json!({
                "type": "object",
                "properties": {
                    "appointment_id": { "type": "string", "description": "Appointment identifier." },
                    "new_start_time": { "type": "string", "description": "ISO 8601 datetime." },
                    "reason": { "type": "string", "description": "Reason for reschedule." }
                },
                "required": ["appointment_id", "new_start_time"]
            }),
            ["appointment_id", "new_start_time"],
            ["reschedule", "move appointment", "change appointment"],
            FnHandler(|params| {
                ok(json!({ "appointment_id": param(params, "appointment_id"), "status": "rescheduled" }))
            }),
        ),
        ToolDescriptor::new(
            "appointment_cancel",
            "Cancel an existing appointment.",
            json!({
                "type": "object",
                "properties": {
                    "appointment_id": { "type": "string", "description": "Appointment identifier." },
                    "reason": { "type": "string", "description": "Reason for cancellation." },
                    "cancel_mode": { "type": "string", "description": "patient/provider" }
                },
                "required": ["appointment_id"]
            }),
            ["appointment_id"],
            ["cancel appointment", "cancel visit", "cancel"],
            FnHandler(|params| {
                ok(json!({ "appointment_id": param(params, "appointment_id"), "status": "cancelled" }))
            }),
        ),
        ToolDescriptor::new(
            "dependent_add",
            "Add a dependent to a patient's account.",
            json!({
                "type": "object",
                "properties": {
                    "primary_patient_id": { "type": "string", "description": "Primary patient identifier." },
                    "dependent_first_name": { "type": "string", "description": "First name." },
                    "dependent_last_name": { "type": "string", "description": "Last name." },
                    "dob": { "type": "string", "description": "Date of birth (YYYY-MM-DD)." },
                    "relationship": { "type": "string", "description": "Relationship to primary patient." },
                    "gender": { "type": "string", "description": "Gender." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." }
                },
                "required": ["primary_patient_id", "dependent_first_name", "dependent_last_name", "dob", "relationship"]
            }),
            ["primary_patient_id", "dependent_first_name", "dependent_last_name", "dob", "relationship"],
            ["add dependent", "add child", "add spouse"],
            FnHandler(|_| ok(json!({ "dependent_id": "dep_456", "status": "added" }))),
        ),
        ToolDescriptor::new(
            "insurance_verify",
            "Verify insurance eligibility and coverage.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." },
                    "service_id": { "type": "string", "description": "Service identifier." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." }
                },
                "required": ["patient_id", "insurance_id"]
            }),
            ["patient_id", "insurance_id"],
            ["insurance", "coverage", "eligibility", "verify"],
            FnHandler(|_| ok(json!({ "eligible": true, "copay": "$25" }))),
        ),
        ToolDescriptor::new(
            "symptom_triage",
            "Provide basic triage routing based on symptoms.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "symptoms": { "type": "string", "description": "Symptom description." },
                    "duration": { "type": "string", "description": "How long symptoms have lasted." },
                    "age": { "type": "string", "description": "Patient age." },
                    "pregnant": { "type": "boolean", "description": "Pregnancy status." },
                    "severity": { "type": "string", "description": "mild/moderate/severe" },
                    "red_flags": { "type": "string", "description": "Any red flags." }
                },
                "required": ["patient_id", "symptoms", "duration"]
            }),
            ["patient_id", "symptoms", "duration"],
            ["symptom", "triage", "not feeling well", "sick"],
            FnHandler(|_| ok(json!({ "recommendation": "Primary care visit within 48 hours" }))),
        ),
        ToolDescriptor::new(
            "billing_estimate",
            "Estimate patient out-of-pocket costs.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "service_id": { "type": "string", "description": "Service identifier." },
                    "insurance_id": { "type": "string", "description": "Insurance plan identifier." },
                    "location_id": { "type": "string", "description": "Clinic/location identifier." },
                    "provider_id": { "type": "string", "description": "Provider identifier." }
                },
                "required": ["patient_id", "service_id", "insurance_id", "location_id"]
            }),
            ["patient_id", "service_id", "insurance_id", "location_id"],
            ["estimate", "cost", "billing", "price"],
            FnHandler(|_| {
                ok(json!({ "estimate": "$120", "breakdown": { "copay": "$25", "coinsurance": "$95" } }))
            }),
        ),
        ToolDescriptor::new(
            "prescription_refill",
            "Request a prescription refill.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "medication_name": { "type": "string", "description": "Medication name." },
                    "pharmacy_id": { "type": "string", "description": "Pharmacy identifier." },
                    "rx_number": { "type": "string", "description": "Prescription number." },
                    "dosage": { "type": "string", "description": "Dosage." },
                    "quantity": { "type": "string", "description": "Quantity." }
                },
                "required": ["patient_id", "medication_name"]
            }),
            ["patient_id", "medication_name"],
            ["refill", "prescription", "medication"],
            FnHandler(|_| ok(json!({ "refill_status": "submitted" }))),
        ),
        ToolDescriptor::new(
            "lab_results_get",
            "Retrieve lab results for a patient.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "date_range_start": { "type": "string", "description": "Start date (YYYY-MM-DD)." },
                    "date_range_end": { "type": "string", "description": "End date (YYYY-MM-DD)." },
                    "lab_test_name": { "type": "string", "description": "Lab test name." }
                },
                "required": ["patient_id"]
            }),
            ["patient_id"],
            ["lab results", "labs", "test results"],
            FnHandler(|_| {
                ok(json!({ "results": [{ "test": "A1C", "value": "6.1%", "date": "2026-01-10" }] }))
            }),
        ),
        ToolDescriptor::new(
            "referral_authorization",
            "Request authorization for a referral.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "referral_id": { "type": "string", "description": "Referral identifier." },
                    "service_id": { "type": "string", "description": "Service identifier." },
                    "provider_id": { "type": "string", "description": "Provider identifier." },
                    "diagnosis_code": { "type": "string", "description": "Diagnosis code." }
                },
                "required": ["patient_id", "referral_id"]
            }),
            ["patient_id", "referral_id"],
            ["referral", "authorization", "prior auth"],
            FnHandler(|_| ok(json!({ "authorization_status": "pending" }))),
        ),
        ToolDescriptor::new(
            "handoff_to_human",
            "Escalate the conversation to a human care coordinator.",
            json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient identifier." },
                    "summary": { "type": "string", "description": "Summary of the issue." },
                    "reason": { "type": "string", "description": "Why handoff is needed." },
                    "urgency": { "type": "string", "description": "low/medium/high" }
                },
                "required": ["patient_id", "summary"]
            }),
            ["patient_id", "summary"],
            ["human", "representative", "agent", "help"],
            FnHandler(|_| ok(json!({ "handoff_id": "handoff_789", "status": "queued" }))),
        ),
    ]
}
