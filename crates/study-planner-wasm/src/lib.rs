//! WASM bindings for study-planner.
//!
//! Exposes plan generation and candidate-slot inspection to JavaScript via
//! `wasm-bindgen`. Requests and results cross the boundary as JSON strings in
//! the same shape the `studyplan` CLI reads and writes.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p study-planner-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/study-planner-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/study_planner_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use study_planner::{CandidateSession, PlanRequest, PlannerConfig};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
    synthesized: bool,
}

impl From<&CandidateSession> for SlotDto {
    fn from(c: &CandidateSession) -> Self {
        Self {
            start: c.start.to_rfc3339(),
            end: c.end.to_rfc3339(),
            duration_minutes: c.duration_minutes(),
            synthesized: c.synthesized,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-03-02T07:00:00+00:00")
/// and naive local time (e.g., "2026-03-02T07:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_request(json: &str) -> Result<PlanRequest, String> {
    PlanRequest::from_json(json).map_err(|e| e.to_string())
}

fn plan_json(request_json: &str, now_iso: &str) -> Result<String, String> {
    let request = parse_request(request_json)?;
    let now = parse_datetime(now_iso)?;

    let plan = request
        .plan(now, &PlannerConfig::default())
        .map_err(|e| e.to_string())?;

    serde_json::to_string(&plan).map_err(|e| format!("Serialization error: {}", e))
}

fn slots_json(request_json: &str, now_iso: &str) -> Result<String, String> {
    let request = parse_request(request_json)?;
    let now = parse_datetime(now_iso)?;

    let slots = request
        .candidates(now, &PlannerConfig::default())
        .map_err(|e| e.to_string())?;
    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();

    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate a study plan.
///
/// `request_json` is a plan request (`user_id`, `target`, `preferences`,
/// `busy`, `recurring`). `now_iso` is the instant to plan from. Returns the
/// plan as a JSON string. Nothing is persisted; storing the plan is up to
/// the caller.
#[wasm_bindgen(js_name = "generatePlan")]
pub fn generate_plan(request_json: &str, now_iso: &str) -> Result<String, JsValue> {
    plan_json(request_json, now_iso).map_err(|e| JsValue::from_str(&e))
}

/// List the candidate study sessions for a request.
///
/// Returns a JSON array of `{start, end, duration_minutes, synthesized}`
/// objects, where `synthesized` marks fallback slots created because the
/// calendar had no free time in the study window.
#[wasm_bindgen(js_name = "candidateSlots")]
pub fn candidate_slots(request_json: &str, now_iso: &str) -> Result<String, JsValue> {
    slots_json(request_json, now_iso).map_err(|e| JsValue::from_str(&e))
}
