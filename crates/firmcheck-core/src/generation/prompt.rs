use std::sync::LazyLock;

use regex::Regex;

use crate::error::GenerationError;
use crate::generation::client::{GenerationRequest, GenerationResponse, WiringRequest};
use crate::generation::flow::WiringSync;

/// A Markdown table header separator row, e.g. `|---|:---:|`.
static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\|?\s*:?-{3,}:?\s*\|").expect("valid table separator regex")
});

/// Text sent to the collaborator for a generation request.
///
/// Without context the user request goes out verbatim.
pub fn compose_prompt(request: &GenerationRequest) -> String {
    let Some(ctx) = &request.context else {
        return request.prompt.clone();
    };
    let hardware = if ctx.controls.is_empty() {
        "None defined".to_string()
    } else {
        serde_json::to_string_pretty(&ctx.controls).unwrap_or_default()
    };

    format!(
        "PROJECT CONTEXT:\n\
         --- CODE ---\n{code}\n\n\
         --- WIRING ---\n{wiring}\n\n\
         --- HARDWARE ---\n{hardware}\n\n\
         --- POWER ---\nSource: {power}\n\n\
         USER REQUEST:\n{prompt}\n\n\
         INSTRUCTION:\n\
         Update the project. The wiringInstructions MUST be a Markdown table.\n",
        code = ctx.code,
        wiring = ctx.wiring,
        power = ctx.battery_type,
        prompt = request.prompt,
    )
}

pub fn compose_wiring_prompt(request: &WiringRequest) -> String {
    let controls = serde_json::to_string(&request.controls).unwrap_or_default();
    format!(
        "Generate an expert Markdown wiring table for an Arduino project.\n\
         CODE: {code}\n\
         CONTROLS: {controls}\n\
         POWER: {power}\n\n\
         RULES:\n\
         1. Table columns: | Component | Arduino Pin | Description & Passive Components |\n\
         2. Identify PWM pins (3, 5, 6, 9, 10, 11) for analogWrite.\n\
         3. Suggest 220-330 ohm resistors for LEDs.\n\
         4. If using a high voltage source, mention voltage regulators.\n\
         5. Return ONLY the Markdown table.\n",
        code = request.code,
        power = request.battery_type,
    )
}

/// Parse a generation reply, tolerating Markdown code fences around the JSON.
pub fn parse_generation_response(text: &str) -> Result<GenerationResponse, GenerationError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    Ok(serde_json::from_str(cleaned.trim())?)
}

/// A reply without table syntax is a degraded result, not an error.
pub fn classify_wiring(text: &str) -> WiringSync {
    if TABLE_SEPARATOR.is_match(text) {
        WiringSync::Table(text.trim().to_string())
    } else {
        WiringSync::Degraded(text.trim().to_string())
    }
}
