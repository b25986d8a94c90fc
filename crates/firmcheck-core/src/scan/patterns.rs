use std::sync::LazyLock;

use regex::Regex;

static SETUP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsetup\s*\(\s*\)").expect("valid setup regex"));

static LOOP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bloop\s*\(\s*\)").expect("valid loop regex"));

static PIN_MODE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpinMode\s*\(").expect("valid pinMode regex"));

static PIN_MODE_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpinMode\s*\(\s*(\d+)\s*,\s*(?:OUTPUT|INPUT_PULLUP|INPUT)\s*\)")
        .expect("valid pinMode literal regex")
});

static INCLUDE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*include\b").expect("valid include regex"));

static SERIAL_INIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSerial\d?\s*\.\s*begin\b").expect("valid serial regex"));

/// `setup()` appears somewhere in the text.
pub fn has_setup(code: &str) -> bool {
    SETUP_MARKER.is_match(code)
}

/// `loop()` appears somewhere in the text.
pub fn has_loop(code: &str) -> bool {
    LOOP_MARKER.is_match(code)
}

/// Both entry-point markers are present.
pub fn has_entry_points(code: &str) -> bool {
    has_setup(code) && has_loop(code)
}

/// Number of `pinMode(` calls, whatever their arguments.
pub fn count_pin_mode_calls(code: &str) -> usize {
    PIN_MODE_CALL.find_iter(code).count()
}

/// Pin numbers configured with a literal, e.g. `pinMode(13, OUTPUT)`.
///
/// Returned in order of appearance, duplicates included. Calls using a named
/// constant (`pinMode(ledPin, OUTPUT)`) are not resolved.
pub fn configured_pins(code: &str) -> Vec<u32> {
    PIN_MODE_LITERAL
        .captures_iter(code)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// Number of `#include` directives.
pub fn count_includes(code: &str) -> usize {
    INCLUDE_DIRECTIVE.find_iter(code).count()
}

/// A `Serial.begin` call (or `Serial1.begin` etc.) is present.
pub fn has_serial_init(code: &str) -> bool {
    SERIAL_INIT.is_match(code)
}
