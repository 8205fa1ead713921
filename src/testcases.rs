use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Fragments per logical test case: an expected value, an input value,
/// and one hidden fragment left over from the collapsed row state.
const WINDOW: usize = 3;

/// Expected value of one test case. The page renders some answers as
/// bare words (`True`, free text) that are not valid JSON, so those stay
/// raw strings; everything else is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    Json(Value),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expected>,
    pub name: String,
}

/// Pair a flat fragment sequence into test cases.
///
/// Fragments arrive in repeating `[expected, input, extra]` windows; the
/// extra entry is UI noise and is dropped. A sequence shorter than one
/// window pairs to nothing. A count that is not a multiple of the window
/// width means the page markup changed shape, so the leftovers are
/// reported loudly instead of silently shifting every later pair.
pub fn pair_fragments(fragments: &[String]) -> Vec<TestCase> {
    let leftover = fragments.len() % WINDOW;
    if leftover != 0 {
        warn!(
            "Fragment count {} is not a multiple of {WINDOW}; ignoring {leftover} trailing fragment(s), pairing may be incomplete",
            fragments.len()
        );
    }

    let mut cases = Vec::with_capacity(fragments.len() / WINDOW);
    for (i, window) in fragments.chunks_exact(WINDOW).enumerate() {
        let name = format!("Test Case {}", i + 1);

        let expected = match classify_expected(&window[0]) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{name}: unparseable expected value {:?}: {e}", window[0]);
                None
            }
        };
        let inputs = match serde_json::from_str(&window[1]) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{name}: unparseable inputs {:?}: {e}", window[1]);
                None
            }
        };

        cases.push(TestCase { inputs, expected, name });
    }
    cases
}

/// Decide how an expected fragment is typed: text whose first non-space
/// character is an ASCII letter is kept verbatim as a raw string, since
/// the page uses bare words where JSON has none (`True`, prose answers);
/// anything else must parse as JSON.
pub fn classify_expected(raw: &str) -> Result<Expected, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Ok(Expected::Raw(raw.to_string()));
    }
    serde_json::from_str(trimmed).map(Expected::Json)
}

// ── Tests ──
