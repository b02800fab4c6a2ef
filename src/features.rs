use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category placeholder the downstream encoders were trained with.
pub const UNKNOWN_CATEGORY: &str = "Unknown_Category";

/// Attributes averaged into `potential` when the form leaves it blank.
const POTENTIAL_CONTRIBUTORS: [&str; 6] = [
    "pace",
    "shooting",
    "passing",
    "dribbling",
    "defending",
    "physic",
];

/// Fully-defaulted feature record sent to the prediction service.
///
/// Every field is always populated after [`normalize`]; nothing downstream
/// has to cope with a missing or null attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    pub age: f64,
    pub weight_kg: f64,
    pub potential: f64,
    pub skill_moves: f64,
    pub work_rate: String,
    pub body_type: String,
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub defending: f64,
    pub physic: f64,
    pub player_traits: String,
}

/// Maps an arbitrary form payload onto the fixed feature record.
///
/// Each field applies its own rule independently; there is no
/// cross-validation and no range clamping, so a pace of -50 or 9999 passes
/// through untouched. Legacy field names back the canonical ones
/// (`weight` for `weight_kg`, `dribbling` for `skill_moves`), absent or
/// empty values take their defaults, and a non-object payload behaves like
/// an empty form.
pub fn normalize(raw: &Value) -> NormalizedFeatures {
    NormalizedFeatures {
        age: pick_number(raw, &["age"]).unwrap_or(0.0),
        weight_kg: pick_number(raw, &["weight_kg", "weight"]).unwrap_or(0.0),
        potential: pick_number(raw, &["potential"]).unwrap_or_else(|| derived_potential(raw)),
        skill_moves: pick_number(raw, &["skill_moves", "dribbling"]).unwrap_or(0.0),
        work_rate: pick_text(raw, &["work_rate"]).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        body_type: pick_text(raw, &["body_type"]).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        pace: pick_number(raw, &["pace"]).unwrap_or(0.0),
        shooting: pick_number(raw, &["shooting"]).unwrap_or(0.0),
        passing: pick_number(raw, &["passing"]).unwrap_or(0.0),
        defending: pick_number(raw, &["defending"]).unwrap_or(0.0),
        physic: pick_number(raw, &["physic"]).unwrap_or(0.0),
        player_traits: pick_text(raw, &["player_traits"]).unwrap_or_default(),
    }
}

/// Mean of the six outfield attributes, read straight from the raw payload
/// so an explicitly submitted potential (even 0) is never second-guessed.
/// Missing contributors count as 0. Rounds half away from zero.
fn derived_potential(raw: &Value) -> f64 {
    let sum: f64 = POTENTIAL_CONTRIBUTORS
        .iter()
        .map(|key| pick_number(raw, &[*key]).unwrap_or(0.0))
        .sum();
    (sum / POTENTIAL_CONTRIBUTORS.len() as f64).round()
}

/// First key that holds a number or a finite numeric string. The empty
/// string, unparseable text, and non-finite parses ("nan", "inf") count as
/// absent, which is what lets the legacy key in `keys` take over. Keeping
/// non-finite values out also keeps the record serializable: serde_json
/// writes a NaN as null.
pub(crate) fn pick_number(raw: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        let Some(v) = raw.get(*key) else { continue };
        if let Some(n) = v.as_f64() {
            return Some(n);
        }
        if let Some(s) = v.as_str() {
            if let Ok(n) = s.trim().parse::<f64>() {
                if n.is_finite() {
                    return Some(n);
                }
            }
        }
    }
    None
}

/// First key that holds a non-empty string; numbers are stringified.
pub(crate) fn pick_text(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let Some(v) = raw.get(*key) else { continue };
        match v {
            Value::String(s) if !s.is_empty() => return Some(s.clone()),
            Value::Number(n) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}
