use std::panic::{self, AssertUnwindSafe};

use crate::features::NormalizedFeatures;

const MIN_PACE: f64 = 70.0;
const MIN_SHOOTING: f64 = 65.0;
const MIN_PASSING: f64 = 65.0;
const MIN_DEFENDING: f64 = 60.0;
const MIN_PHYSIC: f64 = 65.0;
const MIN_POTENTIAL: f64 = 50.0;
const MIN_SKILL_MOVES: f64 = 3.0;
const MAX_AGE: f64 = 34.0;

/// Emitted when a player was rejected but no single check fires.
pub const FALLBACK_REASON: &str =
    "No single weak area detected; overall stats may be below model threshold";

/// Explains a negative verdict with an ordered list of weak areas.
///
/// The list is advisory only: any fault during evaluation degrades to an
/// empty list rather than failing the request that asked for it.
pub fn ineligibility_reasons(features: &NormalizedFeatures) -> Vec<String> {
    panic::catch_unwind(AssertUnwindSafe(|| evaluate(features))).unwrap_or_default()
}

/// Checks run in a fixed order; callers compare the output positionally.
fn evaluate(f: &NormalizedFeatures) -> Vec<String> {
    let mut reasons = Vec::new();
    if f.pace < MIN_PACE {
        reasons.push("Low pace".to_string());
    }
    if f.shooting < MIN_SHOOTING {
        reasons.push("Low shooting".to_string());
    }
    if f.passing < MIN_PASSING {
        reasons.push("Low passing".to_string());
    }
    if f.defending < MIN_DEFENDING {
        reasons.push("Low defending".to_string());
    }
    if f.physic < MIN_PHYSIC {
        reasons.push("Low physicality".to_string());
    }
    if f.potential < MIN_POTENTIAL {
        reasons.push("Low potential".to_string());
    }
    if f.skill_moves < MIN_SKILL_MOVES {
        reasons.push("Low skill moves".to_string());
    }
    if f.age > MAX_AGE {
        reasons.push("Age may be high".to_string());
    }
    if f.body_type.to_lowercase().contains("fat") {
        reasons.push("Body type may affect performance".to_string());
    }
    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit_player() -> NormalizedFeatures {
        NormalizedFeatures {
            age: 25.0,
            weight_kg: 78.0,
            potential: 90.0,
            skill_moves: 5.0,
            work_rate: "High/ High".to_string(),
            body_type: "Lean".to_string(),
            pace: 90.0,
            shooting: 90.0,
            passing: 90.0,
            defending: 90.0,
            physic: 90.0,
            player_traits: String::new(),
        }
    }

    #[test]
    fn fit_player_gets_only_the_fallback_reason() {
        assert_eq!(ineligibility_reasons(&fit_player()), vec![FALLBACK_REASON]);
    }

    #[test]
    fn threshold_values_do_not_fire() {
        let mut f = fit_player();
        f.pace = 70.0;
        f.shooting = 65.0;
        f.passing = 65.0;
        f.defending = 60.0;
        f.physic = 65.0;
        f.potential = 50.0;
        f.skill_moves = 3.0;
        f.age = 34.0;
        assert_eq!(ineligibility_reasons(&f), vec![FALLBACK_REASON]);
    }

    #[test]
    fn single_weakness_yields_single_reason() {
        let mut f = fit_player();
        f.defending = 59.0;
        assert_eq!(ineligibility_reasons(&f), vec!["Low defending"]);
    }

    #[test]
    fn body_type_match_is_case_insensitive() {
        let mut f = fit_player();
        f.body_type = "FAT (normal/lean)".to_string();
        assert_eq!(
            ineligibility_reasons(&f),
            vec!["Body type may affect performance"]
        );
    }

    #[test]
    fn weak_everywhere_fires_every_check_in_order() {
        let f = NormalizedFeatures {
            age: 36.0,
            weight_kg: 0.0,
            potential: 40.0,
            skill_moves: 2.0,
            work_rate: "Unknown_Category".to_string(),
            body_type: "Fat (normal/lean)".to_string(),
            pace: 60.0,
            shooting: 60.0,
            passing: 60.0,
            defending: 50.0,
            physic: 60.0,
            player_traits: String::new(),
        };
        assert_eq!(
            ineligibility_reasons(&f),
            vec![
                "Low pace",
                "Low shooting",
                "Low passing",
                "Low defending",
                "Low physicality",
                "Low potential",
                "Low skill moves",
                "Age may be high",
                "Body type may affect performance",
            ]
        );
    }
}
