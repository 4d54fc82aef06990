// ABOUTME: Equipment normalization, umbrella expansion, and name-based equipment inference
// ABOUTME: Ordered (patterns, label) table where the first matching rule wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{ExerciseRecord, SearchFilters};

/// Label used when no inference rule matches
pub const BODYWEIGHT_LABEL: &str = "Bodyweight";

/// One inference rule: any pattern found in the lowercase name yields `label`
#[derive(Debug, Clone, Copy)]
pub struct EquipmentRule {
    /// Lowercase substrings to look for in the exercise name
    pub patterns: &'static [&'static str],
    /// Equipment label assigned on match
    pub label: &'static str,
}

/// Most specific implements first; "rope" must stay behind cable and jump rope
pub const EQUIPMENT_INFERENCE_TABLE: &[EquipmentRule] = &[
    EquipmentRule {
        patterns: &["smith machine", "smith"],
        label: "Smith Machine",
    },
    EquipmentRule {
        patterns: &["trap bar", "hex bar"],
        label: "Trap Bar",
    },
    EquipmentRule {
        patterns: &["ez bar", "ez-bar", "ez barbell", "ez curl"],
        label: "EZ Barbell",
    },
    EquipmentRule {
        patterns: &["kettlebell"],
        label: "Kettlebell",
    },
    EquipmentRule {
        patterns: &["dumbbell"],
        label: "Dumbbell",
    },
    EquipmentRule {
        patterns: &["barbell"],
        label: "Barbell",
    },
    EquipmentRule {
        patterns: &["cable"],
        label: "Cable",
    },
    EquipmentRule {
        patterns: &["resistance band", "band"],
        label: "Resistance Band",
    },
    EquipmentRule {
        patterns: &["medicine ball", "med ball"],
        label: "Medicine Ball",
    },
    EquipmentRule {
        patterns: &["stability ball", "swiss ball", "exercise ball"],
        label: "Stability Ball",
    },
    EquipmentRule {
        patterns: &["bosu"],
        label: "Bosu Ball",
    },
    EquipmentRule {
        patterns: &["trx", "suspension"],
        label: "Suspension Trainer",
    },
    EquipmentRule {
        patterns: &["sled"],
        label: "Sled",
    },
    EquipmentRule {
        patterns: &["leg press", "hack squat", "machine", "lever"],
        label: "Machine",
    },
    EquipmentRule {
        patterns: &["pull-up", "pull up", "pullup", "chin-up", "chin up", "chinup"],
        label: "Pull-up Bar",
    },
    EquipmentRule {
        patterns: &["jump rope", "skipping rope"],
        label: "Jump Rope",
    },
    EquipmentRule {
        patterns: &["battle rope", "rope"],
        label: "Rope",
    },
];

const FULL_GYM: &[&str] = &[
    "barbell",
    "olympic barbell",
    "ez barbell",
    "trap bar",
    "dumbbell",
    "kettlebell",
    "cable",
    "machine",
    "leverage machine",
    "smith machine",
    "sled machine",
    "sled",
    "bench",
    "pull-up bar",
    "resistance band",
    "band",
    "medicine ball",
    "stability ball",
    "bosu ball",
    "suspension trainer",
    "rope",
    "jump rope",
    "weighted",
    "assisted",
    "roller",
    "wheel roller",
    "tire",
    "hammer",
];

const HOME_GYM: &[&str] = &[
    "dumbbell",
    "kettlebell",
    "resistance band",
    "band",
    "pull-up bar",
    "bench",
    "stability ball",
    "medicine ball",
    "jump rope",
    "suspension trainer",
];

/// Lowercase and drop everything that isn't alphanumeric
#[must_use]
pub fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Infer an equipment label from an exercise name
#[must_use]
pub fn infer_equipment(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    EQUIPMENT_INFERENCE_TABLE
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lower.contains(p)))
        .map_or(BODYWEIGHT_LABEL, |rule| rule.label)
}

/// Declared equipment, or the inferred label when the field is blank
#[must_use]
pub fn effective_equipment(record: &ExerciseRecord) -> String {
    record
        .declared_equipment()
        .map_or_else(|| infer_equipment(&record.name).to_owned(), ToOwned::to_owned)
}

/// Whether an equipment label means "no equipment"
#[must_use]
pub fn is_bodyweight(label: &str) -> bool {
    matches!(
        normalize_label(label).as_str(),
        "" | "bodyweight" | "none" | "noequipment"
    )
}

/// Normalized containment in either direction
#[must_use]
pub fn labels_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_label(a), normalize_label(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// The concrete equipment a user can use, after umbrella expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentSet {
    items: Vec<String>,
}

impl EquipmentSet {
    /// Expand user selections ("full gym", "home gym", "bodyweight only", concrete items)
    #[must_use]
    pub fn from_selections(selections: &[String]) -> Self {
        let mut items: Vec<String> = Vec::new();
        for selection in selections {
            let expanded: Vec<&str> = match normalize_label(selection).as_str() {
                "fullgym" | "gym" | "commercialgym" => FULL_GYM.to_vec(),
                "homegym" => HOME_GYM.to_vec(),
                "bodyweightonly" | "bodyweight" | "none" | "noequipment" | "" => Vec::new(),
                _ => vec![selection.as_str()],
            };
            for item in expanded {
                let normalized = normalize_label(item);
                if !normalized.is_empty() && !items.contains(&normalized) {
                    items.push(normalized);
                }
            }
        }
        Self { items }
    }

    /// Normalized concrete items (bodyweight is implicit and not listed)
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether an exercise needing `label` can be done with this set
    #[must_use]
    pub fn allows(&self, label: &str) -> bool {
        if is_bodyweight(label) {
            return true;
        }
        let needed = normalize_label(label);
        self.items
            .iter()
            .any(|have| needed.contains(have.as_str()) || have.contains(needed.as_str()))
    }
}

/// Whether a record passes equipment/body-part search filters
#[must_use]
pub fn matches_filters(record: &ExerciseRecord, filters: &SearchFilters) -> bool {
    let equipment_ok = filters.equipment.is_empty() || {
        let label = effective_equipment(record);
        filters.equipment.iter().any(|e| labels_match(e, &label))
    };
    let body_part_ok = filters.body_parts.is_empty()
        || filters
            .body_parts
            .iter()
            .any(|b| labels_match(b, &record.body_part));
    equipment_ok && body_part_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_table_first_match_wins() {
        assert_eq!(infer_equipment("Smith Machine Squat"), "Smith Machine");
        assert_eq!(infer_equipment("EZ Barbell Curl"), "EZ Barbell");
        assert_eq!(infer_equipment("Trap Bar Deadlift"), "Trap Bar");
        assert_eq!(infer_equipment("Kettlebell Goblet Squat"), "Kettlebell");
        assert_eq!(infer_equipment("Cable Rope Pushdown"), "Cable");
        assert_eq!(infer_equipment("Band Assisted Pull Up"), "Resistance Band");
        assert_eq!(infer_equipment("Chin-Up"), "Pull-up Bar");
        assert_eq!(infer_equipment("Jump Rope Double Unders"), "Jump Rope");
        assert_eq!(infer_equipment("Battle Rope Slams"), "Rope");
        assert_eq!(infer_equipment("Leg Press"), "Machine");
        assert_eq!(infer_equipment("Push Up"), BODYWEIGHT_LABEL);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Pull-Up Bar"), "pullupbar");
        assert_eq!(normalize_label("  Body Weight "), "bodyweight");
    }

    #[test]
    fn test_umbrella_expansion() {
        let home = EquipmentSet::from_selections(&["Home Gym".to_owned()]);
        assert!(home.allows("dumbbell"));
        assert!(home.allows("kettlebell"));
        assert!(!home.allows("barbell"));
        assert!(!home.allows("smith machine"));

        let full = EquipmentSet::from_selections(&["gym".to_owned()]);
        assert!(full.allows("barbell"));
        assert!(full.allows("leverage machine"));

        let none = EquipmentSet::from_selections(&["No Equipment".to_owned()]);
        assert!(none.items().is_empty());
        assert!(none.allows("body weight"));
        assert!(!none.allows("dumbbell"));
    }

    #[test]
    fn test_containment_either_direction() {
        let set = EquipmentSet::from_selections(&["Dumbbells".to_owned()]);
        assert!(set.allows("dumbbell"));
        let set = EquipmentSet::from_selections(&["band".to_owned()]);
        assert!(set.allows("Resistance Band"));
    }

    #[test]
    fn test_bodyweight_always_allowed() {
        let set = EquipmentSet::from_selections(&["barbell".to_owned()]);
        assert!(set.allows("Bodyweight"));
        assert!(set.allows(""));
    }
}
