use std::ops::RangeInclusive;

/// Substrings (lower-case) that end parsing of a generation when seen on any line.
pub const HALLUCINATION_KEYWORDS: &[&str] = &[
    // fabricated nutrition metadata
    "warning",
    "calorie ratio",
    "calories from",
    "% calories",
    "percent calories",
    "caloric",
    "calorific",
    "calculated",
    "calculate",
    "rating:",
    "content:",
    "calibration:",
    "percentage:",
    "total",
    "information:",
    "density:",
    "per calorie",
    "based on",
    "adjust for",
    // echoed prompt and metadata tokens
    "meal_type",
    "cuisine:",
    "diet:",
    "###",
    "### instruction",
    "meal plan",
    "comment=",
    "comment:",
    // commentary
    "note:",
    "tip:",
    "variation:",
    "serving suggestion",
    // non-veg ingredients
    "chicken",
    "meat",
    "fish",
];

/// A step must mention one of these within its first characters.
pub const COOKING_VERBS: &[&str] = &[
    "add", "mix", "cook", "boil", "fry", "heat", "stir", "sauté", "simmer", "chop", "cut",
    "prepare", "season", "serve", "garnish", "blend", "roast", "grill", "steam",
];

/// Recipe names are cut at the first of these that leaves a usable prefix.
pub const NAME_DELIMITERS: &[&str] = &[",", "(", ":", ";", " -"];

/// Characters that mark a step as formatting debris when they appear near its start.
pub const WEIRD_STEP_CHARS: &[char] = &[')', ']', '}', '#', '%', ':'];

pub const FALLBACK_RECIPE_NAME: &str = "Indian Recipe (Generated)";

pub const FALLBACK_STEPS: &[&str] = &[
    "Recipe details could not be generated properly.",
    "Please try again with different ingredients or settings.",
];

pub const FALLBACK_CALORIES: &str = "450";

/// Vocabularies, limits and fallbacks used by the extractor.
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    pub hallucination_keywords: Vec<String>,
    pub cooking_verbs: Vec<String>,
    pub name_delimiters: Vec<String>,
    pub weird_step_chars: Vec<char>,
    /// Names shorter than this (in chars) are replaced by the fallback
    pub min_name_chars: usize,
    /// A delimiter only truncates the name when the text before it is longer than this
    pub min_name_prefix_chars: usize,
    /// Exclusive lower bound on step length in chars
    pub step_min_exclusive: usize,
    /// Exclusive upper bound on step length in chars
    pub step_max_exclusive: usize,
    /// How many leading chars of a step are searched for a cooking verb
    pub verb_window: usize,
    /// How many leading chars of a step are checked for formatting debris
    pub weird_char_window: usize,
    pub min_steps: usize,
    pub max_steps: usize,
    pub calorie_range: RangeInclusive<u32>,
    pub fallback_name: String,
    pub fallback_steps: Vec<String>,
    pub fallback_calories: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            hallucination_keywords: to_owned(HALLUCINATION_KEYWORDS),
            cooking_verbs: to_owned(COOKING_VERBS),
            name_delimiters: to_owned(NAME_DELIMITERS),
            weird_step_chars: WEIRD_STEP_CHARS.to_vec(),
            min_name_chars: 3,
            min_name_prefix_chars: 3,
            step_min_exclusive: 10,
            step_max_exclusive: 150,
            verb_window: 30,
            weird_char_window: 5,
            min_steps: 2,
            max_steps: 8,
            calorie_range: 50..=2000,
            fallback_name: FALLBACK_RECIPE_NAME.to_string(),
            fallback_steps: to_owned(FALLBACK_STEPS),
            fallback_calories: FALLBACK_CALORIES.to_string(),
        }
    }
}

impl ExtractionRules {
    /// First hallucination keyword contained in an already lower-cased line.
    pub fn hallucination_in(&self, lower: &str) -> Option<&str> {
        self.hallucination_keywords
            .iter()
            .find(|keyword| lower.contains(keyword.as_str()))
            .map(String::as_str)
    }

    pub fn has_cooking_verb(&self, step: &str) -> bool {
        let head: String = step.chars().take(self.verb_window).collect();
        let head = head.to_lowercase();
        self.cooking_verbs
            .iter()
            .any(|verb| head.contains(verb.as_str()))
    }

    pub fn has_weird_start(&self, step: &str) -> bool {
        step.chars()
            .take(self.weird_char_window)
            .any(|c| self.weird_step_chars.contains(&c))
    }

    pub fn step_length_ok(&self, step: &str) -> bool {
        let len = step.chars().count();
        len > self.step_min_exclusive && len < self.step_max_exclusive
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_satisfy_own_limits() {
        let rules = ExtractionRules::default();
        assert!(rules.fallback_name.chars().count() >= rules.min_name_chars);
        assert!(rules.fallback_steps.len() >= rules.min_steps);
        assert!(rules.fallback_steps.len() <= rules.max_steps);
        for step in &rules.fallback_steps {
            assert!(rules.step_length_ok(step), "{step}");
        }
        let calories: u32 = rules.fallback_calories.parse().unwrap();
        assert!(rules.calorie_range.contains(&calories));
    }

    #[test]
    fn test_hallucination_in() {
        let rules = ExtractionRules::default();
        assert_eq!(rules.hallucination_in("note: serve with rice"), Some("note:"));
        assert_eq!(rules.hallucination_in("add the chicken pieces"), Some("chicken"));
        assert_eq!(rules.hallucination_in("calories: 350 calories"), None);
        assert_eq!(rules.hallucination_in("heat oil in a kadai"), None);
    }

    #[test]
    fn test_cooking_verb_window() {
        let rules = ExtractionRules::default();
        assert!(rules.has_cooking_verb("Sauté the onions until golden brown"));
        assert!(rules.has_cooking_verb("In a large pan, heat the oil"));
        // verb only after the first 30 characters
        assert!(!rules.has_cooking_verb("Once everything looks quite ready, serve"));
    }

    #[test]
    fn test_weird_start() {
        let rules = ExtractionRules::default();
        assert!(rules.has_weird_start("Heat: the oil in a pan"));
        assert!(rules.has_weird_start("#Add salt and pepper"));
        assert!(!rules.has_weird_start("Heat the oil: medium flame"));
    }

    #[test]
    fn test_step_length_bounds_are_exclusive() {
        let rules = ExtractionRules::default();
        assert!(!rules.step_length_ok(&"a".repeat(10)));
        assert!(rules.step_length_ok(&"a".repeat(11)));
        assert!(rules.step_length_ok(&"a".repeat(149)));
        assert!(!rules.step_length_ok(&"a".repeat(150)));
    }
}
