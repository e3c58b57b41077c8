use crate::extractors::ExtractionRules;
use crate::model::RecipeResponse;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const NAME_PREFIX: &str = "Recipe Name:";
const STEPS_MARKER: &str = "Steps:";
const CALORIES_PREFIX: &str = "Calories:";

fn digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"))
}

/// Parser position within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Looking for the name line or the steps marker
    Seeking,
    /// Collecting numbered steps
    InSteps,
    /// Calories line reached or hallucination seen; nothing more is read
    Done,
}

/// Where a field of the final recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Parsed,
    Fallback,
}

/// What happened while extracting one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub name: FieldSource,
    pub steps: FieldSource,
    pub calories: FieldSource,
    /// 1-based line number of the line that triggered a hallucination cut
    pub hallucination_line: Option<usize>,
    /// Candidate step lines that were dropped
    pub rejected_steps: usize,
}

/// Turns raw generated text into a fully populated [`RecipeResponse`].
///
/// The text is read once, line by line, and never fails: anything that cannot
/// be trusted is dropped and missing fields are filled from the rules' fallbacks.
pub struct GeneratedTextExtractor<'a> {
    rules: &'a ExtractionRules,
}

impl<'a> GeneratedTextExtractor<'a> {
    pub fn new(rules: &'a ExtractionRules) -> Self {
        Self { rules }
    }

    pub fn extract(&self, raw: &str) -> RecipeResponse {
        self.extract_with_report(raw).0
    }

    pub fn extract_with_report(&self, raw: &str) -> (RecipeResponse, ExtractionReport) {
        let rules = self.rules;
        let mut state = ParseState::Seeking;
        let mut name = String::new();
        let mut steps: Vec<String> = Vec::new();
        let mut calories: Option<String> = None;
        let mut hallucination_line = None;
        let mut rejected_steps = 0;

        for (index, line) in raw.lines().enumerate() {
            if state == ParseState::Done {
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let lower = line.to_lowercase();
            if let Some(keyword) = rules.hallucination_in(&lower) {
                debug!(
                    "Hallucination keyword '{}' on line {}, ignoring the rest",
                    keyword,
                    index + 1
                );
                hallucination_line = Some(index + 1);
                state = ParseState::Done;
                continue;
            }

            if line.starts_with(NAME_PREFIX) {
                name = self.clean_name(line);
            } else if line.starts_with(STEPS_MARKER) {
                state = ParseState::InSteps;
            } else if line.starts_with(CALORIES_PREFIX) {
                calories = extract_calories(line);
                state = ParseState::Done;
            } else if state == ParseState::InSteps {
                match self.accept_step(line) {
                    Some(step) => {
                        steps.push(step);
                        if steps.len() >= rules.max_steps {
                            state = ParseState::Done;
                        }
                    }
                    None => rejected_steps += 1,
                }
            }
        }

        let name_source = if name.chars().count() < rules.min_name_chars {
            debug!("Recipe name {:?} unusable, using fallback", name);
            name = rules.fallback_name.clone();
            FieldSource::Fallback
        } else {
            FieldSource::Parsed
        };

        let steps_source = if steps.len() < rules.min_steps {
            debug!("Only {} usable steps, using fallback steps", steps.len());
            steps = rules.fallback_steps.clone();
            FieldSource::Fallback
        } else {
            steps.truncate(rules.max_steps);
            FieldSource::Parsed
        };

        let (calories, calories_source) = match self.validate_calories(calories.as_deref()) {
            Some(value) => (value, FieldSource::Parsed),
            None => (rules.fallback_calories.clone(), FieldSource::Fallback),
        };

        let report = ExtractionReport {
            name: name_source,
            steps: steps_source,
            calories: calories_source,
            hallucination_line,
            rejected_steps,
        };

        (
            RecipeResponse {
                recipe_name: name,
                steps,
                calories,
            },
            report,
        )
    }

    /// Strip the prefix, cut trailing clauses at the earliest usable delimiter,
    /// and drop trailing punctuation.
    fn clean_name(&self, line: &str) -> String {
        let name = line.replace(NAME_PREFIX, "");
        let name = name.trim();

        let cut = self
            .rules
            .name_delimiters
            .iter()
            .filter_map(|delimiter| name.find(delimiter.as_str()))
            .filter(|&pos| name[..pos].trim().chars().count() > self.rules.min_name_prefix_chars)
            .min();

        let name = match cut {
            Some(pos) => name[..pos].trim(),
            None => name,
        };

        name.trim_end_matches(['.', ',', ';', ':', '!'])
            .trim_end()
            .to_string()
    }

    /// Clean numbering artifacts from a step line and keep it only if it reads
    /// like a cooking instruction.
    fn accept_step(&self, line: &str) -> Option<String> {
        let step = strip_step_prefix(line);
        if step.is_empty() || !self.rules.step_length_ok(step) {
            return None;
        }
        if !self.rules.has_cooking_verb(step) {
            return None;
        }
        if self.rules.hallucination_in(&step.to_lowercase()).is_some() {
            return None;
        }
        if self.rules.has_weird_start(step) {
            return None;
        }
        Some(step.to_string())
    }

    fn validate_calories(&self, calories: Option<&str>) -> Option<String> {
        let value: u32 = calories?.parse().ok()?;
        self.rules
            .calorie_range
            .contains(&value)
            .then(|| value.to_string())
    }
}

/// Drop a leading run of closing brackets, then list numbering.
fn strip_step_prefix(line: &str) -> &str {
    let without_brackets = line.trim_start_matches([')', ']', '}', '>']);
    let without_brackets = if without_brackets.len() != line.len() {
        without_brackets.trim_start()
    } else {
        without_brackets
    };

    without_brackets
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | ' ' | '-'))
        .trim()
}

/// First run of digits on a calories line, ignoring anything after a comma.
fn extract_calories(line: &str) -> Option<String> {
    let text = line.replace(CALORIES_PREFIX, "").replace("calories", "");
    let text = text.trim();
    let text = text.split(',').next().unwrap_or_default().trim();
    digits().find(text).map(|m| m.as_str().to_string())
}
