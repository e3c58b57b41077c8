use crate::model::RecipeRequest;

/// The instruction template sent to the generation engine.
///
/// Loaded from `prompt.txt` at compile time. Contains `{{INGREDIENTS}}`,
/// `{{CUISINE}}`, `{{MEAL_TYPE}}` and `{{DIET}}` placeholders that are filled
/// by [`build_prompt`]. The template ends with the `Recipe Name:` marker so the
/// model continues directly into the recipe name.
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

/// Marker that separates the instruction from the model's answer.
pub const RESPONSE_MARKER: &str = "### Response:";

/// Marker that opens the recipe name line.
pub const RECIPE_NAME_MARKER: &str = "Recipe Name:";

const DIET_WHEN_UNSET: &str = "any";

/// Render the prompt for a request. Pure and total: the same request always
/// yields the same text.
pub fn build_prompt(request: &RecipeRequest) -> String {
    let ingredients = request.ingredients.join(", ");
    let diet = request.diet.as_deref().unwrap_or(DIET_WHEN_UNSET);

    render(RECIPE_PROMPT_TEMPLATE, |name| match name {
        "INGREDIENTS" => Some(ingredients.as_str()),
        "CUISINE" => Some(request.cuisine.as_str()),
        "MEAL_TYPE" => Some(request.meal_type.as_str()),
        "DIET" => Some(diet),
        _ => None,
    })
}

/// Single pass placeholder substitution. Values are never re-scanned, so a
/// caller-supplied `{{...}}` stays literal.
fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => match lookup(&after[..end]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str("{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
