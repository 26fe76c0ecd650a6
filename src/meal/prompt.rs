/// Instruction sent alongside a meal photo.
pub const MEAL_ANALYSIS_PROMPT: &str = r#"
You are an expert nutritionist. Identify ALL distinct food items in this image.
Return ONLY a JSON LIST.
IMPORTANT: ESTIMATE values. Do NOT return 0.
Format:
[
    {
        "food_name": "Name",
        "serving_unit": "1 Unit",
        "calories_per_serving": 100,
        "protein_per_serving": 10,
        "carbs_per_serving": 10,
        "fat_per_serving": 5
    }
]
"#;

/// Builds the prompt for re-estimating a single item the user relabelled.
pub fn correction_prompt(wrong_item: Option<&str>, correction: &str) -> String {
    let context = match wrong_item.map(str::trim).filter(|item| !item.is_empty()) {
        Some(wrong_item) => format!(
            "The user identified: \"{}\" but said it is actually \"{}\".",
            wrong_item, correction
        ),
        None => format!("The user said this item is \"{}\".", correction),
    };

    format!(
        r#"
You are an expert nutritionist.
{context}
Please provide the nutritional info for 1 STANDARD SERVING of "{correction}".
IMPORTANT: ESTIMATE values. Do NOT return 0.
Return ONLY a raw JSON object with these keys:
"food_name", "serving_unit", "calories_per_serving", "protein_per_serving", "carbs_per_serving", "fat_per_serving".
"#
    )
}
