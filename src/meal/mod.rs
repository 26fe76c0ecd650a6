//! Prompt construction and response cleanup for meal nutrition estimates.

mod prompt;
mod sanitize;

pub use prompt::{MEAL_ANALYSIS_PROMPT, correction_prompt};
pub use sanitize::{normalize_image_mime_type, strip_code_fences};
