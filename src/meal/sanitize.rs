const FENCE: &str = "```";
const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Removes markdown code fences wrapped around the model's JSON.
///
/// Leading ```` ```json ```` (or a bare ```` ``` ````) and trailing ```` ``` ````
/// are stripped along with surrounding whitespace, repeatedly, so the result
/// is a fixed point: stripping it again changes nothing.
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.trim();

    loop {
        let stripped = strip_fence_once(current);
        if stripped.len() == current.len() {
            return current.to_string();
        }
        current = stripped;
    }
}

fn strip_fence_once(text: &str) -> &str {
    let mut rest = text;

    if let Some(after_fence) = rest.strip_prefix(FENCE) {
        rest = after_fence;
        if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            rest = &rest[4..];
        }
    }
    if let Some(before_fence) = rest.strip_suffix(FENCE) {
        rest = before_fence;
    }

    rest.trim()
}

/// Returns the upload's MIME type when it names an image, `image/jpeg` otherwise.
pub fn normalize_image_mime_type(content_type: Option<&str>) -> String {
    match content_type.map(str::trim) {
        Some(mime) if mime.to_ascii_lowercase().starts_with("image/") => mime.to_string(),
        _ => FALLBACK_IMAGE_MIME.to_string(),
    }
}
