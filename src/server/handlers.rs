use super::{
    auth, cors,
    types::{HandlerError, MealForm},
};
use crate::{
    llm::{LlmClient, Part},
    meal,
};
use axum::{
    extract::{FromRequest, Request, State},
    http::{Method, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub secret_key: Arc<str>,
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(secret_key: impl Into<Arc<str>>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            secret_key: secret_key.into(),
            llm,
        }
    }
}

/// Identifies every food item in an uploaded photo.
pub async fn generate_meal_data(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, HandlerError> {
    if request.method() == Method::OPTIONS {
        return Ok(cors::preflight());
    }
    auth::authorize(request.headers(), &state.secret_key)?;

    let form = MealForm::from_request(request, &state).await?;
    let file = form
        .file
        .ok_or_else(|| HandlerError::bad_request("No file uploaded"))?;

    info!(
        file_name = file.file_name.as_deref().unwrap_or("unnamed"),
        size = file.data.len(),
        "Received meal image"
    );

    let mime_type = meal::normalize_image_mime_type(file.content_type.as_deref());
    let parts = vec![
        Part::image(mime_type, file.data),
        Part::text(meal::MEAL_ANALYSIS_PROMPT),
    ];

    complete(&state, parts).await
}

/// Re-estimates a single item the user relabelled, optionally with its photo.
pub async fn correct_meal_item(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, HandlerError> {
    if request.method() == Method::OPTIONS {
        return Ok(cors::preflight());
    }
    auth::authorize(request.headers(), &state.secret_key)?;

    let form = MealForm::from_request(request, &state).await?;
    let correction = form
        .correction()
        .ok_or_else(|| HandlerError::bad_request("Missing correction text"))?;

    info!(
        wrong_item = form.wrong_item.as_deref().unwrap_or("<none>"),
        correction,
        with_image = form.file.is_some(),
        "Correcting meal item"
    );

    let mut parts = vec![Part::text(meal::correction_prompt(
        form.wrong_item.as_deref(),
        correction,
    ))];
    if let Some(file) = form.file {
        let mime_type = meal::normalize_image_mime_type(file.content_type.as_deref());
        parts.push(Part::image(mime_type, file.data));
    }

    complete(&state, parts).await
}

async fn complete(state: &AppState, parts: Vec<Part>) -> Result<Response, HandlerError> {
    let text = state.llm.generate_content(parts).await.map_err(|e| {
        error!("Model request failed: {}", e);
        HandlerError::from(e)
    })?;

    let body = meal::strip_code_fences(&text);
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
