use axum::{
    async_trait,
    extract::{
        FromRequest, Multipart, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use thiserror::Error;

pub const FILE_FIELD: &str = "file";
pub const WRONG_ITEM_FIELD: &str = "wrong_item";
pub const CORRECTION_FIELD: &str = "correction";

/// Failure returned to the caller as a plain-text body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Update your app to use this feature.")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    /// The form body could not be read, e.g. `413` once it exceeds the body limit.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn invalid_form(status: StatusCode, detail: String) -> Self {
        Self::Rejected {
            status,
            message: format!("Invalid form data: {}", detail),
        }
    }
}

impl From<MultipartError> for HandlerError {
    fn from(e: MultipartError) -> Self {
        Self::invalid_form(e.status(), e.body_text())
    }
}

impl From<MultipartRejection> for HandlerError {
    fn from(e: MultipartRejection) -> Self {
        Self::invalid_form(e.status(), e.body_text())
    }
}

impl From<FormRejection> for HandlerError {
    fn from(e: FormRejection) -> Self {
        Self::invalid_form(e.status(), e.body_text())
    }
}

impl From<crate::Error> for HandlerError {
    fn from(e: crate::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Fields shared by both meal endpoints. Accepts `multipart/form-data` and
/// `application/x-www-form-urlencoded`; any other body yields an empty form.
#[derive(Debug, Clone, Default)]
pub struct MealForm {
    pub file: Option<UploadedFile>,
    pub wrong_item: Option<String>,
    pub correction: Option<String>,
}

impl MealForm {
    /// The `correction` field, treating blank text as missing.
    pub fn correction(&self) -> Option<&str> {
        self.correction
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    fn set_text_field(&mut self, name: &str, value: String) {
        match name {
            WRONG_ITEM_FIELD => self.wrong_item = Some(value),
            CORRECTION_FIELD => self.correction = Some(value),
            _ => {}
        }
    }

    /// A part counts as the upload only when it is named `file` and carries a
    /// filename. Its size does not matter, so a zero-byte file is still a file.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, HandlerError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field
                .file_name()
                .filter(|file_name| !file_name.is_empty())
                .map(str::to_string);

            match file_name {
                Some(file_name) if name == FILE_FIELD => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;

                    form.file = Some(UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        data: data.to_vec(),
                    });
                }
                None if name != FILE_FIELD => {
                    let value = field.text().await?;
                    form.set_text_field(&name, value);
                }
                // Other uploads, and the unnamed empty part browsers send when
                // nothing was picked.
                _ => {}
            }
        }

        Ok(form)
    }
}

#[async_trait]
impl<S> FromRequest<S> for MealForm
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let axum::Form(fields) =
                axum::Form::<HashMap<String, String>>::from_request(req, state).await?;

            let mut form = Self::default();
            for (name, value) in fields {
                form.set_text_field(&name, value);
            }
            return Ok(form);
        }

        Ok(Self::default())
    }
}
