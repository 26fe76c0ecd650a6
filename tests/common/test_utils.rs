use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use fitlens_functions::{
    config::{AuthConfig, Config, LlmConfig, LlmProvider, LogsConfig, ServerConfig, TimeoutsConfig},
    server::{self, AppState},
};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-app-secret";
pub const BOUNDARY: &str = "----fitlens-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            timeouts: TimeoutsConfig {
                generate_meal_data_secs: 60,
                correct_meal_item_secs: 30,
            },
        },
        auth: AuthConfig {
            secret_key: TEST_SECRET.to_string(),
        },
        llm: LlmConfig {
            provider: LlmProvider::VertexAi,
            project_id: "fitlens-test".to_string(),
            location: "us-central1".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            access_token: Some("ya29.test-token".to_string()),
            api_key: None,
        },
    }
}

/// Router wired to the given mock model
pub fn create_test_app(llm: MockLlmClient) -> Router {
    let config = create_test_config();
    let state = AppState::new(config.auth.secret_key.as_str(), Arc::new(llm));
    server::router(state, &config.server)
}

/// One part of a multipart/form-data body
pub enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart form, optionally carrying the app secret
pub fn multipart_request(uri: &str, secret: Option<&str>, parts: &[FormPart<'_>]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );

    if let Some(secret) = secret {
        builder = builder.header("X-App-Secret", secret);
    }

    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn image_part(content_type: Option<&str>) -> FormPart<'_> {
    FormPart::File {
        name: "file",
        file_name: "meal.jpg",
        content_type,
        data: b"\xFF\xD8\xFF\xE0fake-jpeg-bytes",
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sample fenced model output for a single-item meal
pub const FENCED_MEAL_RESPONSE: &str = "```json\n[\n  {\n    \"food_name\": \"Fried Egg\",\n    \"serving_unit\": \"1 egg\",\n    \"calories_per_serving\": 90,\n    \"protein_per_serving\": 6,\n    \"carbs_per_serving\": 1,\n    \"fat_per_serving\": 7\n  }\n]\n```";

pub const CLEAN_MEAL_RESPONSE: &str = "[\n  {\n    \"food_name\": \"Fried Egg\",\n    \"serving_unit\": \"1 egg\",\n    \"calories_per_serving\": 90,\n    \"protein_per_serving\": 6,\n    \"carbs_per_serving\": 1,\n    \"fat_per_serving\": 7\n  }\n]";
