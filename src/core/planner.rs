use crate::config::toml_config::LlmConfig;
use crate::domain::model::format_amount;
use crate::domain::ports::PlanGenerator;
use crate::utils::error::{Result, TravelError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const PLAN_TEMPLATE: &str = "
You are a travel expert. Plan a trip to {destination} on {dates} with a budget of ${budget}.
Provide a detailed itinerary including:
1. Best time to visit
2. Transportation options
3. Accommodation recommendations
4. Must-see attractions
5. Local cuisine to try
6. Estimated costs for each category
";

pub const PLAN_INPUT_VARIABLES: [&str; 3] = ["destination", "dates", "budget"];

/// 將三個變數代入行程提示模板
pub fn render_plan_prompt(destination: &str, dates: &str, budget: f64) -> String {
    let values = [destination.to_string(), dates.to_string(), format_amount(budget)];
    PLAN_INPUT_VARIABLES
        .iter()
        .zip(values)
        .fold(PLAN_TEMPLATE.to_string(), |prompt, (name, value)| {
            prompt.replace(&format!("{{{}}}", name), &value)
        })
}

/// Gemini `generateContent` client. One request per plan, never retried.
pub struct GeminiPlanGenerator {
    client: Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl GeminiPlanGenerator {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let api_key = config.resolve_api_key();

        if api_key.is_none() {
            tracing::warn!("No API key configured; plan generation will fail until one is set");
        }

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// 依 HTTP 狀態碼分類服務錯誤，訊息保留服務端原文
fn classify_failure(status: StatusCode, body: &str) -> TravelError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TravelError::AuthError {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => TravelError::RateLimitedError { message },
        _ => TravelError::ServiceError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl PlanGenerator for GeminiPlanGenerator {
    async fn generate(&self, destination: &str, dates: &str, budget: f64) -> Result<String> {
        let api_key = validate_required_field("GOOGLE_API_KEY", &self.api_key)?;
        let prompt = render_plan_prompt(destination, dates, budget);

        tracing::debug!("Requesting travel plan from model {}", self.config.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.build_request_body(&prompt))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Model response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            tracing::error!("Plan generation failed: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .into_text()
            .ok_or_else(|| TravelError::InvalidResponseError {
                message: "response contained no candidate text".to_string(),
            })?;

        tracing::info!("Received travel plan ({} characters)", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plan_prompt_substitutes_all_variables() {
        let prompt = render_plan_prompt("Paris", "May 5-9, 2025", 1000.0);

        assert!(prompt.contains("Plan a trip to Paris on May 5-9, 2025 with a budget of $1000."));
        assert!(prompt.contains("6. Estimated costs for each category"));
        for variable in PLAN_INPUT_VARIABLES {
            assert!(!prompt.contains(&format!("{{{}}}", variable)));
        }
    }

    #[test]
    fn test_render_plan_prompt_fractional_budget() {
        let prompt = render_plan_prompt("Lisbon", "June", 1250.5);
        assert!(prompt.contains("budget of $1250.50."));
    }

    #[test]
    fn test_into_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "# Day 1\n" }, { "text": "* Louvre" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("# Day 1\n* Louvre"));
    }

    #[test]
    fn test_into_text_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(response.into_text().is_none());

        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_classify_failure() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#;
        match classify_failure(StatusCode::TOO_MANY_REQUESTS, body) {
            TravelError::RateLimitedError { message } => {
                assert_eq!(message, "Resource has been exhausted")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, "denied"),
            TravelError::AuthError { status: 403, .. }
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            TravelError::ServiceError { status: 502, .. }
        ));
    }

    #[test]
    fn test_missing_api_key_fails_without_request() {
        let config = LlmConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            ..LlmConfig::default()
        };
        let generator = GeminiPlanGenerator {
            client: Client::new(),
            config,
            api_key: None,
        };

        let result = tokio_test::block_on(generator.generate("Paris", "May", 1000.0));
        assert!(matches!(
            result,
            Err(TravelError::MissingConfigError { field }) if field == "GOOGLE_API_KEY"
        ));
    }
}
