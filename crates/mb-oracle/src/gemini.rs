//! Gemini adapter — structured JSON generation over HTTPS

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::OracleConfig;
use crate::service::{OracleError, RecommendationService};
use crate::types::{Recommendation, RecommendationRequest, ShoppingItem};

/// Longest error body kept in an [`OracleError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Gemini `generateContent` client
pub struct GeminiService {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiService {
    /// Build a client. Fails with [`OracleError::Unavailable`] without a key.
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| OracleError::Unavailable("no API key configured".into()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl RecommendationService for GeminiService {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch(&self, request: &RecommendationRequest) -> Result<Recommendation, OracleError> {
        log::debug!(
            "[Gemini] Requesting lucky item for {:?} ({})",
            request.names(),
            request.language
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        parse_response(&payload)
    }
}

/// Curator prompt, answering in the request's language
pub fn build_prompt(request: &RecommendationRequest) -> String {
    let [tea, activity, perfume, flower] = request.names();
    format!(
        "You are a lifestyle curator. The user drew today's ritual combination: \
         tea \"{tea}\", activity \"{activity}\", scent \"{perfume}\", flower \"{flower}\". \
         Recommend exactly one premium, emotionally resonant 'lucky object' that suits this ritual. \
         Write itemName, itemPrice (a realistic price label in local currency) and itemReason \
         (one or two warm sentences) in {language}. searchKeyword must be a short shopping \
         search phrase for the item.",
        language = request.language.english_name(),
    )
}

/// JSON body with a response schema forcing the four required fields
pub fn request_body(request: &RecommendationRequest) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": build_prompt(request) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "itemName": { "type": "STRING" },
                    "itemPrice": { "type": "STRING" },
                    "itemReason": { "type": "STRING" },
                    "searchKeyword": { "type": "STRING" },
                    "itemImageUrl": { "type": "STRING" }
                },
                "required": ["itemName", "itemPrice", "itemReason", "searchKeyword"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the structured item from a `generateContent` response
pub fn parse_response(payload: &Value) -> Result<Recommendation, OracleError> {
    let response: GenerateResponse = serde_json::from_value(payload.clone())?;

    let text: String = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(OracleError::EmptyResponse);
    }

    let item: ShoppingItem = serde_json::from_str(text)
        .map_err(|e| OracleError::Malformed(format!("item JSON: {e}")))?;
    item.into_recommendation().map_err(OracleError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendationSource;
    use mb_core::Language;

    fn request() -> RecommendationRequest {
        RecommendationRequest::new(
            ["Peppermint", "Forest Walk", "Floral Bouquet", "Sunflower"],
            Language::En,
        )
    }

    #[test]
    fn test_prompt_mentions_all_items_and_language() {
        let req = request();
        let prompt = build_prompt(&req);
        for name in req.names() {
            assert!(prompt.contains(name));
        }
        assert!(prompt.contains("English"));
    }

    #[test]
    fn test_body_schema_requires_fields() {
        let body = request_body(&request());
        let required = &body["generationConfig"]["responseSchema"]["required"];
        assert_eq!(required.as_array().map(|a| a.len()), Some(4));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_parse_valid_response() {
        let inner = r#"{"itemName":"Brass Incense Holder","itemPrice":"$32","itemReason":"A calm anchor.","searchKeyword":"brass incense holder"}"#;
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": inner }] } }]
        });
        let rec = parse_response(&payload).unwrap();
        assert_eq!(rec.item_name, "Brass Incense Holder");
        assert_eq!(rec.source, RecommendationSource::Service);
    }

    #[test]
    fn test_parse_empty_response() {
        let payload = json!({ "candidates": [] });
        assert!(matches!(parse_response(&payload), Err(OracleError::EmptyResponse)));
    }

    #[test]
    fn test_parse_non_json_text() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "sorry, I can't" }] } }]
        });
        assert!(matches!(parse_response(&payload), Err(OracleError::Malformed(_))));
    }

    #[test]
    fn test_new_requires_key() {
        assert!(GeminiService::new(&OracleConfig::offline()).is_err());
        let service = GeminiService::new(&OracleConfig::offline().with_api_key("k")).unwrap();
        assert!(service.url().ends_with("/models/gemini-2.0-flash:generateContent"));
    }
}
