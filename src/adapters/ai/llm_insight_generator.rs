//! LLM-backed InsightGenerator.
//!
//! Prompts an `AIProvider` for a strict JSON document describing an industry,
//! then parses and validates it into `InsightContent`. Anything that does not
//! match the schema is reported as `GenerationError::MalformedOutput`.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::insight::{
    DemandLevel, IndustryKey, InsightContent, MarketOutlook, SalaryRange,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, GenerationError, InsightGenerator,
    MessageRole,
};

const SYSTEM_PROMPT: &str = "You are a labour-market analyst. \
Answer with a single JSON object and nothing else.";

pub struct LlmInsightGenerator {
    ai_provider: Arc<dyn AIProvider>,
    max_tokens: u32,
}

impl LlmInsightGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            ai_provider,
            max_tokens: 1500,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn create_prompt(industry: &IndustryKey) -> String {
        format!(
            r#"Analyze the current state of the {} industry and provide insights in ONLY the following JSON format:
{{
  "salaryRanges": [
    {{ "role": "string", "min": number, "max": number, "median": number, "location": "string" }}
  ],
  "growthRate": number,
  "demandLevel": "HIGH" | "MEDIUM" | "LOW",
  "topSkills": ["skill1", "skill2"],
  "marketOutlook": "POSITIVE" | "NEUTRAL" | "NEGATIVE",
  "keyTrends": ["trend1", "trend2"],
  "recommendedSkills": ["skill1", "skill2"]
}}

Include at least 5 common roles for salary ranges.
Growth rate should be a percentage.
Include at least 5 skills and trends."#,
            industry
        )
    }
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an info string such as "json".
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Wire shape requested from the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightWire {
    #[serde(default)]
    salary_ranges: Vec<SalaryRange>,
    growth_rate: f64,
    demand_level: String,
    #[serde(default)]
    top_skills: Vec<String>,
    market_outlook: String,
    #[serde(default)]
    key_trends: Vec<String>,
    #[serde(default)]
    recommended_skills: Vec<String>,
}

pub(crate) fn parse_insight(raw: &str) -> Result<InsightContent, GenerationError> {
    let wire: InsightWire = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| GenerationError::malformed(format!("invalid JSON: {}", e)))?;

    let demand_level: DemandLevel = wire
        .demand_level
        .parse()
        .map_err(|e| GenerationError::malformed(format!("{}", e)))?;
    let market_outlook: MarketOutlook = wire
        .market_outlook
        .parse()
        .map_err(|e| GenerationError::malformed(format!("{}", e)))?;

    let content = InsightContent {
        salary_ranges: wire.salary_ranges,
        growth_rate: wire.growth_rate,
        demand_level,
        top_skills: wire.top_skills,
        market_outlook,
        recommended_skills: wire.recommended_skills,
        key_trends: wire.key_trends,
    };
    content
        .validate()
        .map_err(|e| GenerationError::malformed(e.to_string()))?;
    Ok(content)
}

fn map_ai_error(err: AIError) -> GenerationError {
    match err {
        AIError::Timeout { timeout_secs } => GenerationError::Timeout {
            timeout_ms: u64::from(timeout_secs) * 1000,
        },
        other => GenerationError::provider(other.to_string()),
    }
}

#[async_trait]
impl InsightGenerator for LlmInsightGenerator {
    async fn generate(&self, industry: &IndustryKey) -> Result<InsightContent, GenerationError> {
        let request = CompletionRequest::new()
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, Self::create_prompt(industry))
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.2)
            .with_json_output()
            .with_request_id(format!("industry-insight-{}", uuid::Uuid::new_v4()));

        let response = self
            .ai_provider
            .complete(request)
            .await
            .map_err(map_ai_error)?;

        debug!(
            industry = %industry,
            model = %response.model,
            chars = response.content.len(),
            "received industry insight completion"
        );
        if response.finish_reason == FinishReason::Length {
            return Err(GenerationError::malformed(format!(
                "completion truncated at {} tokens",
                self.max_tokens
            )));
        }
        parse_insight(&response.content)
    }
}

/// Generator used when no AI provider is configured. Always fails, so every
/// new industry gets default content.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledInsightGenerator;

#[async_trait]
impl InsightGenerator for DisabledInsightGenerator {
    async fn generate(&self, _industry: &IndustryKey) -> Result<InsightContent, GenerationError> {
        Err(GenerationError::provider("insight generation is disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    const VALID: &str = r#"{
        "salaryRanges": [
            {"role": "Data Engineer", "min": 80000, "max": 150000, "median": 110000, "location": "US"}
        ],
        "growthRate": 8.5,
        "demandLevel": "HIGH",
        "topSkills": ["SQL", "Python"],
        "marketOutlook": "POSITIVE",
        "keyTrends": ["Lakehouse"],
        "recommendedSkills": ["dbt"]
    }"#;

    fn tech() -> IndustryKey {
        IndustryKey::new("Tech").unwrap()
    }

    #[test]
    fn strips_fenced_json() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {} "), "{}");
    }

    #[test]
    fn parses_valid_document() {
        let content = parse_insight(VALID).unwrap();
        assert_eq!(content.demand_level, DemandLevel::High);
        assert_eq!(content.market_outlook, MarketOutlook::Positive);
        assert_eq!(content.salary_ranges[0].role, "Data Engineer");
        assert_eq!(content.recommended_skills, vec!["dbt".to_string()]);
    }

    #[test]
    fn rejects_unknown_enum_value() {
        let raw = VALID.replace("\"HIGH\"", "\"EXTREME\"");
        assert!(matches!(
            parse_insight(&raw),
            Err(GenerationError::MalformedOutput(_))
        ));
    }

    #[test]
    fn rejects_missing_required_field() {
        let raw = r#"{"demandLevel": "LOW", "marketOutlook": "NEUTRAL"}"#;
        assert!(matches!(
            parse_insight(raw),
            Err(GenerationError::MalformedOutput(_))
        ));
    }

    #[test]
    fn rejects_inverted_salary_range() {
        let raw = VALID.replace("\"min\": 80000", "\"min\": 900000");
        assert!(parse_insight(&raw).is_err());
    }

    #[tokio::test]
    async fn generates_from_provider_output() {
        let provider = MockAIProvider::new().with_response(format!("```json\n{}\n```", VALID));
        let generator = LlmInsightGenerator::new(Arc::new(provider.clone()));

        let content = generator.generate(&tech()).await.unwrap();

        assert_eq!(content.growth_rate, 8.5);
        let call = &provider.get_calls()[0];
        assert!(call.json_output);
        assert!(call.messages[0].content.contains("Tech industry"));
    }

    #[tokio::test]
    async fn provider_timeout_maps_to_generation_timeout() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 3 });
        let generator = LlmInsightGenerator::new(Arc::new(provider));

        assert_eq!(
            generator.generate(&tech()).await,
            Err(GenerationError::Timeout { timeout_ms: 3000 })
        );
    }

    #[tokio::test]
    async fn truncated_completion_is_malformed_even_if_it_parses() {
        let provider = MockAIProvider::new().with_truncated_response(VALID);
        let generator = LlmInsightGenerator::new(Arc::new(provider)).with_max_tokens(200);

        assert_eq!(
            generator.generate(&tech()).await,
            Err(GenerationError::malformed("completion truncated at 200 tokens"))
        );
    }

    #[tokio::test]
    async fn disabled_generator_always_fails() {
        assert!(DisabledInsightGenerator.generate(&tech()).await.is_err());
    }
}
