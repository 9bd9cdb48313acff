use async_trait::async_trait;
use tracing::info;

use crate::assistant::{EmailContext, GeneratedEmail, ProcurementAssistant};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CallOptions, LlmClient};
use crate::proposal::prompts::{EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM};
use crate::requirements::models::ExtractedRequirements;
use crate::requirements::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};

const EXTRACTION_OPTIONS: CallOptions = CallOptions {
    temperature: 0.2,
    max_tokens: 2000,
};

const EMAIL_OPTIONS: CallOptions = CallOptions {
    temperature: 0.3,
    max_tokens: 1500,
};

/// Assistant backed by the chat-completions API. One call per operation.
pub struct LlmAssistant {
    llm: LlmClient,
}

impl LlmAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProcurementAssistant for LlmAssistant {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn extract_requirements(
        &self,
        rfq_text: &str,
    ) -> Result<ExtractedRequirements, AppError> {
        let system = EXTRACTION_SYSTEM.replace("{json_only}", JSON_ONLY_INSTRUCTION);
        let prompt = EXTRACTION_PROMPT_TEMPLATE.replace("{rfq_text}", rfq_text);

        let requirements = self
            .llm
            .call_json::<ExtractedRequirements>(&prompt, &system, EXTRACTION_OPTIONS)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to extract requirements: {e}")))?;

        info!(
            "Extracted requirements '{}' with {} categories (model: {})",
            requirements.title,
            requirements.categories.len(),
            self.llm.model()
        );
        Ok(requirements)
    }

    async fn generate_email(&self, context: &EmailContext) -> Result<GeneratedEmail, AppError> {
        let system = EMAIL_SYSTEM.replace("{json_only}", JSON_ONLY_INSTRUCTION);
        let prompt = render_email_prompt(context);

        let email = self
            .llm
            .call_json::<GeneratedEmail>(&prompt, &system, EMAIL_OPTIONS)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to generate email: {e}")))?;

        if email.subject.trim().is_empty() || email.body.trim().is_empty() {
            return Err(AppError::Llm(
                "Failed to generate email: model returned an empty subject or body".to_string(),
            ));
        }
        Ok(email)
    }
}

fn render_email_prompt(context: &EmailContext) -> String {
    let specifications = if context.specifications.is_empty() {
        "- (none listed)".to_string()
    } else {
        context
            .specifications
            .iter()
            .map(|(label, value)| format!("- {label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    EMAIL_PROMPT_TEMPLATE
        .replace("{rfq_title}", &context.rfq_title)
        .replace("{rfq_description}", or_na(&context.rfq_description))
        .replace("{product_name}", &context.product_name)
        .replace("{product_category}", &context.product_category)
        .replace("{unit_price}", &format!("{:.2}", context.unit_price))
        .replace("{quantity}", &context.quantity.to_string())
        .replace("{total_price}", &format!("{:.2}", context.total_price))
        .replace("{match_score}", &format!("{:.1}", context.match_score))
        .replace("{specifications}", &specifications)
        .replace("{supplier_name}", &context.supplier_name)
        .replace(
            "{supplier_email}",
            or_na(context.supplier_email.as_deref().unwrap_or_default()),
        )
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> EmailContext {
        EmailContext {
            rfq_title: "School laptops".to_string(),
            rfq_description: String::new(),
            product_name: "ThinkPad E14".to_string(),
            product_category: "Laptops".to_string(),
            unit_price: 899.0,
            quantity: 25,
            total_price: 22475.0,
            match_score: 87.25,
            supplier_name: "TechPro Solutions".to_string(),
            supplier_email: None,
            specifications: vec![("Processor".to_string(), "Intel Core i5".to_string())],
        }
    }

    #[test]
    fn test_email_prompt_fills_every_placeholder() {
        let prompt = render_email_prompt(&context());
        assert!(!prompt.contains('{'), "unreplaced placeholder in:\n{prompt}");
        assert!(prompt.contains("Unit price: $899.00"));
        assert!(prompt.contains("Total price: $22475.00"));
        assert!(prompt.contains("Match score: 87.2/100") || prompt.contains("Match score: 87.3/100"));
        assert!(prompt.contains("- Processor: Intel Core i5"));
    }

    #[test]
    fn test_missing_description_and_contact_render_as_na() {
        let prompt = render_email_prompt(&context());
        assert!(prompt.contains("Description: N/A"));
        assert!(prompt.contains("Contact: N/A"));
    }

    #[test]
    fn test_extraction_system_prompt_embeds_json_instruction() {
        let system = EXTRACTION_SYSTEM.replace("{json_only}", JSON_ONLY_INSTRUCTION);
        assert!(system.contains("valid JSON only"));
        assert!(!system.contains("{json_only}"));
    }
}
