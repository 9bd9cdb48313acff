use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::assistant::{EmailContext, GeneratedEmail, ProcurementAssistant};
use crate::errors::AppError;
use crate::requirements::models::{
    AwardCriteria, ExtractedRequirements, LaptopRequirements, MonitorRequirements,
};

/// Fixture-backed assistant for demos and offline development. Sleeps for the
/// configured delay so the client sees realistic latency.
pub struct DemoAssistant {
    delay: Duration,
}

impl DemoAssistant {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ProcurementAssistant for DemoAssistant {
    fn backend(&self) -> &'static str {
        "demo"
    }

    async fn extract_requirements(
        &self,
        rfq_text: &str,
    ) -> Result<ExtractedRequirements, AppError> {
        tokio::time::sleep(self.delay).await;
        info!("Demo mode: returning fixture requirements ({} chars of input ignored)", rfq_text.len());
        Ok(school_equipment_requirements())
    }

    async fn generate_email(&self, context: &EmailContext) -> Result<GeneratedEmail, AppError> {
        tokio::time::sleep(self.delay).await;
        Ok(templated_email(context))
    }
}

/// High-school computer lab RFQ: 25 laptops and 25 monitors.
pub fn school_equipment_requirements() -> ExtractedRequirements {
    let text = |s: &str| Some(s.to_string());
    ExtractedRequirements {
        title: "Computer Equipment RFQ".to_string(),
        description: text("High School Computer Class Equipment"),
        categories: vec!["Laptops".to_string(), "Monitors".to_string()],
        laptops: Some(LaptopRequirements {
            quantity: 25,
            os: text("Windows 11 Pro"),
            processor: text("Intel Core i5 12th Gen or higher"),
            memory: text("16 GB DDR4"),
            storage: text("512 GB SSD"),
            display: text("15.6 inch Full HD (1920x1080)"),
            battery: text("6+ hours battery life"),
            durability: text("MIL-STD-810G tested"),
            connectivity: text("USB 3.0, HDMI, Wi-Fi 6"),
            warranty: text("3 years warranty"),
        }),
        monitors: Some(MonitorRequirements {
            quantity: 25,
            screen_size: text("24 inch"),
            resolution: text("1920x1080 Full HD"),
            panel_tech: text("IPS"),
            brightness: text("250 nits"),
            contrast_ratio: text("1000:1"),
            connectivity: text("HDMI, DisplayPort"),
            adjustability: text("Height, tilt, and swivel adjustable"),
            warranty: text("3 years warranty"),
        }),
        ai_hardware: None,
        criteria: AwardCriteria::general_default(),
    }
}

fn templated_email(context: &EmailContext) -> GeneratedEmail {
    let mut body = format!(
        "Dear {supplier} Team,\n\n\
         We are reviewing quotations for our RFQ \"{title}\" and your {product} has been \
         shortlisted with a match score of {score:.1}/100.\n\n\
         We would like to request a formal quotation for {quantity} unit(s) at the listed \
         unit price of ${unit:.2}, for an estimated total of ${total:.2}.\n",
        supplier = context.supplier_name,
        title = context.rfq_title,
        product = context.product_name,
        score = context.match_score,
        quantity = context.quantity,
        unit = context.unit_price,
        total = context.total_price,
    );

    if !context.specifications.is_empty() {
        body.push_str("\nThe specifications we evaluated:\n");
        for (label, value) in &context.specifications {
            body.push_str(&format!("- {label}: {value}\n"));
        }
    }

    body.push_str(
        "\nPlease confirm availability, delivery lead time and warranty terms at your \
         earliest convenience.\n\nBest regards,\nProcurement Team",
    );

    GeneratedEmail {
        subject: format!("Request for Quotation: {}", context.rfq_title),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::models::RequirementProfile;

    fn context() -> EmailContext {
        EmailContext {
            rfq_title: "Computer Equipment RFQ".to_string(),
            rfq_description: "Lab refresh".to_string(),
            product_name: "Dell Latitude 5430".to_string(),
            product_category: "Laptops".to_string(),
            unit_price: 950.0,
            quantity: 25,
            total_price: 23750.0,
            match_score: 81.0,
            supplier_name: "TechPro Solutions".to_string(),
            supplier_email: Some("sales@techpro.example".to_string()),
            specifications: vec![("Memory".to_string(), "16 GB".to_string())],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_extraction_returns_fixture_after_delay() {
        let assistant = DemoAssistant::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();
        let req = assistant.extract_requirements("anything at all").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(req.profile(), RequirementProfile::GeneralEquipment);
        assert_eq!(req.quantity_for_category("Laptops"), 25);
        assert_eq!(req.criteria.total_weight(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_email_mentions_product_and_totals() {
        let assistant = DemoAssistant::new(Duration::ZERO);
        let email = assistant.generate_email(&context()).await.unwrap();
        assert_eq!(email.subject, "Request for Quotation: Computer Equipment RFQ");
        assert!(email.body.starts_with("Dear TechPro Solutions Team"));
        assert!(email.body.contains("25 unit(s)"));
        assert!(email.body.contains("$23750.00"));
        assert!(email.body.contains("- Memory: 16 GB"));
        assert_eq!(assistant.backend(), "demo");
    }
}
