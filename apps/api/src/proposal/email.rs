use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assistant::{EmailContext, ProcurementAssistant};
use crate::errors::AppError;
use crate::matching::ranking::format_specifications;
use crate::models::catalog::{ProductRow, SupplierRow};
use crate::models::proposal::ProposalRow;
use crate::models::rfq::RfqRow;
use crate::requirements::models::ExtractedRequirements;

/// An email proposal as stored on a proposal row and edited by the buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub to: String,
    #[serde(default)]
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    /// The stored email, once one has been generated.
    pub fn from_proposal(proposal: &ProposalRow) -> Option<Self> {
        let subject = proposal.email_subject.as_deref().filter(|s| !s.trim().is_empty())?;
        let body = proposal.email_body.as_deref().filter(|b| !b.trim().is_empty())?;
        Some(Self {
            to: proposal.email_to.clone().unwrap_or_default(),
            cc: proposal.email_cc.clone(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.subject.trim().is_empty() {
            return Err(AppError::Validation("subject cannot be empty".to_string()));
        }
        if self.body.trim().is_empty() {
            return Err(AppError::Validation("body cannot be empty".to_string()));
        }
        if !is_address(&self.to) {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid recipient address",
                self.to
            )));
        }
        if let Some(cc) = self.cc.as_deref().filter(|c| !c.trim().is_empty()) {
            if let Some(bad) = cc.split(',').map(str::trim).find(|a| !is_address(a)) {
                return Err(AppError::Validation(format!("'{bad}' is not a valid cc address")));
            }
        }
        Ok(())
    }

    /// Blank cc becomes `None`; surrounding whitespace is dropped.
    pub fn normalized(mut self) -> Self {
        self.to = self.to.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.cc = self
            .cc
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }
}

fn is_address(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !s.contains(' '),
        None => false,
    }
}

/// Everything the email writer needs about one proposal.
pub fn email_context(
    rfq: &RfqRow,
    proposal: &ProposalRow,
    product: &ProductRow,
    supplier: &SupplierRow,
) -> EmailContext {
    let quantity = ExtractedRequirements::from_value(&rfq.extracted_requirements)
        .map(|r| r.quantity_for_category(&product.category))
        .unwrap_or(1);

    EmailContext {
        rfq_title: rfq.title.clone(),
        rfq_description: rfq.description.clone(),
        product_name: product.name.clone(),
        product_category: product.category.clone(),
        unit_price: product.price,
        quantity,
        total_price: proposal.total_price,
        match_score: proposal.score,
        supplier_name: supplier.name.clone(),
        supplier_email: supplier.contact_email.clone(),
        specifications: format_specifications(&product.specifications)
            .into_iter()
            .map(|row| (row.label, row.value))
            .collect(),
    }
}

/// Asks the assistant for subject and body and addresses the result to the
/// supplier's contact email.
pub async fn generate_email(
    assistant: &dyn ProcurementAssistant,
    context: &EmailContext,
) -> Result<EmailTemplate, AppError> {
    let generated = assistant.generate_email(context).await?;

    let to = match context.supplier_email.as_deref().filter(|e| is_address(e)) {
        Some(email) => email.to_string(),
        None => {
            warn!("Supplier '{}' has no usable contact email", context.supplier_name);
            String::new()
        }
    };

    info!(
        "Generated proposal email for '{}' via {} assistant",
        context.product_name,
        assistant.backend()
    );

    Ok(EmailTemplate {
        to,
        cc: None,
        subject: generated.subject.trim().to_string(),
        body: generated.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::DemoAssistant;
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;
    use uuid::Uuid;

    fn template(to: &str, cc: Option<&str>) -> EmailTemplate {
        EmailTemplate {
            to: to.to_string(),
            cc: cc.map(str::to_string),
            subject: "Request for Quotation".to_string(),
            body: "Dear team,".to_string(),
        }
    }

    fn proposal() -> ProposalRow {
        ProposalRow {
            id: Uuid::new_v4(),
            rfq_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            score: 82.5,
            criterion_scores: json!({"price": 100.0}),
            total_price: 22475.0,
            email_to: None,
            email_cc: None,
            email_subject: None,
            email_body: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(template("sales@dell.example", None).validate().is_ok());
        assert!(template("sales@dell.example", Some("a@b.c, d@e.f")).validate().is_ok());
        assert!(template("sales", None).validate().is_err());
        assert!(template("sales@dell.example", Some("a@b.c, nope")).validate().is_err());

        let mut t = template("sales@dell.example", None);
        t.subject = "   ".to_string();
        assert!(matches!(t.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_normalized_drops_blank_cc() {
        let t = template(" sales@dell.example ", Some("  ")).normalized();
        assert_eq!(t.to, "sales@dell.example");
        assert_eq!(t.cc, None);
    }

    #[test]
    fn test_from_proposal_requires_generated_email() {
        let mut row = proposal();
        assert!(EmailTemplate::from_proposal(&row).is_none());

        row.email_to = Some("sales@hp.example".to_string());
        row.email_subject = Some("RFQ".to_string());
        row.email_body = Some("Body".to_string());
        let t = EmailTemplate::from_proposal(&row).unwrap();
        assert_eq!(t.to, "sales@hp.example");
        assert_eq!(t.subject, "RFQ");
    }

    #[test]
    fn test_email_context_uses_category_quantity() {
        let supplier_id = Uuid::new_v4();
        let rfq = RfqRow {
            id: Uuid::new_v4(),
            title: "School refresh".to_string(),
            description: "Classroom equipment".to_string(),
            original_content: String::new(),
            extracted_requirements: json!({"title": "School refresh", "laptops": {"quantity": 25}}),
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let product = ProductRow {
            id: Uuid::new_v4(),
            supplier_id,
            name: "Latitude 5440".to_string(),
            category: "Laptops".to_string(),
            description: None,
            price: 899.0,
            specifications: json!({"memory": "16GB"}),
            warranty: "3 years".to_string(),
        };
        let supplier = SupplierRow {
            id: supplier_id,
            name: "Dell Technologies".to_string(),
            logo_url: None,
            website: None,
            country: Some("United States".to_string()),
            description: None,
            contact_email: Some("sales@dell.example".to_string()),
            contact_phone: None,
            delivery_time: "5-10 days".to_string(),
            is_verified: true,
        };

        let ctx = email_context(&rfq, &proposal(), &product, &supplier);
        assert_eq!(ctx.quantity, 25);
        assert_eq!(ctx.specifications, vec![("Memory".to_string(), "16GB".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_email_addresses_supplier() {
        let assistant = DemoAssistant::new(Duration::from_millis(10));
        let ctx = EmailContext {
            rfq_title: "School refresh".to_string(),
            rfq_description: String::new(),
            product_name: "Latitude 5440".to_string(),
            product_category: "Laptops".to_string(),
            unit_price: 899.0,
            quantity: 25,
            total_price: 22475.0,
            match_score: 82.5,
            supplier_name: "Dell Technologies".to_string(),
            supplier_email: Some("sales@dell.example".to_string()),
            specifications: Vec::new(),
        };

        let email = generate_email(&assistant, &ctx).await.unwrap();
        assert_eq!(email.to, "sales@dell.example");
        assert_eq!(email.subject, "Request for Quotation: School refresh");
        assert!(email.validate().is_ok());
    }
}
