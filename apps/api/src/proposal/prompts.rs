// Prompt constants for proposal email generation.

/// System prompt for the proposal email. `{json_only}` is replaced with
/// `JSON_ONLY_INSTRUCTION` before sending.
pub const EMAIL_SYSTEM: &str = "You write professional procurement correspondence. \
    Generate a formal, detailed and persuasive email proposal addressed to a supplier \
    about a Request For Quotation. Include a greeting, a reference to the RFQ and its \
    requirements, the highlights of the matched product, the quoted quantity and total, \
    and clear next steps. \
    Return a JSON object of the form {\"subject\": \"...\", \"body\": \"...\"}. \
    {json_only}";

/// Email prompt template. Placeholders are filled in by the LLM assistant.
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"RFQ details:
Title: {rfq_title}
Description: {rfq_description}

Matched product:
Name: {product_name}
Category: {product_category}
Unit price: ${unit_price}
Quantity: {quantity}
Total price: ${total_price}
Match score: {match_score}/100
Specifications:
{specifications}

Supplier:
Name: {supplier_name}
Contact: {supplier_email}"#;
