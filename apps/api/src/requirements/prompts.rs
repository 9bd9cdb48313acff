// Prompt constants for requirement extraction.
// Reuses the JSON-only fragment from llm_client::prompts.

/// System prompt for RFQ requirement extraction. `{json_only}` is replaced
/// with `JSON_ONLY_INSTRUCTION` before sending.
pub const EXTRACTION_SYSTEM: &str = "You are an expert procurement analyst. \
    You extract structured requirements from Request For Quotation (RFQ) documents. \
    {json_only}";

/// Extraction prompt template. Replace `{rfq_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the procurement requirements from the RFQ below.

Return a JSON object with this EXACT schema. Omit a block entirely when the RFQ
does not ask for that kind of equipment. Every specification value is a short
string exactly as the buyer phrased it.
{
  "title": "Brief descriptive title",
  "description": "One or two sentence summary of what is being procured",
  "categories": ["Laptops", "Monitors"],
  "laptops": {
    "quantity": 25,
    "os": "Windows 11 Pro",
    "processor": "Intel Core i5 12th gen or better",
    "memory": "16 GB DDR4",
    "storage": "512 GB SSD",
    "display": "14 inch FHD IPS",
    "battery": "8 hours",
    "durability": "MIL-STD-810G",
    "connectivity": "Wi-Fi 6, USB-C",
    "warranty": "3 years on-site"
  },
  "monitors": {
    "quantity": 25,
    "screenSize": "24 inch",
    "resolution": "1920x1080 FHD",
    "panelTech": "IPS",
    "brightness": "250 nits",
    "contrastRatio": "1000:1",
    "connectivity": "HDMI, DisplayPort",
    "adjustability": "height, tilt",
    "warranty": "3 years"
  },
  "aiHardware": {
    "type": "GPU",
    "quantity": 8,
    "minMemory": 80,
    "minComputePower": 60,
    "minTensorCores": 400,
    "minCudaCores": 10000,
    "minInt8Performance": 1000,
    "minFp16Performance": 300,
    "minMemoryBandwidth": 2000,
    "memoryType": "HBM3",
    "powerConstraints": 700,
    "frameworks": ["PyTorch", "TensorFlow"]
  },
  "criteria": {
    "price": {"weight": 50},
    "quality": {"weight": 30},
    "delivery": {"weight": 20}
  }
}

Rules:
- "categories" uses catalog names: "Laptops", "Monitors", "GPU", "AI Accelerator", "TPU", "FPGA".
- For GPU or accelerator RFQs, use the criteria "price", "performance",
  "compatibility", "availability" and "compliance" instead of quality/delivery.
- Criterion weights are integers and should sum to 100.
- aiHardware numbers use GB, TFLOPS, TOPS, GB/s and watts.

RFQ:
{rfq_text}"#;
