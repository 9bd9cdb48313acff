//! Sample catalog: office laptops and monitors from six vendors plus a
//! handful of data-centre GPUs, and the default buyer account.

use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{DEFAULT_BUYER_COUNTRY, DEFAULT_USERNAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub seeded: bool,
    pub suppliers: usize,
    pub products: usize,
}

struct SupplierSeed {
    name: &'static str,
    domain: &'static str,
    country: &'static str,
    description: &'static str,
    contact_phone: &'static str,
    delivery_time: &'static str,
}

struct ProductSeed {
    supplier: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
    price: f64,
    specifications: Value,
    warranty: &'static str,
}

/// Inserts the sample catalog when the suppliers table is empty. Everything
/// goes in one transaction; a populated catalog is left untouched.
pub async fn seed_sample_catalog(pool: &PgPool) -> Result<SeedReport, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Catalog already holds {existing} suppliers, skipping sample data");
        return Ok(SeedReport {
            seeded: false,
            suppliers: 0,
            products: 0,
        });
    }

    let suppliers = sample_suppliers();
    let products = sample_products();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"INSERT INTO users (username, email, full_name, company, country)
           VALUES ($1, $2, $3, $4, $5)
           ON CONFLICT (username) DO NOTHING"#,
    )
    .bind(DEFAULT_USERNAME)
    .bind("procurement@matchpoint.example")
    .bind("Procurement Team")
    .bind("MatchPoint")
    .bind(DEFAULT_BUYER_COUNTRY)
    .execute(&mut *tx)
    .await?;

    let mut supplier_ids = Vec::with_capacity(suppliers.len());
    for s in &suppliers {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO suppliers
                 (name, logo_url, website, country, description, contact_email, contact_phone,
                  delivery_time, is_verified)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
               RETURNING id"#,
        )
        .bind(s.name)
        .bind(format!("https://logo.clearbit.com/{}", s.domain))
        .bind(format!("https://www.{}", s.domain))
        .bind(s.country)
        .bind(s.description)
        .bind(format!("sales@{}", s.domain))
        .bind(s.contact_phone)
        .bind(s.delivery_time)
        .fetch_one(&mut *tx)
        .await?;
        supplier_ids.push((s.name, id));
    }

    for p in &products {
        let supplier_id = supplier_ids
            .iter()
            .find(|(name, _)| *name == p.supplier)
            .map(|(_, id)| *id)
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "sample product '{}' references unknown supplier '{}'",
                    p.name,
                    p.supplier
                ))
            })?;

        sqlx::query(
            r#"INSERT INTO products
                 (supplier_id, name, category, description, price, specifications, warranty)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(supplier_id)
        .bind(p.name)
        .bind(p.category)
        .bind(p.description)
        .bind(p.price)
        .bind(&p.specifications)
        .bind(p.warranty)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        "Seeded sample catalog: {} suppliers, {} products",
        suppliers.len(),
        products.len()
    );

    Ok(SeedReport {
        seeded: true,
        suppliers: suppliers.len(),
        products: products.len(),
    })
}

fn sample_suppliers() -> Vec<SupplierSeed> {
    vec![
        SupplierSeed {
            name: "Dell Technologies",
            domain: "dell.com",
            country: "United States",
            description: "Computers, displays and related services for business and education.",
            contact_phone: "+1-800-624-9897",
            delivery_time: "10-15 days",
        },
        SupplierSeed {
            name: "HP Inc.",
            domain: "hp.com",
            country: "United States",
            description: "Personal computers, displays, printers and supplies.",
            contact_phone: "+1-800-474-6836",
            delivery_time: "7-14 days",
        },
        SupplierSeed {
            name: "Lenovo",
            domain: "lenovo.com",
            country: "China",
            description: "PCs, workstations, servers and smart devices.",
            contact_phone: "+1-855-253-6686",
            delivery_time: "14-21 days",
        },
        SupplierSeed {
            name: "Samsung Electronics",
            domain: "samsung.com",
            country: "South Korea",
            description: "Consumer electronics, displays and memory.",
            contact_phone: "+1-800-726-7864",
            delivery_time: "10-20 days",
        },
        SupplierSeed {
            name: "LG Electronics",
            domain: "lg.com",
            country: "South Korea",
            description: "Displays, appliances and consumer electronics.",
            contact_phone: "+1-800-243-0000",
            delivery_time: "14-21 days",
        },
        SupplierSeed {
            name: "ASUS",
            domain: "asus.com",
            country: "Taiwan",
            description: "Laptops, desktops, motherboards and displays.",
            contact_phone: "+1-888-678-3688",
            delivery_time: "15-25 days",
        },
        SupplierSeed {
            name: "Lambda",
            domain: "lambdalabs.com",
            country: "United States",
            description: "GPU workstations, servers and cloud for deep learning.",
            contact_phone: "+1-866-711-2025",
            delivery_time: "5-10 days",
        },
        SupplierSeed {
            name: "Inspur",
            domain: "inspur.com",
            country: "China",
            description: "AI servers and data-centre infrastructure.",
            contact_phone: "+86-531-8510-6229",
            delivery_time: "20-40 days",
        },
    ]
}

fn laptop(cpu: &str, memory: &str, storage: &str, display: &str, battery: &str, os: &str, extra: &str) -> Value {
    json!({
        "processor": cpu,
        "memory": memory,
        "storage": storage,
        "display": display,
        "battery": battery,
        "connectivity": extra,
        "os": os
    })
}

fn monitor(size: &str, resolution: &str, panel: &str, nits: &str, ports: &str, stand: &str) -> Value {
    json!({
        "screenSize": size,
        "resolution": resolution,
        "panelTech": panel,
        "brightness": nits,
        "contrastRatio": "1000:1",
        "connectivity": ports,
        "adjustability": stand,
        "refreshRate": "60 Hz"
    })
}

fn sample_products() -> Vec<ProductSeed> {
    let mut products = vec![
        ProductSeed {
            supplier: "Dell Technologies",
            name: "Dell Latitude 5520",
            category: "Laptops",
            description: "Business laptop with excellent durability and performance",
            price: 999.99,
            specifications: laptop("Intel Core i5-1135G7", "16 GB DDR4", "512 GB SSD", "15.6-inch FHD (1920 x 1080)", "Up to 10 hours", "Windows 11 Pro", "USB-C, USB-A, HDMI, RJ-45"),
            warranty: "3 years ProSupport",
        },
        ProductSeed {
            supplier: "Dell Technologies",
            name: "Dell XPS 13",
            category: "Laptops",
            description: "Premium ultrabook with InfinityEdge display",
            price: 1299.99,
            specifications: laptop("Intel Core i7-1165G7", "16 GB LPDDR4x", "1 TB PCIe NVMe SSD", "13.4-inch FHD+ (1920 x 1200)", "Up to 12 hours", "Windows 11 Pro", "Thunderbolt 4, USB-C"),
            warranty: "1 year Premium Support",
        },
        ProductSeed {
            supplier: "HP Inc.",
            name: "HP EliteBook 840 G8",
            category: "Laptops",
            description: "Enterprise-grade laptop with security features",
            price: 1199.99,
            specifications: laptop("Intel Core i5-1145G7", "16 GB DDR4", "512 GB SSD", "14-inch FHD (1920 x 1080)", "Up to 10 hours", "Windows 11 Pro", "USB-C, USB-A, HDMI, Dock connector"),
            warranty: "3 years HP Care Pack",
        },
        ProductSeed {
            supplier: "Lenovo",
            name: "Lenovo ThinkPad X1 Carbon Gen 9",
            category: "Laptops",
            description: "Premium business ultrabook with durability",
            price: 1499.99,
            specifications: laptop("Intel Core i7-1165G7", "16 GB LPDDR4x", "1 TB PCIe SSD", "14-inch FHD+ (1920 x 1200)", "Up to 16 hours", "Windows 11 Pro", "Thunderbolt 4, USB-A, HDMI"),
            warranty: "3 years ThinkPad warranty",
        },
        ProductSeed {
            supplier: "Lenovo",
            name: "Lenovo IdeaPad 5",
            category: "Laptops",
            description: "Mid-range laptop with good performance",
            price: 699.99,
            specifications: laptop("AMD Ryzen 5 5500U", "8 GB DDR4", "512 GB SSD", "15.6-inch FHD (1920 x 1080)", "Up to 12 hours", "Windows 11 Home", "USB-C, USB-A, HDMI, SD card reader"),
            warranty: "1 year limited warranty",
        },
        ProductSeed {
            supplier: "ASUS",
            name: "ASUS ZenBook 14",
            category: "Laptops",
            description: "Compact and lightweight ultrabook",
            price: 899.99,
            specifications: laptop("AMD Ryzen 7 5800H", "16 GB LPDDR4X", "512 GB PCIe SSD", "14-inch FHD (1920 x 1080)", "Up to 10 hours", "Windows 11 Home", "Thunderbolt 4, USB-A, HDMI"),
            warranty: "1 year ASUS global warranty",
        },
    ];

    products.extend([
        ProductSeed {
            supplier: "Dell Technologies",
            name: "Dell UltraSharp U2720Q",
            category: "Monitors",
            description: "27-inch 4K USB-C Monitor",
            price: 549.99,
            specifications: monitor("27 inches", "3840 x 2160 (4K UHD)", "IPS", "350 nits", "HDMI, DisplayPort, USB-C with 90W power delivery", "Height, tilt, swivel, pivot"),
            warranty: "3 years Advanced Exchange Service",
        },
        ProductSeed {
            supplier: "Dell Technologies",
            name: "Dell P2419H",
            category: "Monitors",
            description: "24-inch FHD Monitor for Business",
            price: 199.99,
            specifications: monitor("24 inches", "1920 x 1080 (Full HD)", "IPS", "250 nits", "HDMI, DisplayPort, VGA", "Height, tilt, swivel, pivot"),
            warranty: "3 years Advanced Exchange Service",
        },
        ProductSeed {
            supplier: "HP Inc.",
            name: "HP E27u G4",
            category: "Monitors",
            description: "27-inch QHD USB-C Monitor",
            price: 379.99,
            specifications: monitor("27 inches", "2560 x 1440 (QHD)", "IPS", "300 nits", "HDMI, DisplayPort, USB-C", "Height, tilt, swivel, pivot"),
            warranty: "3 years HP standard warranty",
        },
        ProductSeed {
            supplier: "HP Inc.",
            name: "HP P24h G4",
            category: "Monitors",
            description: "24-inch FHD Monitor",
            price: 209.99,
            specifications: monitor("23.8 inches", "1920 x 1080 (Full HD)", "IPS", "250 nits", "HDMI, DisplayPort, VGA", "Height, tilt"),
            warranty: "3 years HP standard warranty",
        },
        ProductSeed {
            supplier: "Samsung Electronics",
            name: "Samsung S32A600U",
            category: "Monitors",
            description: "32-inch UHD Monitor",
            price: 399.99,
            specifications: monitor("32 inches", "3840 x 2160 (4K UHD)", "VA", "300 nits", "HDMI, DisplayPort", "Height, tilt"),
            warranty: "3 years Samsung warranty",
        },
        ProductSeed {
            supplier: "LG Electronics",
            name: "LG 24MP400",
            category: "Monitors",
            description: "24-inch FHD IPS Monitor",
            price: 149.99,
            specifications: monitor("24 inches", "1920 x 1080 (Full HD)", "IPS", "250 nits", "HDMI, VGA", "Tilt only"),
            warranty: "1 year LG limited warranty",
        },
    ]);

    let export_controlled = json!({
        "exportRestrictions": ["Restricted under US export regulations"],
        "restrictedCountries": ["Russia", "Iran", "North Korea", "Cuba", "Syria"]
    });

    products.extend([
        ProductSeed {
            supplier: "Lambda",
            name: "NVIDIA H100 80GB SXM",
            category: "GPU",
            description: "Hopper data-centre GPU for large-scale training",
            price: 30999.0,
            specifications: json!({
                "manufacturer": "NVIDIA",
                "computeSpecs": {"fp32Performance": 67.0, "fp16Performance": 989.0, "int8Performance": 1979.0, "tensorCores": 528, "cudaCores": 16896},
                "memorySpecs": {"capacity": 80, "bandwidth": 3350, "type": "HBM3"},
                "powerConsumption": {"tdp": 700},
                "supportedFrameworks": ["PyTorch", "TensorFlow", "JAX", "TensorRT"],
                "complianceInfo": export_controlled.clone()
            }),
            warranty: "3 years limited warranty",
        },
        ProductSeed {
            supplier: "Lambda",
            name: "NVIDIA A100 80GB PCIe",
            category: "GPU",
            description: "Ampere data-centre GPU for training and inference",
            price: 17499.0,
            specifications: json!({
                "manufacturer": "NVIDIA",
                "computeSpecs": {"fp32Performance": 19.5, "fp16Performance": 312.0, "int8Performance": 624.0, "tensorCores": 432, "cudaCores": 6912},
                "memorySpecs": {"capacity": 80, "bandwidth": 1935, "type": "HBM2e"},
                "powerConsumption": {"tdp": 300},
                "supportedFrameworks": ["PyTorch", "TensorFlow", "JAX", "TensorRT"],
                "complianceInfo": export_controlled.clone()
            }),
            warranty: "3 years limited warranty",
        },
        ProductSeed {
            supplier: "Inspur",
            name: "NVIDIA L40S 48GB",
            category: "GPU",
            description: "Ada Lovelace GPU for inference and graphics workloads",
            price: 9999.0,
            specifications: json!({
                "manufacturer": "NVIDIA",
                "computeSpecs": {"fp32Performance": 91.6, "fp16Performance": 362.0, "int8Performance": 733.0, "tensorCores": 568, "cudaCores": 18176},
                "memorySpecs": {"capacity": 48, "bandwidth": 864, "type": "GDDR6"},
                "powerConsumption": {"tdp": 350},
                "supportedFrameworks": ["PyTorch", "TensorFlow", "TensorRT"],
                "complianceInfo": export_controlled
            }),
            warranty: "3 years limited warranty",
        },
        ProductSeed {
            supplier: "ASUS",
            name: "NVIDIA RTX 4000 Ada 20GB",
            category: "GPU",
            description: "Single-slot workstation GPU for development and light training",
            price: 1249.0,
            specifications: json!({
                "manufacturer": "NVIDIA",
                "computeSpecs": {"fp32Performance": 26.7, "fp16Performance": 106.9, "int8Performance": 327.0, "tensorCores": 192, "cudaCores": 6144},
                "memorySpecs": {"capacity": 20, "bandwidth": 360, "type": "GDDR6"},
                "powerConsumption": {"tdp": 130},
                "supportedFrameworks": ["PyTorch", "TensorFlow", "ONNX Runtime"],
                "complianceInfo": {"exportRestrictions": [], "restrictedCountries": ["North Korea", "Iran", "Syria", "Cuba"]}
            }),
            warranty: "3 years limited warranty",
        },
    ]);

    products
}
