//! Seed the product catalog.
//!
//! Without a file, a small sample catalog goes in; with `--file`, a
//! JSON array of products is read instead. Documents are inserted with
//! store-assigned ids, so re-running adds duplicates - this is a
//! bootstrap tool, not a sync.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use pampa_core::catalog::Product;
use pampa_core::store::{DocumentStore, collections};

/// A product as it appears in a seed file: catalog fields without
/// timestamps.
#[derive(Debug, Deserialize)]
struct SeedProduct {
    name: String,
    description: String,
    category: String,
    price: Decimal,
    stock: u32,
    #[serde(default)]
    weight_kg: Option<Decimal>,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    image_url: Option<String>,
}

fn sample(
    name: &str,
    description: &str,
    category: &str,
    price: &str,
    stock: u32,
    weight_kg: &str,
    featured: bool,
) -> SeedProduct {
    SeedProduct {
        name: name.to_owned(),
        description: description.to_owned(),
        category: category.to_owned(),
        price: price.parse().unwrap_or(Decimal::ZERO),
        stock,
        weight_kg: weight_kg.parse().ok(),
        featured,
        image_url: None,
    }
}

fn sample_catalog() -> Vec<SeedProduct> {
    vec![
        sample(
            "Drone DJI Mini 3 Pro",
            "Drone compacto con cámara 4K, GPS preciso y vuelo inteligente. \
             Ideal para fotografía aérea y videografía profesional.",
            "drones",
            "899.99",
            5,
            "0.7",
            true,
        ),
        sample(
            "Termo Stanley Classic 1L",
            "Termo de acero inoxidable premium que mantiene la temperatura \
             por 24 horas. Perfecto para el mate de la mañana.",
            "termos",
            "89.99",
            15,
            "1.2",
            true,
        ),
        sample(
            "Drone Parrot Anafi",
            "Drone profesional con cámara 4K HDR, zoom 32x y estabilización \
             avanzada. Control remoto incluido.",
            "drones",
            "1299.99",
            3,
            "0.9",
            false,
        ),
        sample(
            "Termo Hydro Flask 1.2L",
            "Termo aislante de doble pared con boquilla deportiva. Mantiene \
             el frío por 24h y el calor por 12h.",
            "termos",
            "49.99",
            12,
            "1.1",
            false,
        ),
        sample(
            "Mate Imperial de Cuero",
            "Mate de calabaza forrado en cuero con virola de alpaca. Curado \
             y listo para usar.",
            "mates",
            "34.99",
            25,
            "0.4",
            true,
        ),
        sample(
            "Batería Externa Anker 20000mAh",
            "Power bank de alta capacidad con carga rápida USB-C y múltiples \
             puertos. Perfecto para viajes.",
            "tecnologia",
            "69.99",
            8,
            "0.5",
            true,
        ),
        sample(
            "Auriculares Sony WH-1000XM4",
            "Auriculares inalámbricos con cancelación de ruido líder en la \
             industria. Hasta 30 horas de batería.",
            "tecnologia",
            "299.99",
            6,
            "0.6",
            false,
        ),
    ]
}

/// Seed products from the sample set or a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a write fails.
pub async fn products(file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let seeds = match file {
        Some(path) => {
            info!(path, "Loading products from file");
            let content = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<Vec<SeedProduct>>(&content)?
        }
        None => sample_catalog(),
    };

    let store = pampa_backend::store_from_env().await?;
    info!("Document backend ready");

    let now = Utc::now();
    for seed in &seeds {
        let product = Product {
            name: seed.name.clone(),
            description: seed.description.clone(),
            category: seed.category.clone(),
            price: seed.price,
            stock: seed.stock,
            weight_kg: seed.weight_kg.unwrap_or(Decimal::ONE),
            featured: seed.featured,
            image_url: seed.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        let id = store
            .insert(collections::PRODUCTS, serde_json::to_value(&product)?)
            .await?;
        info!(id, name = %seed.name, "Product seeded");
    }

    info!(count = seeds.len(), "Seeding complete");
    Ok(())
}
