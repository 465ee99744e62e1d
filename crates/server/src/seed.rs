//! Idempotent startup seeding.
//!
//! Creates the bootstrap admin account (when a password is configured) and
//! a sample instrument catalog on first run. Never overwrites existing data.

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::NewProduct;
use crate::services::auth::{AuthError, hash_password};

/// Email for the seeded admin account.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@crescendo.example";

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Seed the admin account and sample catalog.
///
/// # Errors
///
/// Returns `SeedError` if a database write or password hash fails.
pub async fn seed(pool: &SqlitePool, config: &ServerConfig) -> Result<(), SeedError> {
    seed_admin(pool, config).await?;
    seed_products(pool).await?;
    Ok(())
}

async fn seed_admin(pool: &SqlitePool, config: &ServerConfig) -> Result<(), SeedError> {
    let Some(password) = config.admin_password.as_ref() else {
        tracing::debug!("no admin password configured, skipping admin seed");
        return Ok(());
    };

    let users = UserRepository::new(pool);
    if users.get_by_username(ADMIN_USERNAME).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password.expose_secret())?;
    users
        .create(ADMIN_USERNAME, ADMIN_EMAIL, &password_hash, true)
        .await?;
    tracing::info!("seeded admin account");

    Ok(())
}

async fn seed_products(pool: &SqlitePool) -> Result<(), SeedError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .map_err(RepositoryError::from)?;
    if count > 0 {
        return Ok(());
    }

    let repository = crate::db::products::ProductRepository::new(pool);
    for product in sample_products() {
        repository.create(&product).await?;
    }
    tracing::info!("seeded sample catalog");

    Ok(())
}

fn sample_products() -> Vec<NewProduct> {
    use rust_decimal_macros::dec;

    use crescendo_core::Money;

    let entry = |name: &str,
                 category: &str,
                 brand: &str,
                 price: Money,
                 description: &str,
                 specifications: &str,
                 image_url: &str,
                 rating: f64,
                 stock: i64| NewProduct {
        name: name.to_string(),
        category: category.to_string(),
        brand: brand.to_string(),
        price,
        description: description.to_string(),
        specifications: specifications.to_string(),
        image_url: image_url.to_string(),
        rating,
        stock,
    };

    vec![
        entry(
            "Fender Stratocaster Electric Guitar",
            "Guitars",
            "Fender",
            Money::new(dec!(1299.99)),
            "Iconic electric guitar with versatile tone",
            "Alder body, Maple neck, 3 single-coil pickups",
            "https://images.example.com/stratocaster.jpg",
            4.8,
            15,
        ),
        entry(
            "Yamaha P-125 Digital Piano",
            "Pianos & Keyboards",
            "Yamaha",
            Money::new(dec!(649.99)),
            "Portable digital piano with authentic piano touch",
            "88 weighted keys, 24 voices, USB connectivity",
            "https://images.example.com/p125.jpg",
            4.7,
            8,
        ),
        entry(
            "Pearl Export Drum Kit",
            "Drums",
            "Pearl",
            Money::new(dec!(899.99)),
            "Complete 5-piece drum set for beginners and pros",
            "5 drums, hardware included, birch shells",
            "https://images.example.com/export-kit.jpg",
            4.6,
            5,
        ),
        entry(
            "Stentor Violin Student II",
            "Violins",
            "Stentor",
            Money::new(dec!(299.99)),
            "Quality student violin with bow and case",
            "Solid carved top, ebony fittings, includes case",
            "https://images.example.com/student2.jpg",
            4.5,
            12,
        ),
        entry(
            "Yamaha YFL-222 Flute",
            "Flutes",
            "Yamaha",
            Money::new(dec!(549.99)),
            "Professional student flute with excellent tone",
            "Nickel silver, offset G, E mechanism",
            "https://images.example.com/yfl222.jpg",
            4.9,
            7,
        ),
        entry(
            "Pioneer DJ DDJ-400",
            "DJ Equipment",
            "Pioneer",
            Money::new(dec!(249.99)),
            "2-channel DJ controller for beginners",
            "Rekordbox compatible, built-in sound card",
            "https://images.example.com/ddj400.jpg",
            4.7,
            10,
        ),
        entry(
            "Shure SM58 Microphone",
            "Accessories",
            "Shure",
            Money::new(dec!(99.99)),
            "Legendary vocal microphone",
            "Dynamic, cardioid, rugged construction",
            "https://images.example.com/sm58.jpg",
            5.0,
            25,
        ),
        entry(
            "Boss Katana-50 Amplifier",
            "Accessories",
            "Boss",
            Money::new(dec!(229.99)),
            "50-watt guitar amplifier with effects",
            "5 amp characters, built-in effects, USB",
            "https://images.example.com/katana50.jpg",
            4.8,
            6,
        ),
        entry(
            "Gibson Les Paul Standard",
            "Guitars",
            "Gibson",
            Money::new(dec!(2499.99)),
            "Legendary electric guitar with premium tone",
            "Mahogany body, AAA maple top, humbuckers",
            "https://images.example.com/lespaul.jpg",
            4.9,
            3,
        ),
        entry(
            "Roland TD-17KVX V-Drums",
            "Drums",
            "Roland",
            Money::new(dec!(1699.99)),
            "Electronic drum kit with mesh heads",
            "Premium sound module, bluetooth audio",
            "https://images.example.com/td17kvx.jpg",
            4.8,
            4,
        ),
        entry(
            "Korg SV-2 Stage Piano",
            "Pianos & Keyboards",
            "Korg",
            Money::new(dec!(1999.99)),
            "88-key stage piano with vintage sounds",
            "Weighted hammer action, tube-driven preamp",
            "https://images.example.com/sv2.jpg",
            4.7,
            5,
        ),
        entry(
            "D'Addario Guitar Strings Pack",
            "Accessories",
            "D'Addario",
            Money::new(dec!(19.99)),
            "3-pack of premium guitar strings",
            "Nickel wound, 10-46 gauge, long life",
            "https://images.example.com/strings.jpg",
            4.6,
            50,
        ),
    ]
}
