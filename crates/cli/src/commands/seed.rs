//! Sample catalog seeding.
//!
//! Loads a small Arabic grocery catalog for local development. Idempotent:
//! rows already present (by slug) are left untouched.

use sqlx::PgPool;

use dukkan_admin::db;

use super::CliError;

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    position: i32,
}

struct SeedProduct {
    category_slug: &'static str,
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: &'static str,
    stock: i32,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "زيوت وسمن",
        slug: "oils-ghee",
        position: 1,
    },
    SeedCategory {
        name: "أرز ومكرونة",
        slug: "rice-pasta",
        position: 2,
    },
    SeedCategory {
        name: "مشروبات",
        slug: "beverages",
        position: 3,
    },
    SeedCategory {
        name: "منظفات",
        slug: "cleaning",
        position: 4,
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        category_slug: "oils-ghee",
        name: "زيت زيتون بكر ممتاز ١ لتر",
        slug: "olive-oil-1l",
        description: "زيت زيتون معصور على البارد",
        price: "320.00",
        stock: 40,
    },
    SeedProduct {
        category_slug: "oils-ghee",
        name: "سمن بلدي ٧٠٠ جرام",
        slug: "ghee-700g",
        description: "سمن بلدي طبيعي",
        price: "185.50",
        stock: 25,
    },
    SeedProduct {
        category_slug: "rice-pasta",
        name: "أرز مصري ٥ كيلو",
        slug: "rice-5kg",
        description: "أرز أبيض رفيع الحبة",
        price: "210.00",
        stock: 60,
    },
    SeedProduct {
        category_slug: "rice-pasta",
        name: "مكرونة إسباجتي ٤٠٠ جرام",
        slug: "spaghetti-400g",
        description: "مكرونة قمح قاسي",
        price: "22.75",
        stock: 120,
    },
    SeedProduct {
        category_slug: "beverages",
        name: "شاي أسود ٢٥٠ جرام",
        slug: "black-tea-250g",
        description: "شاي كيني فاخر",
        price: "68.00",
        stock: 80,
    },
    SeedProduct {
        category_slug: "beverages",
        name: "عصير مانجو ١ لتر",
        slug: "mango-juice-1l",
        description: "عصير مانجو طبيعي بدون سكر مضاف",
        price: "45.00",
        stock: 50,
    },
    SeedProduct {
        category_slug: "cleaning",
        name: "سائل غسيل أطباق ١ لتر",
        slug: "dish-soap-1l",
        description: "برائحة الليمون",
        price: "39.95",
        stock: 90,
    },
];

/// Seed the database with the sample catalog.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    seed_catalog(&pool).await?;

    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), CliError> {
    for category in CATEGORIES {
        sqlx::query(
            r"
            INSERT INTO categories (name, slug, position)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(category.position)
        .execute(pool)
        .await?;
    }
    tracing::info!("Seeded {} categories", CATEGORIES.len());

    for product in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO products (category_id, name, slug, description, price, currency_code, stock)
            SELECT c.id, $2, $3, $4, $5::numeric, 'EGP', $6
            FROM categories c
            WHERE c.slug = $1
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(product.category_slug)
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .execute(pool)
        .await?;
    }
    tracing::info!("Seeded {} products", PRODUCTS.len());

    Ok(())
}
