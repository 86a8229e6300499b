//! Product and category commands
use serde::Serialize;
use shopfront_core::{
    parse_price, Category, CategoryDraft, Product, ProductDraft, ProductQuery, Storefront,
};

use super::print_json;
use crate::cli::ProductArgs;

#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub is_active: bool,
    /// Display URL after normalization
    pub image: String,
}

impl ProductInfo {
    fn new(store: &Storefront, product: Product) -> Self {
        let image = store.image_url(product.image_url.as_deref());
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            category: product.category.or(product.category_id),
            is_active: product.is_active,
            image,
        }
    }
}

fn infos(store: &Storefront, products: Vec<Product>) -> Vec<ProductInfo> {
    products
        .into_iter()
        .map(|p| ProductInfo::new(store, p))
        .collect()
}

fn draft_from(args: ProductArgs) -> anyhow::Result<ProductDraft> {
    Ok(ProductDraft {
        name: args.name,
        description: args.description,
        price: parse_price(&args.price)?,
        category_id: args.category_id,
        image_url: args.image,
        is_active: !args.hidden,
    })
}

pub async fn list_products(
    store: &Storefront,
    category: Option<String>,
    search: Option<String>,
    all: bool,
) -> anyhow::Result<()> {
    let products = if all {
        store.admin_products().await?
    } else {
        let query = ProductQuery {
            category,
            search,
            include_inactive: false,
        };
        store.products(&query).await
    };
    print_json(&infos(store, products))
}

pub async fn show_product(store: &Storefront, id: &str) -> anyhow::Result<()> {
    match store.product(id).await {
        Some(product) => print_json(&ProductInfo::new(store, product)),
        None => anyhow::bail!("Product {} not found", id),
    }
}

pub async fn create_product(store: &Storefront, args: ProductArgs) -> anyhow::Result<()> {
    let product = store.create_product(draft_from(args)?).await?;
    print_json(&ProductInfo::new(store, product))
}

pub async fn update_product(store: &Storefront, id: &str, args: ProductArgs) -> anyhow::Result<()> {
    let product = store.update_product(id, draft_from(args)?).await?;
    print_json(&ProductInfo::new(store, product))
}

pub async fn toggle_product(store: &Storefront, id: &str) -> anyhow::Result<()> {
    let product = store.toggle_product(id).await?;
    print_json(&ProductInfo::new(store, product))
}

pub async fn delete_product(store: &Storefront, id: &str) -> anyhow::Result<()> {
    store.delete_product(id).await?;
    eprintln!("Deleted product {}", id);
    Ok(())
}

pub async fn list_categories(store: &Storefront) -> anyhow::Result<()> {
    let categories: Vec<Category> = store.categories().await;
    print_json(&categories)
}

pub async fn create_category(
    store: &Storefront,
    name: String,
    description: Option<String>,
) -> anyhow::Result<()> {
    let category = store
        .create_category(CategoryDraft { name, description })
        .await?;
    print_json(&category)
}

pub async fn delete_category(store: &Storefront, id: &str) -> anyhow::Result<()> {
    store.delete_category(id).await?;
    eprintln!("Deleted category {}", id);
    Ok(())
}

pub async fn seed_categories(store: &Storefront) -> anyhow::Result<()> {
    print_json(&store.seed_categories().await?)
}
