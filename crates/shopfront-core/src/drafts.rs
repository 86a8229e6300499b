//! Local checks on admin forms
//!
//! Everything here runs before a request is built, so a bad form never
//! reaches the backend.

use shopfront_api::{CategoryDraft, ProductDraft};
use shopfront_images::LinkCanonicalizer;

use crate::error::CoreError;
use crate::Result;

/// Parse a price typed into a form field
pub fn parse_price(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Invalid("Price is required".to_string()));
    }

    let price: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::Invalid(format!("'{}' is not a valid price", trimmed)))?;
    check_price(price)?;
    Ok(price)
}

fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Invalid(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim, validate and canonicalize a product form
pub fn prepare_product(draft: ProductDraft, links: &LinkCanonicalizer) -> Result<ProductDraft> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(CoreError::Invalid("Product name is required".to_string()));
    }
    check_price(draft.price)?;

    let image_url = non_blank(draft.image_url).map(|link| links.canonicalize(&link));

    Ok(ProductDraft {
        name,
        description: non_blank(draft.description),
        price: draft.price,
        category_id: non_blank(draft.category_id),
        image_url,
        is_active: draft.is_active,
    })
}

pub fn prepare_category(draft: CategoryDraft) -> Result<CategoryDraft> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(CoreError::Invalid("Category name is required".to_string()));
    }

    Ok(CategoryDraft {
        name,
        description: non_blank(draft.description),
    })
}
