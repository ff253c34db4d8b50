//! Product browsing route handlers.
//!
//! The listing applies a category filter in SQL, then free-text search and
//! sorting in memory over the loaded set.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use orchard_core::{CategoryId, ProductId};
use serde::Deserialize;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Product};
use crate::services::catalog::{SortKey, search_products, sort_products};
use crate::{filters, state::AppState};

/// Query parameters for the product listing.
///
/// The category select submits an empty string for "All categories", so
/// the field is parsed leniently.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub category: Option<i32>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub user: Option<CurrentUser>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub selected_category: Option<i32>,
    pub search: String,
    pub sort: String,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub user: Option<CurrentUser>,
    pub product: Product,
}

/// Display the product listing with filter, search, and sort applied.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogRepository::new(state.pool());

    let categories = catalog.list_categories().await?;
    let mut products = catalog
        .list_products(query.category.map(CategoryId::new))
        .await?;

    let search = query.search.unwrap_or_default();
    search_products(&mut products, search.trim());

    let sort = query.sort.unwrap_or_default();
    sort_products(&mut products, SortKey::parse(&sort));

    Ok(ProductIndexTemplate {
        user,
        categories,
        products,
        selected_category: query.category,
        search,
        sort,
    })
}

/// Display a single product.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let product = CatalogRepository::new(state.pool())
        .get_product(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate { user, product })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(uri: &str) -> ProductListQuery {
        let uri = uri.parse::<Uri>().expect("valid uri");
        let Query(query) = Query::<ProductListQuery>::try_from_uri(&uri).expect("query parses");
        query
    }

    #[test]
    fn test_empty_category_param_is_none() {
        // "All categories" submits category= with an empty value
        let query = parse("/products/?category=&search=red&sort=");
        assert_eq!(query.category, None);
        assert_eq!(query.search.as_deref(), Some("red"));
    }

    #[test]
    fn test_category_param_parses() {
        let query = parse("/products/?category=3&sort=price_asc");
        assert_eq!(query.category, Some(3));
        assert_eq!(query.sort.as_deref(), Some("price_asc"));
    }

    #[test]
    fn test_missing_category_param_is_none() {
        let query = parse("/products/");
        assert_eq!(query.category, None);
    }
}
