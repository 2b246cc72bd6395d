//! # Catalog Endpoints
//!
//! Categories, category listings, search and product detail.
//! Category listings fall back to the authenticated seller endpoint when the
//! public one comes back empty.

use crate::client::{check_retval, PlatformClient};
use crate::normalize::{normalize_categories, normalize_product, normalize_products, total_pages};
use serde_json::json;
use shop_core::{
    Category, ListingQuery, Product, ProductPage, SearchQuery, ShopError, ShopLocale, ShopResult,
};
use tracing::{debug, info, instrument, warn};

/// Product ids go into a URL path, so only plain tokens are accepted
fn validate_product_id(product_id: &str) -> ShopResult<()> {
    let valid = !product_id.is_empty()
        && product_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ShopError::InvalidRequest(format!(
            "Invalid product id: {product_id:?}"
        )))
    }
}

impl PlatformClient {
    /// Category tree for `lang`, served from cache while fresh
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self, lang: &str) -> ShopResult<Vec<Category>> {
        let key = lang.to_string();
        if let Some(cached) = self.categories.get(&key, self.now()) {
            debug!("Category cache hit for {}", lang);
            return Ok(cached);
        }

        let body = self
            .get_json(
                "api/categories",
                &[
                    ("seller_id", self.config.seller_id.clone()),
                    ("lang", lang.to_string()),
                ],
            )
            .await?;
        check_retval(&body)?;

        let tree = normalize_categories(&body);
        info!("Loaded {} top-level categories for {}", tree.len(), lang);
        self.categories.insert(key, tree.clone(), self.now());
        Ok(tree)
    }

    /// One page of products in a category
    #[instrument(skip(self, query), fields(category_id = %query.category_id, page = query.page))]
    pub async fn fetch_products(&self, query: &ListingQuery) -> ShopResult<ProductPage> {
        let body = self
            .get_json(
                "api/shop/products",
                &[
                    ("seller_id", self.config.seller_id.clone()),
                    ("category_id", query.category_id.clone()),
                    ("page", query.page.to_string()),
                    ("rows", query.rows.to_string()),
                    ("currency", query.locale.currency.as_str().to_string()),
                    ("lang", query.locale.lang.clone()),
                ],
            )
            .await?;
        check_retval(&body)?;

        let products = normalize_products(&body, query.locale.currency);
        if !products.is_empty() {
            let mut page = ProductPage::new(products, query.page);
            page.total_pages = total_pages(&body);
            return Ok(page);
        }

        match self.fetch_seller_goods(query).await {
            Ok(page) => Ok(page),
            Err(err) => {
                warn!("Seller goods fallback failed: {}", err);
                Ok(ProductPage::new(Vec::new(), query.page))
            }
        }
    }

    /// Authenticated listing with its own field names
    async fn fetch_seller_goods(&self, query: &ListingQuery) -> ShopResult<ProductPage> {
        let token = self.token().await?;
        debug!("Falling back to seller goods for category {}", query.category_id);

        let body = self
            .post_json(
                "api/seller-goods",
                &[("token", token)],
                &json!({
                    "id_seller": self.config.seller_id,
                    "category_id": query.category_id,
                    "page": query.page,
                    "rows": query.rows,
                    "currency": query.locale.currency.as_str(),
                    "lang": query.locale.lang,
                    "order_col": "name",
                    "order_dir": "asc",
                }),
            )
            .await?;
        check_retval(&body)?;

        let products = normalize_products(&body, query.locale.currency);
        let mut page = ProductPage::new(products, query.page);
        page.total_pages = total_pages(&body);
        Ok(page)
    }

    /// Free-text search; a blank query short-circuits to an empty page
    #[instrument(skip(self, query), fields(text = %query.text))]
    pub async fn search_products(&self, query: &SearchQuery) -> ShopResult<ProductPage> {
        let text = query.text.trim();
        if text.is_empty() {
            return Ok(ProductPage::new(Vec::new(), query.page));
        }

        let body = self
            .get_json(
                "api/products/search2",
                &[
                    ("seller_id", self.config.seller_id.clone()),
                    ("search", text.to_string()),
                    ("page", query.page.to_string()),
                    ("rows", query.rows.to_string()),
                    ("currency", query.locale.currency.as_str().to_string()),
                    ("lang", query.locale.lang.clone()),
                ],
            )
            .await?;
        check_retval(&body)?;

        let products = normalize_products(&body, query.locale.currency);
        let mut page = ProductPage::new(products, query.page);
        page.total_pages = total_pages(&body);
        Ok(page)
    }

    /// Single product with description
    #[instrument(skip(self, locale))]
    pub async fn fetch_product(
        &self,
        product_id: &str,
        locale: &ShopLocale,
    ) -> ShopResult<Product> {
        validate_product_id(product_id)?;

        let body = self
            .get_json(
                &format!("api/products/{product_id}/data"),
                &[
                    ("seller_id", self.config.seller_id.clone()),
                    ("currency", locale.currency.as_str().to_string()),
                    ("lang", locale.lang.clone()),
                ],
            )
            .await?;
        check_retval(&body)?;

        body.get("product")
            .and_then(|record| normalize_product(record, locale.currency))
            .ok_or_else(|| ShopError::NotFound(format!("product {product_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("3012").is_ok());
        assert!(validate_product_id("abc_1-2").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("../admin").is_err());
        assert!(validate_product_id("1?x=2").is_err());
    }
}
