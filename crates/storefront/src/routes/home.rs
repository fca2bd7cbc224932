//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::HeaderMap};
use tower_sessions::Session;
use tracing::instrument;

use phantomtech_core::types::Locale;
use phantomtech_core::{Cart, Product};

use crate::error::Result;
use crate::middleware::antiforgery;
use crate::middleware::session::CART_KEY;
use crate::state::AppState;

/// Number of products shown on the landing page.
const FEATURED_PRODUCT_LIMIT: i64 = 6;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub product_id: String,
    pub name: String,
    pub formatted_price: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ProductView {
    fn from_product(product: &Product, locale: &Locale) -> Self {
        Self {
            product_id: product.product_id.to_string(),
            name: product.name.clone(),
            formatted_price: locale.format(product.price),
            description: product.description.clone(),
            image: product.image.clone(),
        }
    }
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page_title: &'static str,
    pub products: Vec<ProductView>,
    pub nonce: String,
}

/// Display the product listing.
///
/// A visitor's first request seeds an empty cart on the session; the
/// listing shows the six highest-priced products with a price above
/// zero. A catalog failure surfaces as a generic error status.
#[instrument(skip(state, session, headers))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<IndexTemplate> {
    if session.get::<Cart>(CART_KEY).await.ok().flatten().is_none() {
        session.insert(CART_KEY, Cart::new()).await?;
    }

    let nonce = antiforgery::issue_token(&session, &headers).await?;

    let locale = &state.config().locale;
    let products = state
        .catalog()
        .find_featured(FEATURED_PRODUCT_LIMIT)
        .await?
        .iter()
        .map(|product| ProductView::from_product(product, locale))
        .collect();

    Ok(IndexTemplate {
        page_title: "PhantomTech Store",
        products,
        nonce,
    })
}
