//! Cart route handlers.
//!
//! The cart lives on the session; handlers read it, run the core cart
//! operations, and write it back. Mutating routes validate the
//! anti-forgery nonce first and redirect to the landing page without
//! touching the cart when anything about the request is off.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{RawForm, State},
    http::HeaderMap,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use phantomtech_core::types::{Locale, ProductId};
use phantomtech_core::Cart;

use crate::error::Result;
use crate::middleware::antiforgery;
use crate::middleware::session::CART_KEY;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub formatted_price: String,
    pub formatted_subtotal: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub formatted_totals: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty(locale: &Locale) -> Self {
        Self {
            items: Vec::new(),
            formatted_totals: locale.format(rust_decimal::Decimal::ZERO),
        }
    }

    fn from_cart(cart: &Cart, locale: &Locale) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id.to_string(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    formatted_price: locale.format(item.price),
                    formatted_subtotal: locale.format(item.subtotal),
                })
                .collect(),
            formatted_totals: cart.formatted_totals.clone(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub page_title: &'static str,
    pub cart: CartView,
    pub nonce: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session.
async fn get_cart(session: &Session) -> Option<Cart> {
    session.get::<Cart>(CART_KEY).await.ok().flatten()
}

/// Write the cart back to the session.
async fn save_cart(session: &Session, cart: Cart) {
    if let Err(e) = session.insert(CART_KEY, cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page, with an explicit empty state when the
/// session has no cart yet.
#[instrument(skip(state, session, headers))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<CartShowTemplate> {
    let locale = &state.config().locale;
    let cart = get_cart(&session)
        .await
        .map_or_else(|| CartView::empty(locale), |c| CartView::from_cart(&c, locale));

    let nonce = antiforgery::issue_token(&session, &headers).await?;

    Ok(CartShowTemplate {
        page_title: "Cart",
        cart,
        nonce,
    })
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub qty: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub nonce: String,
}

/// Add a product to the cart.
///
/// Rejects the request (redirect to `/`, no mutation) when the
/// quantity is not a positive integer, the nonce is invalid, or the
/// product lookup comes back empty or fails.
#[instrument(skip(state, session, headers, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Redirect {
    let quantity = form
        .qty
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0);
    let product_id = form.product_id.trim().parse::<i32>().ok().map(ProductId::new);

    let (Some(quantity), Some(product_id)) = (quantity, product_id) else {
        return Redirect::to("/");
    };
    if !antiforgery::verify_token(&session, &headers, &form.nonce) {
        return Redirect::to("/");
    }

    match state.catalog().find_by_id(product_id).await {
        Ok(Some(product)) => {
            let mut cart = get_cart(&session).await.unwrap_or_default();
            cart.add(Some(&product), quantity, &state.config().locale);
            save_cart(&session, cart).await;
            Redirect::to("/cart")
        }
        Ok(None) => {
            tracing::warn!(%product_id, "add to cart for unknown product");
            Redirect::to("/")
        }
        Err(e) => {
            tracing::warn!("product lookup failed: {e}");
            Redirect::to("/")
        }
    }
}

/// Parsed body of the cart update form.
///
/// The form posts one `product_id[]`/`qty[]` pair per line item, but a
/// single-line cart submits bare values; both spellings normalize to
/// parallel sequences here. Quantities that fail to parse become 0
/// (removal); pairs whose product id fails to parse are dropped.
#[derive(Debug, Default, PartialEq)]
struct UpdateCartForm {
    product_ids: Vec<ProductId>,
    quantities: Vec<i64>,
    nonce: String,
}

impl UpdateCartForm {
    fn parse(body: &[u8]) -> Self {
        let mut raw_ids: Vec<String> = Vec::new();
        let mut raw_qtys: Vec<String> = Vec::new();
        let mut nonce = String::new();

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "product_id[]" | "product_id" => raw_ids.push(value.into_owned()),
                "qty[]" | "qty" => raw_qtys.push(value.into_owned()),
                "nonce" => nonce = value.into_owned(),
                _ => {}
            }
        }

        let mut form = Self {
            nonce,
            ..Self::default()
        };
        for (id, qty) in raw_ids.iter().zip(&raw_qtys) {
            if let Ok(id) = id.trim().parse::<i32>() {
                form.product_ids.push(ProductId::new(id));
                form.quantities.push(qty.trim().parse::<i64>().unwrap_or(0));
            }
        }
        form
    }
}

/// Apply new quantities to the cart.
///
/// Redirects to `/` without mutating when the nonce is invalid; with
/// no cart on the session the update is a no-op.
#[instrument(skip(state, session, headers, body))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    RawForm(body): RawForm,
) -> Redirect {
    let form = UpdateCartForm::parse(&body);

    if !antiforgery::verify_token(&session, &headers, &form.nonce) {
        return Redirect::to("/");
    }

    let Some(mut cart) = get_cart(&session).await else {
        return Redirect::to("/cart");
    };

    cart.update(&form.product_ids, &form.quantities, &state.config().locale);
    save_cart(&session, cart).await;

    Redirect::to("/cart")
}
