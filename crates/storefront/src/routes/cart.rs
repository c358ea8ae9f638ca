//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations are plain form posts
//! that redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use photoart_core::{Cart, CartItem, CartTotals, Price, PrintCustomization, PrintSelection, Quantity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session;
use crate::routes::Layout;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub photo_id: String,
    pub title: String,
    pub image_url: String,
    pub summary: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
    pub can_increment: bool,
    pub can_decrement: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let quantity = item.quantity().get();
        Self {
            id: item.id.to_string(),
            photo_id: item.photo_id.to_string(),
            title: item.photo_title.clone(),
            image_url: item.photo_url.clone(),
            summary: item.customization.summary(),
            quantity,
            unit_price: item.unit_price(),
            line_total: item.line_total(),
            can_increment: quantity < Quantity::MAX,
            can_decrement: quantity > Quantity::MIN,
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data: the photo plus the customizer's option IDs.
///
/// Missing options take the customizer defaults.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub photo_id: String,
    pub size: Option<String>,
    pub material: Option<String>,
    pub frame: Option<String>,
    pub mat: Option<String>,
    pub quantity: Option<i64>,
}

impl AddToCartForm {
    fn selection(&self) -> PrintSelection {
        let defaults = PrintSelection::default();
        PrintSelection {
            size: self.size.clone().unwrap_or(defaults.size),
            material: self.material.clone().unwrap_or(defaults.material),
            frame: self.frame.clone().unwrap_or(defaults.frame),
            mat: self.mat.clone().unwrap_or(defaults.mat),
            quantity: self.quantity.unwrap_or(defaults.quantity),
        }
    }
}

/// Update cart form data.
///
/// Either an explicit `quantity` or an `action` of `increment`/`decrement`.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: Option<String>,
    pub action: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub items: Vec<CartItemView>,
    pub totals: CartTotals,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(session, auth))]
pub async fn show(session: Session, auth: OptionalAuth) -> Result<impl IntoResponse> {
    let cart = session::load_cart(&session).await?;

    Ok(CartShowTemplate {
        layout: Layout::new(&auth, &cart),
        items: cart.items().iter().map(CartItemView::from).collect(),
        totals: cart.totals(),
    })
}

/// Add a customized print to the cart.
///
/// Every add creates a new line, even for an identical customization.
#[instrument(skip(state, session, form), fields(photo_id = %form.photo_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let photo = state
        .catalog()
        .photo(&form.photo_id)
        .ok_or_else(|| AppError::NotFound(format!("Photo {}", form.photo_id)))?;
    let customization = PrintCustomization::from(form.selection());

    let mut cart = session::load_cart(&session).await?;
    let item_id = cart.add(
        photo.id.clone(),
        photo.title.clone(),
        photo.image_url.clone(),
        customization,
    );
    session::save_edited_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added print to cart",
        Some(&[
            ("photo_id", photo.id.as_str()),
            ("item_id", item_id.as_str()),
        ]),
    );
    tracing::info!(
        item_id = %item_id,
        print = %customization.summary(),
        "Print added to cart"
    );

    Ok(Redirect::to("/cart").into_response())
}

/// Change a line's quantity.
///
/// Quantities outside 1-10 are clamped. Unknown lines are ignored.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;

    let changed = match form.action.as_deref() {
        Some("increment") => cart.increment(&form.item_id),
        Some("decrement") => cart.decrement(&form.item_id),
        _ => {
            let requested = form
                .quantity
                .as_deref()
                .map(str::trim)
                .and_then(|q| q.parse::<i64>().ok())
                .ok_or_else(|| AppError::BadRequest("Invalid quantity".to_string()))?;
            cart.set_quantity(&form.item_id, Quantity::clamped(requested))
        }
    };

    if changed {
        session::save_edited_cart(&session, &cart).await?;
        add_breadcrumb(
            "cart",
            "Updated cart quantity",
            Some(&[("item_id", form.item_id.as_str())]),
        );
    } else {
        tracing::debug!(item_id = %form.item_id, "Cart line not found for update");
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = session::load_cart(&session).await?;

    if cart.remove(&form.item_id) {
        session::save_edited_cart(&session, &cart).await?;
        add_breadcrumb(
            "cart",
            "Removed print from cart",
            Some(&[("item_id", form.item_id.as_str())]),
        );
    }

    Ok(Redirect::to("/cart").into_response())
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart: Cart = session::load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.print_count(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use photoart_core::PhotoId;

    use super::*;

    #[test]
    fn test_item_view_bounds_quantity_controls() {
        let mut cart = Cart::new();
        let single = cart.add(
            PhotoId::new("1"),
            "Mountain Sunrise",
            "https://images.unsplash.com/photo-1",
            PrintCustomization::default(),
        );
        let full = cart.add(
            PhotoId::new("2"),
            "Ocean Waves",
            "https://images.unsplash.com/photo-2",
            PrintCustomization::default().with_quantity(Quantity::clamped(10)),
        );

        let views: Vec<_> = cart.items().iter().map(CartItemView::from).collect();
        let single_view = views.iter().find(|v| v.id == single.as_str()).unwrap();
        let full_view = views.iter().find(|v| v.id == full.as_str()).unwrap();

        assert!(!single_view.can_decrement);
        assert!(single_view.can_increment);
        assert!(full_view.can_decrement);
        assert!(!full_view.can_increment);
    }

    #[test]
    fn test_add_form_fills_missing_options_with_defaults() {
        let form = AddToCartForm {
            photo_id: "1".to_string(),
            size: Some("size-3".to_string()),
            material: None,
            frame: None,
            mat: None,
            quantity: Some(2),
        };
        let selection = form.selection();
        assert_eq!(selection.size, "size-3");
        assert_eq!(selection.material, PrintSelection::default().material);
        assert_eq!(selection.quantity, 2);
    }
}
