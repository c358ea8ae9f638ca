//! Account route handlers.
//!
//! These routes require authentication; anonymous visitors are redirected to
//! the login page and brought back afterwards.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use photoart_core::account::ProfileForm;
use photoart_core::{FieldErrors, OrderHistoryEntry, User};
use tower_sessions::Session;
use tracing::instrument;

use crate::auth::AuthAction;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::session;
use crate::routes::Layout;
use crate::state::AppState;

/// Order history row display data for templates.
#[derive(Clone)]
pub struct OrderRowView {
    pub number: String,
    pub placed_on: String,
    pub status: &'static str,
    pub badge_class: &'static str,
    pub estimated_delivery: String,
    pub item_count: u32,
    pub total: String,
}

impl From<&OrderHistoryEntry> for OrderRowView {
    fn from(entry: &OrderHistoryEntry) -> Self {
        Self {
            number: entry.number.clone(),
            placed_on: entry.placed_on_display(),
            status: entry.status.label(),
            badge_class: entry.status.badge_class(),
            estimated_delivery: entry.estimated_delivery(),
            item_count: entry.item_count,
            total: entry.total.to_string(),
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub profile: User,
    /// Value of the name field.
    pub name: String,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRowView>,
}

async fn layout_for(session: &Session, user: &User) -> Layout {
    let cart = session::load_cart(session).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load cart for header");
        photoart_core::Cart::new()
    });
    Layout {
        user: Some(user.clone()),
        cart_count: cart.print_count(),
    }
}

/// Display the profile form.
#[instrument(skip(session, current))]
pub async fn profile(session: Session, RequireAuth(current): RequireAuth) -> impl IntoResponse {
    ProfileTemplate {
        layout: layout_for(&session, &current.user).await,
        name: current.user.name.clone().unwrap_or_default(),
        profile: current.user,
        errors: FieldErrors::new(),
        error: None,
        success: None,
    }
}

/// Update the display name.
#[instrument(skip(state, session, current, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => {
            let page = ProfileTemplate {
                layout: layout_for(&session, &current.user).await,
                name: form.name,
                profile: current.user,
                errors,
                error: None,
                success: None,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    match state
        .auth()
        .update_profile(current.auth.access_token(), &name)
        .await
    {
        Ok(user) => {
            add_breadcrumb("account", "Profile updated", None);
            tracing::info!(user_id = %user.id, "Profile updated");
            Ok(ProfileTemplate {
                layout: layout_for(&session, &user).await,
                name: user.name.clone().unwrap_or(name),
                profile: user,
                errors: FieldErrors::new(),
                error: None,
                success: Some("Profile updated successfully".to_string()),
            }
            .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Profile update failed");
            let page = ProfileTemplate {
                layout: layout_for(&session, &current.user).await,
                name,
                profile: current.user,
                errors: FieldErrors::new(),
                error: Some(AuthAction::UpdateProfile.user_message(&e)),
                success: None,
            };
            Ok((StatusCode::BAD_GATEWAY, page).into_response())
        }
    }
}

/// Display the signed-in user's order history, newest first.
#[instrument(skip(state, session, current))]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> impl IntoResponse {
    let orders = state.orders().for_user(&current.user.id).await;

    OrdersTemplate {
        layout: layout_for(&session, &current.user).await,
        orders: orders.iter().map(OrderRowView::from).collect(),
    }
}
