//! Photo detail and print customizer route handlers.
//!
//! The customizer is a plain GET form, so it works without JavaScript. When
//! the request carries `HX-Request: true`, only the preview and price
//! fragment is rendered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use photoart_core::print::{FRAMES, MATERIALS, MATS, SIZES, preview_key};
use photoart_core::{Photo, PreviewStyle, Price, PrintCustomization, PrintSelection, Quantity};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::{Layout, is_htmx};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Everything the preview pane and price box need.
#[derive(Clone)]
pub struct PreviewView {
    pub image_url: String,
    pub title: String,
    /// Changes whenever an option changes; drives the fade-in animation.
    pub key: String,
    pub container_css: String,
    pub mat_css: String,
    pub image_css: String,
    pub inner_mat: bool,
    pub summary: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub total_price: Price,
}

impl PreviewView {
    #[must_use]
    pub fn new(photo: &Photo, customization: &PrintCustomization) -> Self {
        let style = PreviewStyle::derive(customization);
        Self {
            image_url: photo.image_url.clone(),
            title: photo.title.clone(),
            key: preview_key(customization),
            container_css: style.container_css(),
            mat_css: style.mat_css(),
            image_css: style.image_css(),
            inner_mat: style.frame.inner_mat,
            summary: customization.summary(),
            quantity: customization.quantity.get(),
            unit_price: customization.unit_price(),
            total_price: customization.total_price(),
        }
    }
}

/// One selectable print option in the customizer.
#[derive(Clone)]
pub struct OptionView {
    pub id: &'static str,
    pub name: &'static str,
    pub detail: &'static str,
    pub price_label: String,
    pub image_url: Option<&'static str>,
    pub selected: bool,
}

/// Option groups with the current selection marked.
#[derive(Clone)]
pub struct OptionGroups {
    pub sizes: Vec<OptionView>,
    pub materials: Vec<OptionView>,
    pub frames: Vec<OptionView>,
    pub mats: Vec<OptionView>,
}

impl OptionGroups {
    #[must_use]
    pub fn for_selection(selection: &PrintSelection) -> Self {
        Self {
            sizes: SIZES
                .iter()
                .map(|s| OptionView {
                    id: s.id,
                    name: s.name,
                    detail: s.dimensions,
                    price_label: s.price().to_string(),
                    image_url: None,
                    selected: s.id == selection.size,
                })
                .collect(),
            materials: MATERIALS
                .iter()
                .map(|m| OptionView {
                    id: m.id,
                    name: m.name,
                    detail: m.description,
                    price_label: m.price_label(),
                    image_url: Some(m.image_url),
                    selected: m.id == selection.material,
                })
                .collect(),
            frames: FRAMES
                .iter()
                .map(|f| OptionView {
                    id: f.id,
                    name: f.name,
                    detail: f.description,
                    price_label: f.price_label(),
                    image_url: Some(f.image_url),
                    selected: f.id == selection.frame,
                })
                .collect(),
            mats: MATS
                .iter()
                .map(|m| OptionView {
                    id: m.id,
                    name: m.name,
                    detail: m.size,
                    price_label: m.price_label(),
                    image_url: None,
                    selected: m.id == selection.mat,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Photo detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "photos/show.html")]
pub struct PhotoShowTemplate {
    pub layout: Layout,
    pub photo: Photo,
    pub preview: PreviewView,
}

/// Print customizer page template.
#[derive(Template, WebTemplate)]
#[template(path = "photos/customize.html")]
pub struct CustomizeTemplate {
    pub layout: Layout,
    pub photo: Photo,
    pub options: OptionGroups,
    pub preview: PreviewView,
    pub quantity_min: u32,
    pub quantity_max: u32,
}

/// Preview and price fragment returned to HTMX requests.
#[derive(Template, WebTemplate)]
#[template(path = "partials/print_preview.html")]
pub struct PrintPreviewTemplate {
    pub preview: PreviewView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display a photo with a quick preview of the default print.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Path(id): Path<String>,
) -> Result<Response> {
    let photo = state
        .catalog()
        .photo(&id)
        .ok_or_else(|| AppError::NotFound(format!("Photo {id}")))?
        .clone();
    let preview = PreviewView::new(&photo, &PrintCustomization::default());

    Ok(PhotoShowTemplate {
        layout: Layout::load(&session, &auth).await,
        photo,
        preview,
    }
    .into_response())
}

/// Display the print customizer.
///
/// Unknown option IDs fall back to defaults and the quantity is clamped, so
/// a hand-edited query string still renders a valid print.
#[instrument(skip(state, session, auth, headers))]
pub async fn customize(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(selection): Query<PrintSelection>,
) -> Result<Response> {
    let photo = state
        .catalog()
        .photo(&id)
        .ok_or_else(|| AppError::NotFound(format!("Photo {id}")))?
        .clone();
    let customization = PrintCustomization::from(selection);
    let preview = PreviewView::new(&photo, &customization);

    if is_htmx(&headers) {
        return Ok(PrintPreviewTemplate { preview }.into_response());
    }

    // Re-derive the IDs so fallbacks show as the selected option.
    let selection = PrintSelection::from(customization);

    Ok(CustomizeTemplate {
        layout: Layout::load(&session, &auth).await,
        photo,
        options: OptionGroups::for_selection(&selection),
        preview,
        quantity_min: Quantity::MIN,
        quantity_max: Quantity::MAX,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_groups_mark_exactly_one_selected() {
        let groups = OptionGroups::for_selection(&PrintSelection::default());
        for group in [&groups.sizes, &groups.materials, &groups.frames, &groups.mats] {
            assert_eq!(group.iter().filter(|o| o.selected).count(), 1);
        }
    }

    #[test]
    fn test_preview_view_prices_follow_quantity() {
        let catalog = photoart_core::Catalog::sample();
        let photo = &catalog.photos()[0];
        let customization = PrintCustomization::from(PrintSelection {
            quantity: 3,
            ..PrintSelection::default()
        });
        let view = PreviewView::new(photo, &customization);
        assert_eq!(view.quantity, 3);
        assert_eq!(view.total_price, view.unit_price * 3);
    }
}
