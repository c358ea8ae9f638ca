//! Home page route handler: hero, gallery with collection filter, and
//! testimonials.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use photoart_core::{Collection, CollectionId, Photo};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::Layout;
use crate::state::AppState;

/// A customer quote shown below the gallery.
#[derive(Clone)]
pub struct Testimonial {
    pub name: &'static str,
    pub location: &'static str,
    pub quote: &'static str,
}

const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Sarah Johnson",
        location: "New York, NY",
        quote: "The print quality exceeded my expectations. The colors are vibrant and the \
                detail is incredible.",
    },
    Testimonial {
        name: "Michael Chen",
        location: "San Francisco, CA",
        quote: "I've ordered three prints so far and each one has been perfect. The framing \
                options are excellent too.",
    },
    Testimonial {
        name: "Emma Rodriguez",
        location: "Austin, TX",
        quote: "Fast shipping and the packaging was very secure. The print looks amazing in \
                my living room!",
    },
];

/// Gallery filter query.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub collection: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub collections: Vec<Collection>,
    /// ID of the selected collection filter.
    pub active: String,
    /// Banner for the selected collection; `None` for `all`.
    pub active_collection: Option<Collection>,
    pub photos: Vec<Photo>,
    pub testimonials: Vec<Testimonial>,
}

/// Display the home page.
///
/// `?collection=` selects the gallery filter. An unknown ID shows an empty
/// gallery with no banner.
#[instrument(skip(state, session, auth))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let active = query
        .collection
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| CollectionId::ALL.to_owned());

    let photos = catalog.filter(&active).cloned().collect();
    let active_collection = catalog
        .collection(&active)
        .filter(|c| !c.is_all())
        .cloned();

    HomeTemplate {
        layout: Layout::load(&session, &auth).await,
        collections: catalog.collections().to_vec(),
        active,
        active_collection,
        photos,
        testimonials: TESTIMONIALS.to_vec(),
    }
}
