//! Static page route handlers: about and the not-found fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::Layout;

/// A photographer whose work shaped the studio's style.
#[derive(Debug, Clone, Copy)]
pub struct Influence {
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
}

/// An award listed on the about page.
#[derive(Debug, Clone, Copy)]
pub struct Award {
    pub award: &'static str,
    pub category: &'static str,
    pub year: &'static str,
}

/// A piece of kit with its role.
#[derive(Debug, Clone, Copy)]
pub struct Gear {
    pub name: &'static str,
    pub role: &'static str,
}

pub const INFLUENCES: [Influence; 3] = [
    Influence {
        name: "Ansel Adams",
        description: "The technical precision and emotional depth of Adams' black and white landscapes taught me the importance of patience and meticulous attention to light.",
        image_url: "https://images.unsplash.com/photo-1472791108553-c9405341e398?ixlib=rb-4.0.3&auto=format&fit=crop&w=2137&q=80",
    },
    Influence {
        name: "Galen Rowell",
        description: "Rowell's ability to capture fleeting moments of extraordinary light in remote locations continues to inspire my approach to adventure photography.",
        image_url: "https://images.unsplash.com/photo-1454496522488-7a8e488e8606?ixlib=rb-4.0.3&auto=format&fit=crop&w=2076&q=80",
    },
    Influence {
        name: "Marc Adamus",
        description: "Adamus' dramatic compositions and his mastery of challenging weather conditions have influenced my willingness to endure discomfort for the perfect shot.",
        image_url: "https://images.unsplash.com/photo-1434394354979-a235cd36269d?ixlib=rb-4.0.3&auto=format&fit=crop&w=2051&q=80",
    },
];

pub const CAMERAS: [Gear; 3] = [
    Gear { name: "Sony Alpha a7R IV", role: "Primary" },
    Gear { name: "Sony Alpha a7C", role: "Secondary" },
    Gear { name: "DJI Mavic 3 Pro", role: "Aerial" },
];

pub const LENSES: [Gear; 4] = [
    Gear { name: "Sony 16-35mm f/2.8 GM", role: "Wide" },
    Gear { name: "Sony 24-70mm f/2.8 GM", role: "Standard" },
    Gear { name: "Sony 70-200mm f/2.8 GM", role: "Telephoto" },
    Gear { name: "Sony 100-400mm f/4.5-5.6 GM", role: "Super Telephoto" },
];

pub const AWARDS: [Award; 4] = [
    Award {
        award: "International Landscape Photographer of the Year",
        category: "Finalist",
        year: "2022",
    },
    Award {
        award: "National Geographic Nature Photographer",
        category: "Editor's Pick",
        year: "2021",
    },
    Award {
        award: "Fine Art Photography Awards",
        category: "Landscape - Gold",
        year: "2020",
    },
    Award {
        award: "Outdoor Photographer of the Year",
        category: "Light on the Land",
        year: "2019",
    },
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub layout: Layout,
    pub influences: &'static [Influence],
    pub cameras: &'static [Gear],
    pub lenses: &'static [Gear],
    pub awards: &'static [Award],
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

/// Display the about page.
#[instrument(skip(session, auth))]
pub async fn about(session: Session, auth: OptionalAuth) -> impl IntoResponse {
    AboutTemplate {
        layout: Layout::load(&session, &auth).await,
        influences: &INFLUENCES,
        cameras: &CAMERAS,
        lenses: &LENSES,
        awards: &AWARDS,
    }
}

/// Fallback for unmatched routes.
#[instrument(skip(session, auth))]
pub async fn not_found(session: Session, auth: OptionalAuth) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            layout: Layout::load(&session, &auth).await,
        },
    )
}
