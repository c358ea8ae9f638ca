//! Contact page route handlers.
//!
//! Messages are validated and logged. There is no outbound mail service, so
//! a successful submission only shows a confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use photoart_core::FieldErrors;
use photoart_core::account::ContactMessage;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::Layout;

/// A frequently asked question shown under the form.
#[derive(Debug, Clone, Copy)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 6] = [
    Faq {
        question: "How long does shipping take?",
        answer: "Standard shipping within the US typically takes 5-7 business days. International shipping can take 10-14 business days. Expedited shipping options are available at checkout.",
    },
    Faq {
        question: "Do you offer custom sizes?",
        answer: "Yes! If you need a custom size that isn't listed in the standard options, please contact me directly with your requirements and I'll provide a quote.",
    },
    Faq {
        question: "Are your prints signed?",
        answer: "All prints are hand-signed and include a certificate of authenticity. Limited edition prints are numbered as well.",
    },
    Faq {
        question: "Do you take on commission work?",
        answer: "I selectively take on commission work depending on my schedule and the project. Please contact me with details about your project for consideration.",
    },
    Faq {
        question: "What's your return policy?",
        answer: "I stand behind the quality of my prints. If you're not satisfied with your purchase, contact me within 14 days of receipt for return or exchange options.",
    },
    Faq {
        question: "Can I license your photos for commercial use?",
        answer: "Yes, many of my images are available for licensing. Please contact me with details about your intended use for licensing rates and terms.",
    },
];

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    #[serde(default)]
    pub sent: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub form: ContactMessage,
    pub errors: FieldErrors,
    pub sent: bool,
    pub faqs: &'static [Faq],
}

/// Display the contact form.
#[instrument(skip(session, auth))]
pub async fn show(
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<ContactQuery>,
) -> impl IntoResponse {
    ContactTemplate {
        layout: Layout::load(&session, &auth).await,
        form: ContactMessage::default(),
        errors: FieldErrors::new(),
        sent: query.sent.is_some(),
        faqs: &FAQS,
    }
}

/// Accept a contact message.
///
/// Invalid submissions re-render the form with the entered values kept.
#[instrument(skip(session, auth, form))]
pub async fn submit(
    session: Session,
    auth: OptionalAuth,
    Form(form): Form<ContactMessage>,
) -> Response {
    match form.validate() {
        Ok(email) => {
            add_breadcrumb("contact", "Contact message received", None);
            tracing::info!(
                domain = %email.domain(),
                subject = %form.subject.trim(),
                length = form.message.len(),
                "Contact message received"
            );
            Redirect::to("/contact?sent=1").into_response()
        }
        Err(errors) => {
            let page = ContactTemplate {
                layout: Layout::load(&session, &auth).await,
                form,
                errors,
                sent: false,
                faqs: &FAQS,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

