//! Checkout wizard route handlers.
//!
//! `GET /checkout?step=` renders one step of the wizard. Every step is
//! submitted with a form post that updates the [`CheckoutSession`] stored in
//! the visitor's session and redirects back to the wizard (Post/Redirect/Get).
//! Out-of-order submissions are rejected with 409 Conflict.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use photoart_core::checkout::{
    CheckoutSession, CheckoutStep, ContactForm, ContactOutcome, InsuranceOption, Order,
    OrderSummary, PackingOption, PaymentError, PaymentMethod, ShippingMethod, ShippingSelection,
    StepStatus, UnknownPaymentMethod, WIRE_TRANSFER_DETAILS, WireTransferDetails, fee_label,
};
use photoart_core::{Cart, FieldErrors, OrderHistoryEntry, Price};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, login_url};
use crate::models::session;
use crate::routes::Layout;
use crate::routes::cart::CartItemView;
use crate::state::AppState;

/// Reasons listed under a failed payment.
pub const PAYMENT_FAILURE_REASONS: [&str; 5] = [
    "Insufficient funds in your account",
    "Card has expired or is invalid",
    "Bank declined the transaction",
    "Incorrect billing information",
    "Temporary technical issue with our payment processor",
];

// =============================================================================
// Form Types
// =============================================================================

/// `?step=` query.
#[derive(Debug, Default, Deserialize)]
pub struct StepQuery {
    pub step: Option<String>,
}

/// Payment step form data.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub method: String,
}

/// Shipping step form data.
#[derive(Debug, Deserialize)]
pub struct ShippingForm {
    pub method: String,
    pub packing: String,
    pub insurance: String,
}

impl ShippingForm {
    fn selection(&self) -> Option<ShippingSelection> {
        Some(ShippingSelection {
            method: ShippingMethod::parse(&self.method)?,
            packing: PackingOption::parse(&self.packing)?,
            insurance: InsuranceOption::parse(&self.insurance)?,
        })
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Step indicator entry.
#[derive(Clone)]
pub struct StepView {
    pub id: &'static str,
    pub label: &'static str,
    pub number: usize,
    /// CSS modifier: `completed`, `in-progress`, or `not-started`.
    pub status_class: &'static str,
    pub is_current: bool,
    pub navigable: bool,
}

/// A radio choice on the payment or shipping step.
#[derive(Clone)]
pub struct ChoiceView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: String,
    pub price_label: String,
    pub selected: bool,
}

/// Placed order, formatted for the confirmation step.
#[derive(Clone)]
pub struct OrderView {
    pub number: String,
    pub placed_on: String,
    pub estimated_delivery: String,
    pub email: String,
    pub item_count: u32,
    pub lines: Vec<OrderLineView>,
}

#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.clone(),
            placed_on: order.placed_on().format("%-m/%-d/%Y").to_string(),
            estimated_delivery: order.estimated_delivery().format("%-m/%-d/%Y").to_string(),
            email: order.email.to_string(),
            item_count: order.item_count(),
            lines: order
                .lines
                .iter()
                .map(|l| OrderLineView {
                    name: l.name.clone(),
                    image_url: l.image_url.clone(),
                    description: l.description.clone(),
                    quantity: l.quantity,
                    line_total: l.line_total,
                })
                .collect(),
        }
    }
}

const fn status_class(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Completed => "completed",
        StepStatus::InProgress => "in-progress",
        StepStatus::NotStarted => "not-started",
    }
}

fn step_views(checkout: &CheckoutSession) -> Vec<StepView> {
    checkout
        .wizard
        .progress()
        .map(|p| StepView {
            id: p.step.id(),
            label: p.step.label(),
            number: p.step.index() + 1,
            status_class: status_class(p.status),
            is_current: p.is_current,
            navigable: p.navigable,
        })
        .collect()
}

fn payment_choices(selected: PaymentMethod) -> Vec<ChoiceView> {
    PaymentMethod::ALL
        .into_iter()
        .map(|m| ChoiceView {
            id: m.id(),
            name: m.label(),
            description: m.description().to_string(),
            price_label: String::new(),
            selected: m == selected,
        })
        .collect()
}

fn shipping_choices(selected: ShippingMethod) -> Vec<ChoiceView> {
    ShippingMethod::ALL
        .into_iter()
        .map(|m| ChoiceView {
            id: m.id(),
            name: m.name(),
            description: m.description().to_string(),
            price_label: fee_label(m.price()),
            selected: m == selected,
        })
        .collect()
}

fn packing_choices(selected: PackingOption) -> Vec<ChoiceView> {
    PackingOption::ALL
        .into_iter()
        .map(|p| ChoiceView {
            id: p.id(),
            name: p.name(),
            description: p.description().to_string(),
            price_label: fee_label(p.price()),
            selected: p == selected,
        })
        .collect()
}

fn insurance_choices(selected: InsuranceOption) -> Vec<ChoiceView> {
    InsuranceOption::ALL
        .into_iter()
        .map(|i| ChoiceView {
            id: i.id(),
            name: i.name(),
            description: i.description().to_string(),
            price_label: fee_label(i.price()),
            selected: i == selected,
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout wizard template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    /// ID of the step being shown.
    pub step: &'static str,
    pub steps: Vec<StepView>,
    pub items: Vec<CartItemView>,
    pub summary: OrderSummary,
    pub payment_methods: Vec<ChoiceView>,
    pub payment_error: Option<PaymentError>,
    pub payment_failure_reasons: &'static [&'static str],
    pub wire_selected: bool,
    pub wire: WireTransferDetails,
    pub shipping_methods: Vec<ChoiceView>,
    pub packing_options: Vec<ChoiceView>,
    pub insurance_options: Vec<ChoiceView>,
    pub contact: ContactForm,
    pub errors: FieldErrors,
    /// Offer account creation before placing an anonymous order.
    pub account_choice: bool,
    pub login_url: String,
    pub register_url: String,
    pub order: Option<OrderView>,
}

impl CheckoutTemplate {
    fn new(layout: Layout, cart: &Cart, checkout: &CheckoutSession) -> Self {
        let step = checkout.current_step();
        let order = checkout
            .order
            .as_ref()
            .filter(|_| step == CheckoutStep::Confirmation);
        let summary = order.map_or_else(|| checkout.summary(cart), |o| o.summary);
        let contact = checkout
            .contact
            .as_ref()
            .map_or_else(ContactForm::blank, ContactForm::from_details);
        let return_to = format!("/checkout?step={}", CheckoutStep::Contact.id());
        let account_choice = checkout.account_choice_pending && !layout.signed_in();

        Self {
            step: step.id(),
            steps: step_views(checkout),
            items: cart.items().iter().map(CartItemView::from).collect(),
            summary,
            payment_methods: payment_choices(checkout.payment_method),
            payment_error: checkout.payment_error.clone(),
            payment_failure_reasons: &PAYMENT_FAILURE_REASONS,
            wire_selected: checkout.payment_method == PaymentMethod::WireTransfer,
            wire: WIRE_TRANSFER_DETAILS,
            shipping_methods: shipping_choices(checkout.shipping.method),
            packing_options: packing_choices(checkout.shipping.packing),
            insurance_options: insurance_choices(checkout.shipping.insurance),
            contact,
            errors: FieldErrors::new(),
            account_choice,
            login_url: login_url(&return_to),
            register_url: format!(
                "/auth/register?redirect_to={}",
                urlencoding::encode(&return_to)
            ),
            order: order.map(OrderView::from),
            layout,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Generate an order number: `ORD-` then five digits, `-`, and four digits.
#[must_use]
pub fn generate_order_number() -> String {
    let mut rng = rand::rng();
    format!(
        "ORD-{:05}-{:04}",
        rng.random_range(0..100_000u32),
        rng.random_range(0..10_000u32)
    )
}

fn to_step(step: CheckoutStep) -> Response {
    Redirect::to(&format!("/checkout?step={}", step.id())).into_response()
}

async fn load(session: &Session) -> Result<(Cart, CheckoutSession)> {
    let cart = session::load_cart(session).await?;
    let checkout = session::load_checkout(session).await?;
    Ok((cart, checkout))
}

/// Empty the cart and, for a signed-in customer, add the order to their
/// history.
async fn complete_order(
    state: &AppState,
    session: &Session,
    auth: &OptionalAuth,
    cart: &mut Cart,
    order: &Order,
) -> Result<()> {
    cart.clear();
    session::save_cart(session, cart).await?;

    if let Some(user) = auth.user() {
        state
            .orders()
            .record(&user.id, OrderHistoryEntry::from(order))
            .await;
    }

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.number.as_str())]),
    );
    tracing::info!(
        order_number = %order.number,
        total = %order.summary.total,
        items = order.item_count(),
        signed_in = auth.user().is_some(),
        "Order placed"
    );
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout wizard.
///
/// An unknown or not-yet-reachable `?step=` shows the current step.
#[instrument(skip(session, auth))]
pub async fn show(
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<StepQuery>,
) -> Result<impl IntoResponse> {
    let (cart, mut checkout) = load(&session).await?;
    checkout.visit(query.step.as_deref());
    session::save_checkout(&session, &checkout).await?;

    Ok(CheckoutTemplate::new(
        Layout::new(&auth, &cart),
        &cart,
        &checkout,
    ))
}

/// Accept the cart and continue to payment.
#[instrument(skip(session))]
pub async fn submit_cart(session: Session) -> Result<Response> {
    let (cart, mut checkout) = load(&session).await?;
    let next = checkout.submit_cart(&cart)?;
    session::save_checkout(&session, &checkout).await?;

    add_breadcrumb("checkout", "Cart accepted", None);
    Ok(to_step(next))
}

/// Choose a payment method and continue to shipping.
#[instrument(skip(session))]
pub async fn submit_payment(session: Session, Form(form): Form<PaymentForm>) -> Result<Response> {
    let method: PaymentMethod = form
        .method
        .parse()
        .map_err(|e: UnknownPaymentMethod| AppError::BadRequest(e.to_string()))?;

    let mut checkout = session::load_checkout(&session).await?;
    let next = checkout.submit_payment(method)?;
    session::save_checkout(&session, &checkout).await?;

    add_breadcrumb(
        "checkout",
        "Payment method selected",
        Some(&[("method", method.id())]),
    );
    Ok(to_step(next))
}

/// Record a declined payment and show the failure panel.
#[instrument(skip(session))]
pub async fn fail_payment(session: Session) -> Result<Response> {
    let mut checkout = session::load_checkout(&session).await?;
    let code = checkout.fail_payment()?.code.clone();
    session::save_checkout(&session, &checkout).await?;

    tracing::warn!(code = %code, "Payment failed");
    Ok(to_step(CheckoutStep::Payment))
}

/// Dismiss the payment failure and try the same method again.
#[instrument(skip(session))]
pub async fn retry_payment(session: Session) -> Result<Response> {
    let mut checkout = session::load_checkout(&session).await?;
    checkout.retry_payment();
    session::save_checkout(&session, &checkout).await?;
    Ok(to_step(CheckoutStep::Payment))
}

/// Dismiss the payment failure and pick another method.
#[instrument(skip(session))]
pub async fn change_payment_method(session: Session) -> Result<Response> {
    let mut checkout = session::load_checkout(&session).await?;
    checkout.change_payment_method()?;
    session::save_checkout(&session, &checkout).await?;
    Ok(to_step(CheckoutStep::Payment))
}

/// Choose shipping, packing, and insurance and continue to contact details.
#[instrument(skip(session))]
pub async fn submit_shipping(
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let selection = form
        .selection()
        .ok_or_else(|| AppError::BadRequest("Unknown shipping option".to_string()))?;

    let mut checkout = session::load_checkout(&session).await?;
    let next = checkout.submit_shipping(selection)?;
    session::save_checkout(&session, &checkout).await?;

    add_breadcrumb(
        "checkout",
        "Shipping selected",
        Some(&[("method", selection.method.id())]),
    );
    Ok(to_step(next))
}

/// Submit contact details.
///
/// Invalid input re-renders the step with per-field messages. Signed-in
/// customers go straight to the confirmation; anonymous visitors are offered
/// an account first.
#[instrument(skip(state, session, auth, form))]
pub async fn submit_contact(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let (mut cart, mut checkout) = load(&session).await?;

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            tracing::debug!(fields = errors.len(), "Contact details rejected");
            checkout.visit(Some(CheckoutStep::Contact.id()));
            let mut page = CheckoutTemplate::new(Layout::new(&auth, &cart), &cart, &checkout);
            page.contact = form;
            page.errors = errors;
            page.account_choice = false;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let outcome = checkout.submit_contact(
        details,
        auth.user().is_some(),
        &cart,
        generate_order_number(),
        Utc::now(),
    )?;

    if outcome == ContactOutcome::OrderPlaced
        && let Some(order) = checkout.order.as_ref()
    {
        complete_order(&state, &session, &auth, &mut cart, order).await?;
    }
    session::save_checkout(&session, &checkout).await?;

    Ok(to_step(checkout.current_step()))
}

/// Place the order without creating an account.
#[instrument(skip(state, session, auth))]
pub async fn continue_as_guest(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Result<Response> {
    let (mut cart, mut checkout) = load(&session).await?;
    let order = checkout
        .continue_as_guest(&cart, generate_order_number(), Utc::now())?
        .clone();

    complete_order(&state, &session, &auth, &mut cart, &order).await?;
    session::save_checkout(&session, &checkout).await?;

    Ok(to_step(CheckoutStep::Confirmation))
}

/// Go back one step.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Response> {
    let mut checkout = session::load_checkout(&session).await?;
    let step = checkout.back();
    session::save_checkout(&session, &checkout).await?;
    Ok(to_step(step))
}

/// Leave the confirmation and start a fresh checkout.
#[instrument(skip(session))]
pub async fn finish(session: Session) -> Result<Response> {
    session::save_checkout(&session, &CheckoutSession::new()).await?;
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use photoart_core::checkout::is_order_number;

    use super::*;

    #[test]
    fn test_generated_order_numbers_are_well_formed() {
        for _ in 0..50 {
            let number = generate_order_number();
            assert!(is_order_number(&number), "{number}");
        }
    }

    #[test]
    fn test_fresh_wizard_step_views() {
        let views = step_views(&CheckoutSession::new());
        assert_eq!(views.len(), 5);
        assert_eq!(views[0].status_class, "in-progress");
        assert!(views[0].is_current);
        assert!(views[1..].iter().all(|v| v.status_class == "not-started"));
        assert!(views[1..].iter().all(|v| !v.navigable));
    }

    #[test]
    fn test_shipping_form_rejects_unknown_ids() {
        let form = ShippingForm {
            method: "teleport".to_string(),
            packing: "standard".to_string(),
            insurance: "basic".to_string(),
        };
        assert!(form.selection().is_none());
    }

    #[test]
    fn test_choices_mark_selection() {
        let choices = shipping_choices(ShippingMethod::Express);
        let selected: Vec<_> = choices.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, ShippingMethod::Express.id());
    }
}
