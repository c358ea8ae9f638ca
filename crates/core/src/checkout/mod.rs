//! Multi-step checkout.
//!
//! [`CheckoutSession`] holds everything the wizard collects between requests:
//! the step state machine, the chosen payment method, shipping options,
//! contact details, and finally the placed [`Order`]. All transitions are
//! driven by validated form submissions.

pub mod contact;
pub mod order;
pub mod payment;
pub mod shipping;
pub mod wizard;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use contact::{Address, ContactDetails, ContactForm, DEFAULT_COUNTRY};
pub use order::{Order, OrderLine, OrderSummary, estimated_delivery, is_order_number};
pub use payment::{
    PaymentError, PaymentMethod, UnknownPaymentMethod, WIRE_TRANSFER_DETAILS, WireTransferDetails,
};
pub use shipping::{InsuranceOption, PackingOption, ShippingMethod, ShippingSelection, fee_label};
pub use wizard::{CheckoutStep, CheckoutWizard, StepError, StepProgress, StepStatus, UnknownStep};

use crate::cart::Cart;

/// Errors from checkout submissions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Step(#[from] StepError),

    /// An earlier step was never submitted.
    #[error("please complete the {0} step first")]
    Incomplete(CheckoutStep),

    #[error("contact details are missing")]
    MissingContact,

    /// The order was already placed; checkout must start over.
    #[error("this order has already been placed")]
    AlreadyPlaced,
}

/// What happened after the contact step was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The order was placed and the wizard is on the confirmation step.
    OrderPlaced,
    /// The visitor is anonymous and must choose between creating an account
    /// and continuing as a guest.
    AccountChoiceRequired,
}

/// Checkout progress stored in the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub wizard: CheckoutWizard,
    pub payment_method: PaymentMethod,
    pub payment_error: Option<PaymentError>,
    pub shipping: ShippingSelection,
    pub contact: Option<ContactDetails>,
    /// Set once an anonymous visitor's contact details were accepted.
    pub account_choice_pending: bool,
    pub order: Option<Order>,
}

impl CheckoutSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current_step(&self) -> CheckoutStep {
        self.wizard.current()
    }

    /// The step to show for a requested `?step=` value.
    ///
    /// Unknown or not-yet-reachable steps resolve to the current step.
    pub fn visit(&mut self, requested: Option<&str>) -> CheckoutStep {
        if let Some(step) = requested.and_then(|s| s.parse::<CheckoutStep>().ok()) {
            // A locked step leaves the wizard where it is
            let _ = self.wizard.go_to(step);
        }
        self.wizard.current()
    }

    /// Step indicator navigation.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Locked` for steps beyond the current one.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CheckoutError> {
        self.wizard.go_to(step)?;
        Ok(())
    }

    /// Accept the cart step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to buy.
    pub fn submit_cart(&mut self, cart: &Cart) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_open()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(self.wizard.complete(CheckoutStep::Cart)?)
    }

    /// Accept the payment step with the chosen method.
    ///
    /// # Errors
    ///
    /// Fails if an earlier step is incomplete.
    pub fn submit_payment(&mut self, method: PaymentMethod) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_open()?;
        self.require(CheckoutStep::Payment)?;
        self.payment_method = method;
        self.payment_error = None;
        Ok(self.wizard.complete(CheckoutStep::Payment)?)
    }

    /// Record the simulated payment failure. Nothing else changes.
    ///
    /// # Errors
    ///
    /// Fails if the payment step is not reachable.
    pub fn fail_payment(&mut self) -> Result<&PaymentError, CheckoutError> {
        self.wizard.go_to(CheckoutStep::Payment)?;
        let error = self.payment_error.insert(PaymentError::simulated());
        Ok(&*error)
    }

    /// Dismiss the payment error and stay on the payment step.
    pub fn retry_payment(&mut self) {
        self.payment_error = None;
    }

    /// Dismiss the payment error and return to method selection.
    ///
    /// # Errors
    ///
    /// Fails if the payment step is not reachable.
    pub fn change_payment_method(&mut self) -> Result<(), CheckoutError> {
        self.payment_error = None;
        self.wizard.go_to(CheckoutStep::Payment)?;
        Ok(())
    }

    /// Accept the shipping step.
    ///
    /// # Errors
    ///
    /// Fails if an earlier step is incomplete.
    pub fn submit_shipping(
        &mut self,
        selection: ShippingSelection,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_open()?;
        self.require(CheckoutStep::Shipping)?;
        self.shipping = selection;
        Ok(self.wizard.complete(CheckoutStep::Shipping)?)
    }

    /// Accept validated contact details.
    ///
    /// Signed-in customers go straight to the confirmation; anonymous
    /// visitors are first offered an account.
    ///
    /// # Errors
    ///
    /// Fails if an earlier step is incomplete.
    pub fn submit_contact(
        &mut self,
        details: ContactDetails,
        signed_in: bool,
        cart: &Cart,
        order_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<ContactOutcome, CheckoutError> {
        self.ensure_open()?;
        self.require(CheckoutStep::Contact)?;
        self.wizard.go_to(CheckoutStep::Contact)?;
        self.contact = Some(details);
        if signed_in {
            self.place_order(cart, order_number, now)?;
            Ok(ContactOutcome::OrderPlaced)
        } else {
            self.account_choice_pending = true;
            Ok(ContactOutcome::AccountChoiceRequired)
        }
    }

    /// Place the order as a guest after the account prompt.
    ///
    /// # Errors
    ///
    /// Fails if contact details were never accepted.
    pub fn continue_as_guest(
        &mut self,
        cart: &Cart,
        order_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&Order, CheckoutError> {
        self.place_order(cart, order_number, now)
    }

    /// Invalidate progress after the cart changed.
    ///
    /// After a placed order the checkout starts over. Otherwise every step
    /// must be submitted again; earlier choices stay as defaults. Returns
    /// whether anything was reset.
    pub fn cart_changed(&mut self) -> bool {
        if self.order.is_some() {
            *self = Self::new();
            return true;
        }
        if self.wizard == CheckoutWizard::new() && !self.account_choice_pending {
            return false;
        }
        self.wizard.reset();
        self.account_choice_pending = false;
        self.payment_error = None;
        true
    }

    /// Step back one.
    pub fn back(&mut self) -> CheckoutStep {
        self.account_choice_pending = false;
        self.payment_error = None;
        self.wizard.back()
    }

    /// Live summary for the current cart and shipping choices.
    #[must_use]
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        OrderSummary::compute(cart, &self.shipping)
    }

    fn require(&self, step: CheckoutStep) -> Result<(), CheckoutError> {
        CheckoutStep::ALL
            .into_iter()
            .take(step.index())
            .find(|s| !self.wizard.is_completed(*s))
            .map_or(Ok(()), |missing| Err(CheckoutError::Incomplete(missing)))
    }

    const fn ensure_open(&self) -> Result<(), CheckoutError> {
        if self.order.is_some() {
            return Err(CheckoutError::AlreadyPlaced);
        }
        Ok(())
    }

    fn place_order(
        &mut self,
        cart: &Cart,
        order_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&Order, CheckoutError> {
        self.ensure_open()?;
        self.require(CheckoutStep::Contact)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let email = self
            .contact
            .as_ref()
            .map(|c| c.email.clone())
            .ok_or(CheckoutError::MissingContact)?;
        self.wizard.complete(CheckoutStep::Contact)?;
        self.wizard.complete(CheckoutStep::Confirmation)?;
        self.account_choice_pending = false;
        let order = Order::place(order_number, now, email, cart, &self.shipping);
        let order = self.order.insert(order);
        Ok(&*order)
    }
}
