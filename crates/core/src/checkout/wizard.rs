//! Checkout wizard state machine.
//!
//! Each step carries its own [`StepStatus`]. A step becomes `Completed` only
//! when its form was submitted and validated; visiting a step never completes
//! it. Navigation through the step indicator is limited to the current step
//! and the steps before it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A checkout step, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Cart,
    Payment,
    Shipping,
    Contact,
    Confirmation,
}

impl CheckoutStep {
    pub const ALL: [Self; 5] = [
        Self::Cart,
        Self::Payment,
        Self::Shipping,
        Self::Contact,
        Self::Confirmation,
    ];

    /// Zero-based position in the wizard.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Cart => 0,
            Self::Payment => 1,
            Self::Shipping => 2,
            Self::Contact => 3,
            Self::Confirmation => 4,
        }
    }

    /// Identifier used in the `step` query parameter.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Payment => "payment",
            Self::Shipping => "shipping",
            Self::Contact => "contact",
            Self::Confirmation => "confirmation",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cart => "Cart",
            Self::Payment => "Payment",
            Self::Shipping => "Shipping",
            Self::Contact => "Contact",
            Self::Confirmation => "Confirmation",
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Cart => Some(Self::Payment),
            Self::Payment => Some(Self::Shipping),
            Self::Shipping => Some(Self::Contact),
            Self::Contact => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Cart => None,
            Self::Payment => Some(Self::Cart),
            Self::Shipping => Some(Self::Payment),
            Self::Contact => Some(Self::Shipping),
            Self::Confirmation => Some(Self::Contact),
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error parsing a step identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown checkout step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for CheckoutStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.id() == s)
            .ok_or_else(|| UnknownStep(s.to_owned()))
    }
}

/// Progress of a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Errors from wizard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// The step lies beyond the current step.
    #[error("checkout step {0} is not reachable yet")]
    Locked(CheckoutStep),
}

/// Step indicator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    pub step: CheckoutStep,
    pub status: StepStatus,
    pub is_current: bool,
    /// Whether the indicator may link to this step.
    pub navigable: bool,
}

/// The checkout wizard: a current step plus an explicit status per step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutWizard {
    current: CheckoutStep,
    statuses: [StepStatus; 5],
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        let mut wizard = Self {
            current: CheckoutStep::Cart,
            statuses: [StepStatus::NotStarted; 5],
        };
        wizard.mark_started(CheckoutStep::Cart);
        wizard
    }
}

impl CheckoutWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> CheckoutStep {
        self.current
    }

    #[must_use]
    pub fn status(&self, step: CheckoutStep) -> StepStatus {
        self.statuses
            .get(step.index())
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_completed(&self, step: CheckoutStep) -> bool {
        self.status(step) == StepStatus::Completed
    }

    /// Whether the step indicator may navigate to `step`.
    #[must_use]
    pub const fn can_go_to(&self, step: CheckoutStep) -> bool {
        step.index() <= self.current.index()
    }

    /// Move to the current step or an earlier one.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Locked` if `step` lies beyond the current step.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), StepError> {
        if !self.can_go_to(step) {
            return Err(StepError::Locked(step));
        }
        self.current = step;
        self.mark_started(step);
        Ok(())
    }

    /// Record a valid submission of `step` and advance to the next step.
    ///
    /// Returns the new current step.
    ///
    /// # Errors
    ///
    /// Returns `StepError::Locked` if `step` lies beyond the current step.
    pub fn complete(&mut self, step: CheckoutStep) -> Result<CheckoutStep, StepError> {
        self.go_to(step)?;
        self.set_status(step, StepStatus::Completed);
        if let Some(next) = step.next() {
            self.current = next;
            self.mark_started(next);
        }
        Ok(self.current)
    }

    /// Step back one. Does nothing on the first step.
    pub fn back(&mut self) -> CheckoutStep {
        if let Some(previous) = self.current.previous() {
            self.current = previous;
            self.mark_started(previous);
        }
        self.current
    }

    /// Whether every step before `step` has been completed.
    #[must_use]
    pub fn prerequisites_met(&self, step: CheckoutStep) -> bool {
        CheckoutStep::ALL
            .into_iter()
            .take(step.index())
            .all(|s| self.is_completed(s))
    }

    /// Step indicator entries in wizard order.
    pub fn progress(&self) -> impl Iterator<Item = StepProgress> + '_ {
        CheckoutStep::ALL.into_iter().map(|step| StepProgress {
            step,
            status: self.status(step),
            is_current: step == self.current,
            navigable: self.can_go_to(step),
        })
    }

    /// Start over from an empty cart step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn mark_started(&mut self, step: CheckoutStep) {
        if self.status(step) == StepStatus::NotStarted {
            self.set_status(step, StepStatus::InProgress);
        }
    }

    fn set_status(&mut self, step: CheckoutStep, status: StepStatus) {
        if let Some(slot) = self.statuses.get_mut(step.index()) {
            *slot = status;
        }
    }
}
