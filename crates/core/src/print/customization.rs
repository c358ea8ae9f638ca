//! Print customization and price derivation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::{
    DEFAULT_MATERIAL_ID, DEFAULT_SIZE_ID, FrameOption, MatOption, MaterialOption, NO_FRAME_ID,
    NO_MAT_ID, SizeOption,
};
use crate::types::Price;

/// Error returned when a quantity falls outside `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity must be between {min} and {max} (got {got})", min = Quantity::MIN, max = Quantity::MAX)]
pub struct QuantityError {
    pub got: i64,
}

/// Number of copies of a print, bounded to `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;
    pub const ONE: Self = Self(1);

    /// Validate a requested quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError` if `n` is outside `1..=10`.
    pub fn new(n: i64) -> Result<Self, QuantityError> {
        u32::try_from(n)
            .ok()
            .filter(|q| (Self::MIN..=Self::MAX).contains(q))
            .map(Self)
            .ok_or(QuantityError { got: n })
    }

    /// Saturate `n` into `1..=10`.
    #[must_use]
    pub fn clamped(n: i64) -> Self {
        let bounded = n.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u32::try_from(bounded).unwrap_or(Self::MIN))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more, stopping at the maximum.
    #[must_use]
    pub const fn increment(self) -> Self {
        if self.0 < Self::MAX { Self(self.0 + 1) } else { self }
    }

    /// One fewer, never below one.
    #[must_use]
    pub const fn decrement(self) -> Self {
        if self.0 > Self::MIN { Self(self.0 - 1) } else { self }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Option IDs as submitted by the customizer form or stored in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSelection {
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_material")]
    pub material: String,
    #[serde(default = "default_frame")]
    pub frame: String,
    #[serde(default = "default_mat")]
    pub mat: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_size() -> String {
    DEFAULT_SIZE_ID.to_owned()
}

fn default_material() -> String {
    DEFAULT_MATERIAL_ID.to_owned()
}

fn default_frame() -> String {
    NO_FRAME_ID.to_owned()
}

fn default_mat() -> String {
    NO_MAT_ID.to_owned()
}

const fn default_quantity() -> i64 {
    1
}

impl Default for PrintSelection {
    fn default() -> Self {
        Self {
            size: default_size(),
            material: default_material(),
            frame: default_frame(),
            mat: default_mat(),
            quantity: default_quantity(),
        }
    }
}

/// A resolved selection of print options for one photograph.
///
/// Serialized as its [`PrintSelection`] so session payloads stay small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PrintSelection", into = "PrintSelection")]
pub struct PrintCustomization {
    pub size: &'static SizeOption,
    pub material: &'static MaterialOption,
    pub frame: Option<&'static FrameOption>,
    pub mat: Option<&'static MatOption>,
    pub quantity: Quantity,
}

impl Default for PrintCustomization {
    fn default() -> Self {
        Self::from(PrintSelection::default())
    }
}

impl From<PrintSelection> for PrintCustomization {
    /// Resolve option IDs. Unknown size/material IDs fall back to the
    /// defaults, unknown frame/mat IDs to "none", and the quantity is
    /// clamped into range.
    fn from(selection: PrintSelection) -> Self {
        Self {
            size: SizeOption::find(&selection.size).unwrap_or_else(SizeOption::default_option),
            material: MaterialOption::find(&selection.material)
                .unwrap_or_else(MaterialOption::default_option),
            frame: FrameOption::find(&selection.frame),
            mat: MatOption::find(&selection.mat),
            quantity: Quantity::clamped(selection.quantity),
        }
    }
}

impl From<PrintCustomization> for PrintSelection {
    fn from(c: PrintCustomization) -> Self {
        Self {
            size: c.size.id.to_owned(),
            material: c.material.id.to_owned(),
            frame: c.frame.map_or(NO_FRAME_ID, |f| f.id).to_owned(),
            mat: c.mat.map_or(NO_MAT_ID, |m| m.id).to_owned(),
            quantity: i64::from(c.quantity.get()),
        }
    }
}

impl PrintCustomization {
    /// Price of one print: size + material + frame + mat.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.size.price()
            + self.material.price()
            + self.frame.map_or(Price::ZERO, FrameOption::price)
            + self.mat.map_or(Price::ZERO, MatOption::price)
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.unit_price() * self.quantity.get()
    }

    /// Copy with a different quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// A selected frame other than "No Frame".
    #[must_use]
    pub fn visible_frame(&self) -> Option<&'static FrameOption> {
        self.frame.filter(|f| !f.is_none_option())
    }

    /// A selected mat other than "No Mat".
    #[must_use]
    pub fn visible_mat(&self) -> Option<&'static MatOption> {
        self.mat.filter(|m| !m.is_none_option())
    }

    /// One-line description for cart rows, e.g. `Medium 12" × 16" · Glossy Paper · Slim Black`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} {}", self.size.name, self.size.dimensions),
            self.material.name.to_owned(),
        ];
        if let Some(frame) = self.visible_frame() {
            parts.push(frame.name.to_owned());
        }
        if let Some(mat) = self.visible_mat() {
            parts.push(mat.name.to_owned());
        }
        parts.join(" · ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::options::{FRAMES, MATERIALS, MATS, SIZES};
    use super::*;

    fn selection(size: &str, material: &str, frame: &str, mat: &str, quantity: i64) -> PrintSelection {
        PrintSelection {
            size: size.to_owned(),
            material: material.to_owned(),
            frame: frame.to_owned(),
            mat: mat.to_owned(),
            quantity,
        }
    }

    #[test]
    fn test_medium_glossy_slim_black_times_two() {
        let c = PrintCustomization::from(selection("size-2", "material-2", "frame-1", "mat-0", 2));
        assert_eq!(c.total_price(), Price::from_cents(19996));
        assert_eq!(c.total_price().to_string(), "$199.96");
    }

    #[test]
    fn test_total_is_sum_times_quantity_for_every_combination() {
        for size in &SIZES {
            for material in &MATERIALS {
                let frames = FRAMES.iter().map(Some).chain([None]);
                for frame in frames {
                    let mats = MATS.iter().map(Some).chain([None]);
                    for mat in mats {
                        for qty in 1..=10 {
                            let c = PrintCustomization {
                                size,
                                material,
                                frame,
                                mat,
                                quantity: Quantity::new(qty).unwrap(),
                            };
                            let expected = (size.price()
                                + material.price()
                                + frame.map_or(Price::ZERO, FrameOption::price)
                                + mat.map_or(Price::ZERO, MatOption::price))
                                * u32::try_from(qty).unwrap();
                            assert_eq!(c.total_price(), expected);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_unknown_ids_fall_back() {
        let c = PrintCustomization::from(selection("size-x", "paper", "frame-x", "mat-x", 1));
        assert_eq!(c.size.id, "size-2");
        assert_eq!(c.material.id, "material-1");
        assert!(c.frame.is_none());
        assert!(c.mat.is_none());
        assert_eq!(c.total_price(), Price::from_cents(4999));
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(11).is_err());
        assert!(Quantity::new(-3).is_err());
        assert_eq!(Quantity::new(10).unwrap().get(), 10);
        assert_eq!(Quantity::clamped(0).get(), 1);
        assert_eq!(Quantity::clamped(42).get(), 10);
        assert_eq!(Quantity::new(10).unwrap().increment().get(), 10);
        assert_eq!(Quantity::ONE.decrement().get(), 1);
    }

    #[test]
    fn test_quantity_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
    }

    #[test]
    fn test_serializes_as_selection() {
        let c = PrintCustomization::from(selection("size-3", "material-3", "frame-2", "mat-2", 4));
        let json = serde_json::to_value(c).unwrap();
        assert_eq!(json["size"], "size-3");
        assert_eq!(json["frame"], "frame-2");
        assert_eq!(json["quantity"], 4);
        let back: PrintCustomization = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_summary_skips_none_options() {
        let c = PrintCustomization::default();
        assert_eq!(c.summary(), "Medium 12\" × 16\" · Matte Paper");
        let framed = PrintCustomization::from(selection("size-1", "material-4", "frame-3", "mat-1", 1));
        assert_eq!(
            framed.summary(),
            "Small 8\" × 10\" · Metal Print · Modern White · Thin Mat"
        );
    }
}
