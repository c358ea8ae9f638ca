//! Print customization: option catalogs, pricing, and preview styling.

pub mod customization;
pub mod options;
pub mod preview;

pub use customization::{PrintCustomization, PrintSelection, Quantity, QuantityError};
pub use options::{FRAMES, FrameOption, MATERIALS, MATS, MatOption, MaterialOption, SIZES, SizeOption};
pub use preview::{PreviewStyle, preview_key};
