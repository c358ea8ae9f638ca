//! Print option catalogs: sizes, materials, frames, and mats.

use crate::types::Price;

/// A print size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub dimensions: &'static str,
    price_cents: i64,
}

/// A print material (paper, canvas, metal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    price_cents: i64,
}

/// A frame. `frame-0` is the "no frame" choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    price_cents: i64,
}

/// A mat border. `mat-0` is the "no mat" choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatOption {
    pub id: &'static str,
    pub name: &'static str,
    /// Border width as printed, e.g. `2"`.
    pub size: &'static str,
    price_cents: i64,
}

pub const NO_FRAME_ID: &str = "frame-0";
pub const NO_MAT_ID: &str = "mat-0";

pub static SIZES: [SizeOption; 4] = [
    SizeOption {
        id: "size-1",
        name: "Small",
        dimensions: "8\" × 10\"",
        price_cents: 2999,
    },
    SizeOption {
        id: "size-2",
        name: "Medium",
        dimensions: "12\" × 16\"",
        price_cents: 4999,
    },
    SizeOption {
        id: "size-3",
        name: "Large",
        dimensions: "18\" × 24\"",
        price_cents: 7999,
    },
    SizeOption {
        id: "size-4",
        name: "Extra Large",
        dimensions: "24\" × 36\"",
        price_cents: 12999,
    },
];

pub static MATERIALS: [MaterialOption; 4] = [
    MaterialOption {
        id: "material-1",
        name: "Matte Paper",
        description: "Classic matte finish with rich colors and no glare",
        image_url: "https://images.unsplash.com/photo-1517479149777-5f3b1511d5ad?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 0,
    },
    MaterialOption {
        id: "material-2",
        name: "Glossy Paper",
        description: "Vibrant colors with a reflective finish",
        image_url: "https://images.unsplash.com/photo-1587614298171-a01562f6a72b?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 1000,
    },
    MaterialOption {
        id: "material-3",
        name: "Canvas",
        description: "Textured surface with gallery-quality finish",
        image_url: "https://images.unsplash.com/photo-1579608578088-220f8d62e873?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 4000,
    },
    MaterialOption {
        id: "material-4",
        name: "Metal Print",
        description: "Stunning luminescence on aluminum sheet",
        image_url: "https://images.unsplash.com/photo-1535161466759-5717c6df5e3c?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 8000,
    },
];

pub static FRAMES: [FrameOption; 4] = [
    FrameOption {
        id: NO_FRAME_ID,
        name: "No Frame",
        description: "Print only, no frame included",
        image_url: "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 0,
    },
    FrameOption {
        id: "frame-1",
        name: "Slim Black",
        description: "Minimalist black aluminum frame",
        image_url: "https://images.unsplash.com/photo-1543857778-c4a1a3e0b2eb?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 3999,
    },
    FrameOption {
        id: "frame-2",
        name: "Classic Wood",
        description: "Elegant natural wood frame",
        image_url: "https://images.unsplash.com/photo-1598106755735-3057c8fb5cd1?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 5999,
    },
    FrameOption {
        id: "frame-3",
        name: "Modern White",
        description: "Clean white frame with mat",
        image_url: "https://images.unsplash.com/photo-1579541591970-e5a7e3a79a0f?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=60",
        price_cents: 4999,
    },
];

pub static MATS: [MatOption; 6] = [
    MatOption {
        id: NO_MAT_ID,
        name: "No Mat",
        size: "0\"",
        price_cents: 0,
    },
    MatOption {
        id: "mat-1",
        name: "Thin Mat",
        size: "1\"",
        price_cents: 999,
    },
    MatOption {
        id: "mat-2",
        name: "Standard Mat",
        size: "2\"",
        price_cents: 1499,
    },
    MatOption {
        id: "mat-3",
        name: "Medium Mat",
        size: "3\"",
        price_cents: 1999,
    },
    MatOption {
        id: "mat-4",
        name: "Wide Mat",
        size: "4\"",
        price_cents: 2499,
    },
    MatOption {
        id: "mat-5",
        name: "Extra Wide Mat",
        size: "5\"",
        price_cents: 2999,
    },
];

pub const DEFAULT_SIZE_ID: &str = "size-2";
pub const DEFAULT_MATERIAL_ID: &str = "material-1";

/// Formats the `+$x.xx` surcharge label, with `Included` for free options.
fn surcharge_label(price: Price) -> String {
    if price.is_zero() {
        "Included".to_owned()
    } else {
        format!("+{price}")
    }
}

impl SizeOption {
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }

    /// Look up a size by ID.
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        SIZES.iter().find(|s| s.id == id)
    }

    /// The default size (Medium).
    #[must_use]
    pub fn default_option() -> &'static Self {
        Self::find(DEFAULT_SIZE_ID).unwrap_or(&SIZES[1])
    }
}

impl MaterialOption {
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }

    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        MATERIALS.iter().find(|m| m.id == id)
    }

    /// The default material (Matte Paper).
    #[must_use]
    pub fn default_option() -> &'static Self {
        Self::find(DEFAULT_MATERIAL_ID).unwrap_or(&MATERIALS[0])
    }

    /// `Included` at no charge, otherwise `+$x.xx`.
    #[must_use]
    pub fn price_label(&self) -> String {
        surcharge_label(self.price())
    }
}

impl FrameOption {
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }

    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        FRAMES.iter().find(|f| f.id == id)
    }

    /// Returns `true` for the "No Frame" choice.
    #[must_use]
    pub fn is_none_option(&self) -> bool {
        self.id == NO_FRAME_ID
    }

    /// `No additional cost` for "No Frame", otherwise the surcharge label.
    #[must_use]
    pub fn price_label(&self) -> String {
        if self.is_none_option() {
            "No additional cost".to_owned()
        } else {
            surcharge_label(self.price())
        }
    }
}

impl MatOption {
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_cents(self.price_cents)
    }

    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        MATS.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn is_none_option(&self) -> bool {
        self.id == NO_MAT_ID
    }

    /// Border width in whole inches, parsed from the leading digits of `size`.
    #[must_use]
    pub fn inches(&self) -> u32 {
        let digits: String = self.size.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }

    /// `No additional cost` for "No Mat", otherwise the surcharge label.
    #[must_use]
    pub fn price_label(&self) -> String {
        if self.is_none_option() {
            "No additional cost".to_owned()
        } else {
            surcharge_label(self.price())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(SizeOption::default_option().name, "Medium");
        assert_eq!(MaterialOption::default_option().name, "Matte Paper");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<&str> = SIZES
            .iter()
            .map(|o| o.id)
            .chain(MATERIALS.iter().map(|o| o.id))
            .chain(FRAMES.iter().map(|o| o.id))
            .chain(MATS.iter().map(|o| o.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_price_labels() {
        assert_eq!(MaterialOption::find("material-1").unwrap().price_label(), "Included");
        assert_eq!(MaterialOption::find("material-3").unwrap().price_label(), "+$40.00");
        assert_eq!(FrameOption::find("frame-0").unwrap().price_label(), "No additional cost");
        assert_eq!(FrameOption::find("frame-2").unwrap().price_label(), "+$59.99");
        assert_eq!(MatOption::find("mat-0").unwrap().price_label(), "No additional cost");
        assert_eq!(MatOption::find("mat-4").unwrap().price_label(), "+$24.99");
    }

    #[test]
    fn test_mat_inches() {
        let inches: Vec<u32> = MATS.iter().map(MatOption::inches).collect();
        assert_eq!(inches, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_ids() {
        assert!(SizeOption::find("size-9").is_none());
        assert!(FrameOption::find("").is_none());
    }
}
