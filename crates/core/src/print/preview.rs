//! Preview style mapping.
//!
//! Turns a print customization into the presentation parameters used to fake
//! the finished print on screen: a border for the frame, an image filter for
//! the material, a relative size for the print dimensions, and white padding
//! for the mat. Unknown option IDs map to an empty style.

use super::customization::PrintCustomization;

const FRAME_SHADOW_DARK: &str = "0 0 15px rgba(0, 0, 0, 0.5)";
const FRAME_SHADOW_LIGHT: &str = "0 0 15px rgba(0, 0, 0, 0.3)";
const DEFAULT_SCALE_PERCENT: u8 = 90;
const MAT_PIXELS_PER_INCH: u32 = 16;

/// Border and shadow emulating a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStyle {
    pub border: Option<&'static str>,
    pub box_shadow: Option<&'static str>,
    /// Draw a 15px white inner mat (the Modern White frame ships with one).
    pub inner_mat: bool,
}

/// A texture blended over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOverlay {
    pub image_url: &'static str,
    pub blend_mode: &'static str,
    pub opacity: &'static str,
}

/// Image filter emulating a material finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialStyle {
    pub filter: Option<&'static str>,
    pub texture: Option<TextureOverlay>,
}

/// Style parameters for the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewStyle {
    pub frame: FrameStyle,
    pub material: MaterialStyle,
    /// Width and height of the print relative to the preview pane.
    pub scale_percent: u8,
    /// Mat border, e.g. `32px solid white`.
    pub mat_border: Option<String>,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            frame: FrameStyle::default(),
            material: MaterialStyle::default(),
            scale_percent: DEFAULT_SCALE_PERCENT,
            mat_border: None,
        }
    }
}

impl PreviewStyle {
    /// Derive the preview style for a customization.
    #[must_use]
    pub fn derive(customization: &PrintCustomization) -> Self {
        Self {
            frame: frame_style(customization.frame.map(|f| f.id)),
            material: material_style(customization.material.id, customization.material.image_url),
            scale_percent: scale_percent(customization.size.id),
            mat_border: customization
                .visible_mat()
                .map(|mat| format!("{}px solid white", mat.inches() * MAT_PIXELS_PER_INCH)),
        }
    }

    /// Inline CSS for the framed print container.
    #[must_use]
    pub fn container_css(&self) -> String {
        let mut css = format!(
            "width: {pct}%; height: {pct}%;",
            pct = self.scale_percent
        );
        if let Some(border) = self.frame.border {
            css.push_str(&format!(" border: {border};"));
        }
        if let Some(shadow) = self.frame.box_shadow {
            css.push_str(&format!(" box-shadow: {shadow};"));
        }
        css
    }

    /// Inline CSS for the mat wrapper around the image.
    #[must_use]
    pub fn mat_css(&self) -> String {
        self.mat_border
            .as_ref()
            .map(|border| format!("border: {border};"))
            .unwrap_or_default()
    }

    /// Inline CSS for the image itself.
    #[must_use]
    pub fn image_css(&self) -> String {
        let mut declarations = Vec::new();
        if let Some(filter) = self.material.filter {
            declarations.push(format!("filter: {filter};"));
        }
        if let Some(texture) = self.material.texture {
            declarations.push(format!("background-image: url({});", texture.image_url));
            declarations.push(format!("background-blend-mode: {};", texture.blend_mode));
            declarations.push(format!("opacity: {};", texture.opacity));
        }
        declarations.join(" ")
    }
}

/// Re-render key for the preview animation:
/// `{size}-{material}-{frame|no-frame}-{mat|no-mat}`.
#[must_use]
pub fn preview_key(customization: &PrintCustomization) -> String {
    format!(
        "{}-{}-{}-{}",
        customization.size.id,
        customization.material.id,
        customization.frame.map_or("no-frame", |f| f.id),
        customization.mat.map_or("no-mat", |m| m.id),
    )
}

fn frame_style(frame_id: Option<&str>) -> FrameStyle {
    match frame_id {
        Some("frame-1") => FrameStyle {
            border: Some("20px solid #111"),
            box_shadow: Some(FRAME_SHADOW_DARK),
            inner_mat: false,
        },
        Some("frame-2") => FrameStyle {
            border: Some("30px solid #5d4037"),
            box_shadow: Some(FRAME_SHADOW_DARK),
            inner_mat: false,
        },
        Some("frame-3") => FrameStyle {
            border: Some("25px solid #f5f5f5"),
            box_shadow: Some(FRAME_SHADOW_LIGHT),
            inner_mat: true,
        },
        _ => FrameStyle::default(),
    }
}

fn material_style(material_id: &str, image_url: &'static str) -> MaterialStyle {
    match material_id {
        "material-1" => MaterialStyle {
            filter: Some("saturate(0.95) contrast(1.05)"),
            texture: None,
        },
        "material-2" => MaterialStyle {
            filter: Some("saturate(1.2) contrast(1.1)"),
            texture: None,
        },
        "material-3" => MaterialStyle {
            filter: Some("saturate(0.9) contrast(1.15)"),
            texture: Some(TextureOverlay {
                image_url,
                blend_mode: "multiply",
                opacity: "0.95",
            }),
        },
        "material-4" => MaterialStyle {
            filter: Some("saturate(1.3) contrast(1.2) brightness(1.1)"),
            texture: None,
        },
        _ => MaterialStyle::default(),
    }
}

fn scale_percent(size_id: &str) -> u8 {
    match size_id {
        "size-1" => 80,
        "size-2" => 90,
        "size-3" => 95,
        "size-4" => 100,
        _ => DEFAULT_SCALE_PERCENT,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::print::PrintSelection;

    fn derive(size: &str, material: &str, frame: &str, mat: &str) -> PreviewStyle {
        PreviewStyle::derive(&PrintCustomization::from(PrintSelection {
            size: size.to_owned(),
            material: material.to_owned(),
            frame: frame.to_owned(),
            mat: mat.to_owned(),
            quantity: 1,
        }))
    }

    #[test]
    fn test_no_frame_no_mat_is_plain() {
        let style = derive("size-2", "material-1", "frame-0", "mat-0");
        assert_eq!(style.frame, FrameStyle::default());
        assert!(style.mat_border.is_none());
        assert_eq!(style.container_css(), "width: 90%; height: 90%;");
        assert_eq!(style.mat_css(), "");
    }

    #[test]
    fn test_slim_black_frame() {
        let style = derive("size-4", "material-2", "frame-1", "mat-0");
        assert_eq!(
            style.container_css(),
            "width: 100%; height: 100%; border: 20px solid #111; box-shadow: 0 0 15px rgba(0, 0, 0, 0.5);"
        );
        assert_eq!(style.image_css(), "filter: saturate(1.2) contrast(1.1);");
    }

    #[test]
    fn test_modern_white_has_inner_mat() {
        let style = derive("size-1", "material-1", "frame-3", "mat-0");
        assert!(style.frame.inner_mat);
        assert_eq!(style.frame.box_shadow, Some(FRAME_SHADOW_LIGHT));
        assert_eq!(style.scale_percent, 80);
    }

    #[test]
    fn test_canvas_texture() {
        let style = derive("size-3", "material-3", "frame-2", "mat-0");
        let css = style.image_css();
        assert!(css.starts_with("filter: saturate(0.9) contrast(1.15);"));
        assert!(css.contains("background-blend-mode: multiply;"));
        assert!(css.contains("opacity: 0.95;"));
        assert_eq!(style.scale_percent, 95);
    }

    #[test]
    fn test_mat_border_is_sixteen_px_per_inch() {
        assert_eq!(
            derive("size-2", "material-1", "frame-0", "mat-2").mat_border.as_deref(),
            Some("32px solid white")
        );
        assert_eq!(
            derive("size-2", "material-1", "frame-0", "mat-5").mat_css(),
            "border: 80px solid white;"
        );
    }

    #[test]
    fn test_unknown_keys_fall_back_to_defaults() {
        assert_eq!(frame_style(Some("frame-9")), FrameStyle::default());
        assert_eq!(frame_style(None), FrameStyle::default());
        assert_eq!(material_style("vellum", ""), MaterialStyle::default());
        assert_eq!(scale_percent("size-0"), DEFAULT_SCALE_PERCENT);
    }

    #[test]
    fn test_preview_key() {
        let c = PrintCustomization::from(PrintSelection {
            frame: "none".to_owned(),
            mat: "mat-3".to_owned(),
            ..PrintSelection::default()
        });
        assert_eq!(preview_key(&c), "size-2-material-1-no-frame-mat-3");
    }
}
