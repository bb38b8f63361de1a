//! Canvas layout: device pixel sizing, pointer mapping, background fit

use glam::Vec2;

/// UV transform that makes a backdrop cover the surface
///
/// `image_uv = screen_uv * scale + offset`. The image keeps its aspect ratio,
/// fills the surface, and is cropped symmetrically on the overflowing axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl CoverFit {
    pub const IDENTITY: Self = Self {
        scale: Vec2::ONE,
        offset: Vec2::ZERO,
    };
}

/// Compute the cover fit of an image with `image_aspect` on a surface with `surface_aspect`
pub fn cover_fit(surface_aspect: f32, image_aspect: f32) -> CoverFit {
    if !(surface_aspect > 0.0 && image_aspect > 0.0) {
        return CoverFit::IDENTITY;
    }

    if surface_aspect > image_aspect {
        // Wider surface: fit width, crop top/bottom
        let visible = image_aspect / surface_aspect;
        CoverFit {
            scale: Vec2::new(1.0, visible),
            offset: Vec2::new(0.0, (1.0 - visible) / 2.0),
        }
    } else {
        // Taller (or equal) surface: fit height, crop left/right
        let visible = surface_aspect / image_aspect;
        CoverFit {
            scale: Vec2::new(visible, 1.0),
            offset: Vec2::new((1.0 - visible) / 2.0, 0.0),
        }
    }
}

/// Canvas size in CSS pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: f32,
    pub css_height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            css_width,
            css_height,
            device_pixel_ratio: if device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
        }
    }

    /// Update after a window resize
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) {
        *self = Self::new(css_width, css_height, device_pixel_ratio);
    }

    /// Backing store size in device pixels (never zero)
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.css_width * self.device_pixel_ratio).round().max(1.0);
        let h = (self.css_height * self.device_pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.physical_size();
        w as f32 / h as f32
    }

    /// Map a pointer position in CSS pixels to NDC (+y up)
    ///
    /// Positions outside the canvas map outside [-1, 1]; nothing is clamped.
    pub fn pointer_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let w = self.css_width.max(1.0);
        let h = self.css_height.max(1.0);
        Vec2::new(x / w * 2.0 - 1.0, y / h * -2.0 + 1.0)
    }

    /// Backdrop cover fit for an image of the given aspect
    pub fn cover_fit(&self, image_aspect: f32) -> CoverFit {
        cover_fit(self.aspect(), image_aspect)
    }

    /// NDC y of a band anchored `offset_css` pixels below the center (+y down)
    pub fn band_anchor(&self, offset_css: f32) -> f32 {
        let (_, h) = self.physical_size();
        let offset_px = offset_css * self.device_pixel_ratio;
        -offset_px / (h as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn test_pointer_corners() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert!(approx(vp.pointer_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0)));
        assert!(approx(vp.pointer_to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0)));
        assert!(approx(vp.pointer_to_ndc(400.0, 300.0), Vec2::ZERO));
    }

    #[test]
    fn test_pointer_off_canvas_not_clamped() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        assert!(approx(vp.pointer_to_ndc(-50.0, 150.0), Vec2::new(-2.0, -2.0)));
    }

    #[test]
    fn test_physical_size_uses_dpr() {
        let vp = Viewport::new(640.0, 360.0, 1.5);
        assert_eq!(vp.physical_size(), (960, 540));

        let collapsed = Viewport::new(0.0, 0.0, 2.0);
        assert_eq!(collapsed.physical_size(), (1, 1));

        let bad_dpr = Viewport::new(10.0, 10.0, 0.0);
        assert_eq!(bad_dpr.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_cover_fit_wide_surface_crops_vertically() {
        let fit = cover_fit(2.0, 1.0);
        assert!(approx(fit.scale, Vec2::new(1.0, 0.5)));
        assert!(approx(fit.offset, Vec2::new(0.0, 0.25)));
    }

    #[test]
    fn test_cover_fit_tall_surface_crops_horizontally() {
        let fit = cover_fit(0.5, 1.0);
        assert!(approx(fit.scale, Vec2::new(0.5, 1.0)));
        assert!(approx(fit.offset, Vec2::new(0.25, 0.0)));
    }

    #[test]
    fn test_cover_fit_matching_aspect_is_identity() {
        assert_eq!(cover_fit(1.5, 1.5), CoverFit::IDENTITY);
        assert_eq!(cover_fit(0.0, 1.5), CoverFit::IDENTITY);
    }

    #[test]
    fn test_band_anchor_scales_with_dpr() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        // 100 css px above center on a 600 css px canvas is 1/3 of the half height
        assert!((vp.band_anchor(-100.0) - 1.0 / 3.0).abs() < 1e-6);
        assert!((vp.band_anchor(100.0) + 1.0 / 3.0).abs() < 1e-6);
    }
}
