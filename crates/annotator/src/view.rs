//! Screen↔world mapping for the canvas.
//!
//! `screen = world * zoom + pan`. Screen coordinates are canvas pixels (already
//! scaled from CSS pixels by the caller); world coordinates are image pixels.
//!
//! Pan clamping keeps the image covering the canvas along every axis where the
//! scaled image is larger than the canvas, and centers it along the others.

use nalgebra::Vector2;

use crate::geom2::Point;

/// Zoom bounds and the fit-to-view margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Canvas pixels left free on each side by `fit_to_view`.
    pub fit_padding: f64,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 10.0,
            fit_padding: 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vector2<f64>,
    pub zoom: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub limits: ViewLimits,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            pan: Vector2::zeros(),
            zoom: 1.0,
            canvas_width,
            canvas_height,
            limits: ViewLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        ((screen.to_vec() - self.pan) / self.zoom).into()
    }

    #[inline]
    pub fn world_to_screen(&self, world: Point) -> Point {
        (world.to_vec() * self.zoom + self.pan).into()
    }

    /// Shift the pan by `(dx, dy)`. With `image = Some((w, h))` the result is
    /// clamped so the image stays on the canvas.
    pub fn pan_by(&mut self, dx: f64, dy: f64, image: Option<(f64, f64)>) {
        self.pan += Vector2::new(dx, dy);
        if let Some((w, h)) = image {
            self.clamp_pan(w, h);
        }
    }

    /// Apply the image bounds to the current pan.
    pub fn clamp_pan(&mut self, image_w: f64, image_h: f64) {
        if !(image_w > 0.0 && image_h > 0.0) {
            return;
        }
        self.pan.x = clamp_axis(self.pan.x, self.canvas_width, image_w * self.zoom);
        self.pan.y = clamp_axis(self.pan.y, self.canvas_height, image_h * self.zoom);
    }

    /// Multiply the zoom by `factor` around `screen`, keeping the world point
    /// under the cursor fixed. Nothing changes when the clamped zoom equals
    /// the current one.
    pub fn zoom_at(&mut self, screen: Point, factor: f64, image: Option<(f64, f64)>) {
        let target = (self.zoom * factor).clamp(self.limits.min_zoom, self.limits.max_zoom);
        if !target.is_finite() || target == self.zoom {
            return;
        }
        let world = self.screen_to_world(screen);
        self.zoom = target;
        self.pan = screen.to_vec() - world.to_vec() * self.zoom;
        if let Some((w, h)) = image {
            self.clamp_pan(w, h);
        }
    }

    pub fn reset(&mut self) {
        self.pan = Vector2::zeros();
        self.zoom = 1.0;
    }

    /// Fit the whole image inside the padded canvas, never magnifying, and
    /// center it.
    pub fn fit_to_view(&mut self, image_w: f64, image_h: f64) {
        if !(image_w > 0.0 && image_h > 0.0) {
            return;
        }
        let pad = 2.0 * self.limits.fit_padding;
        let sx = (self.canvas_width - pad) / image_w;
        let sy = (self.canvas_height - pad) / image_h;
        self.zoom = sx.min(sy).min(1.0);
        self.pan = Vector2::new(
            (self.canvas_width - image_w * self.zoom) / 2.0,
            (self.canvas_height - image_h * self.zoom) / 2.0,
        );
    }
}

/// Pan bound along one axis: centered when the image fits, otherwise kept in
/// `[canvas - scaled, 0]`.
fn clamp_axis(pan: f64, canvas: f64, scaled: f64) -> f64 {
    if scaled <= canvas {
        (canvas - scaled) / 2.0
    } else {
        pan.clamp(canvas - scaled, 0.0)
    }
}
