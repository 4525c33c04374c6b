//! Normalized ↔ viewport coordinate mapping
//!
//! The reference image is letterboxed into the viewport: uniform scale
//! `min(vw / iw, vh / ih)`, centered on both axes. Only normalized
//! coordinates are ever persisted; re-fitting never touches stored points.

use serde::Serialize;

use crate::constants::canvas;
use crate::types::{DamagePoint, NormalizedPoint, Result, ValidationError, ValidationErrorKind};

/// Position in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A point projected into the current viewport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub id: String,
    pub display_number: u32,
    pub pixel: PixelPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    image_width: f64,
    image_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    hit_radius: f64,
}

impl CoordinateMapper {
    /// Mapper for an image of the given size, fitted to a viewport of the same size
    pub fn new(image_width: f64, image_height: f64) -> Result<Self> {
        if !(image_width.is_finite() && image_width > 0.0)
            || !(image_height.is_finite() && image_height > 0.0)
        {
            return Err(ValidationError::new(
                ValidationErrorKind::Range,
                "reference image dimensions must be positive",
            )
            .with_field("image")
            .with_comparison("> 0", format!("{}x{}", image_width, image_height))
            .into());
        }

        let mut mapper = Self {
            image_width,
            image_height,
            viewport_width: image_width,
            viewport_height: image_height,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            hit_radius: canvas::HIT_RADIUS_PX,
        };
        mapper.fit(image_width.max(1.0), image_height.max(1.0))?;
        Ok(mapper)
    }

    pub fn with_hit_radius(mut self, radius_px: f64) -> Self {
        self.hit_radius = radius_px.max(0.0);
        self
    }

    /// Recompute scale and centering offsets for a new viewport size
    pub fn fit(&mut self, viewport_width: f64, viewport_height: f64) -> Result<()> {
        if !(viewport_width.is_finite() && viewport_width >= 1.0)
            || !(viewport_height.is_finite() && viewport_height >= 1.0)
        {
            return Err(ValidationError::new(
                ValidationErrorKind::Range,
                "viewport must be at least 1x1 pixels",
            )
            .with_field("viewport")
            .with_comparison(">= 1x1", format!("{}x{}", viewport_width, viewport_height))
            .into());
        }

        let scale = (viewport_width / self.image_width).min(viewport_height / self.image_height);
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.scale = scale;
        self.offset_x = (viewport_width - self.image_width * scale) / 2.0;
        self.offset_y = (viewport_height - self.image_height * scale) / 2.0;

        tracing::trace!(
            "Fitted {}x{} image into {}x{} viewport (scale {:.4})",
            self.image_width,
            self.image_height,
            viewport_width,
            viewport_height,
            scale
        );
        Ok(())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn hit_radius(&self) -> f64 {
        self.hit_radius
    }

    pub fn to_pixel(&self, point: NormalizedPoint) -> PixelPoint {
        PixelPoint {
            x: point.x * self.image_width * self.scale + self.offset_x,
            y: point.y * self.image_height * self.scale + self.offset_y,
        }
    }

    /// Inverse transform, clamped into [0, 1]
    pub fn to_normalized(&self, pixel: PixelPoint) -> Result<NormalizedPoint> {
        let x = (pixel.x - self.offset_x) / (self.image_width * self.scale);
        let y = (pixel.y - self.offset_y) / (self.image_height * self.scale);
        NormalizedPoint::clamped(x, y)
    }

    /// Whether the pixel falls on the rendered image (not the letterbox margin)
    pub fn contains_pixel(&self, pixel: PixelPoint) -> bool {
        let right = self.offset_x + self.image_width * self.scale;
        let bottom = self.offset_y + self.image_height * self.scale;
        (self.offset_x..=right).contains(&pixel.x) && (self.offset_y..=bottom).contains(&pixel.y)
    }

    /// Nearest point within the hit radius.
    ///
    /// Exact distance ties go to the most recently created point; if those
    /// timestamps also match, the one later in the list wins.
    pub fn hit_test<'a>(
        &self,
        points: &'a [DamagePoint],
        pixel: PixelPoint,
    ) -> Option<&'a DamagePoint> {
        let mut best: Option<(&DamagePoint, f64)> = None;

        for point in points {
            let distance = self.to_pixel(point.position()).distance(&pixel);
            if distance > self.hit_radius {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, best_distance)) => {
                    distance < best_distance
                        || (distance == best_distance && point.created_at >= current.created_at)
                }
            };
            if better {
                best = Some((point, distance));
            }
        }

        best.map(|(point, _)| point)
    }

    /// Project every point into the current viewport, preserving list order
    pub fn project_all(&self, points: &[DamagePoint]) -> Vec<ProjectedPoint> {
        points
            .iter()
            .map(|p| ProjectedPoint {
                id: p.id.clone(),
                display_number: p.display_number,
                pixel: self.to_pixel(p.position()),
            })
            .collect()
    }
}
