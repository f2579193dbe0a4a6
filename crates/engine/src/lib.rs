//! Pure image transforms for darkroom.
//!
//! The engine is a pure function from (validated parameters, source bytes)
//! to encoded output bytes: decode, dispatch on the transform mode, apply
//! the geometry, re-encode. It holds no state and touches no storage.

pub mod encode;
pub mod error;
pub mod geometry;

pub use error::{EngineError, EngineResult};

use darkroom_core::params::{FlipDirection, ParamSet, TransformMode};
use geometry::{Dimensions, FitPlan};
use image::DynamicImage;
use image::imageops::FilterType;

/// Transform capability, kept behind a trait so the orchestrator depends on
/// the seam rather than a concrete codec stack.
pub trait TransformEngine: Send + Sync + 'static {
    fn transform(&self, params: &ParamSet, source: &[u8]) -> EngineResult<Vec<u8>>;
}

/// The `image`-crate implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageEngine;

impl ImageEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TransformEngine for ImageEngine {
    fn transform(&self, params: &ParamSet, source: &[u8]) -> EngineResult<Vec<u8>> {
        let img = image::load_from_memory(source).map_err(EngineError::Decode)?;

        let transformed = match params.mode {
            TransformMode::Thumbnail => thumbnail(
                img,
                params.width.unwrap_or(0),
                params.height.unwrap_or(0),
            ),
            TransformMode::Resize => resize(
                img,
                params.width.unwrap_or(0),
                params.height.unwrap_or(0),
                params.upscale,
            ),
            TransformMode::Flip => {
                let Some(direction) = params.direction else {
                    return Err(EngineError::MissingParameter("direction"));
                };
                flip(img, direction)
            }
            TransformMode::Rotate => {
                let Some(degree) = params.degree else {
                    return Err(EngineError::MissingParameter("degree"));
                };
                rotate(img, degree)
            }
        };

        encode::encode(&transformed, params.format, params.quality)
    }
}

fn dimensions_of(img: &DynamicImage) -> Dimensions {
    Dimensions {
        width: img.width(),
        height: img.height(),
    }
}

fn thumbnail(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    match geometry::plan_thumbnail(dimensions_of(&img), width, height) {
        FitPlan::Keep => img,
        // Both directions fit within the box preserving aspect ratio; the
        // plan split mirrors the shrink-only/enlarge-only selection.
        FitPlan::Shrink(target) | FitPlan::Enlarge(target) => {
            img.resize(target.width, target.height, FilterType::Lanczos3)
        }
    }
}

fn resize(img: DynamicImage, width: u32, height: u32, upscale: bool) -> DynamicImage {
    let target = geometry::plan_resize(dimensions_of(&img), width, height, upscale);
    img.resize_exact(target.width, target.height, FilterType::Lanczos3)
}

fn flip(img: DynamicImage, direction: FlipDirection) -> DynamicImage {
    match direction {
        FlipDirection::Horizontal => img.fliph(),
        FlipDirection::Vertical => img.flipv(),
    }
}

fn rotate(img: DynamicImage, degree: f64) -> DynamicImage {
    let normalized = degree.rem_euclid(360.0);
    if normalized == 0.0 {
        return img;
    }
    if normalized == 90.0 {
        return img.rotate90();
    }
    if normalized == 180.0 {
        return img.rotate180();
    }
    if normalized == 270.0 {
        return img.rotate270();
    }

    // Arbitrary angle: center the image on the rotated bounding box, then
    // rotate about the canvas center. The corners stay transparent; JPEG
    // encoding flattens them later.
    let canvas_size = geometry::rotated_canvas(dimensions_of(&img), normalized);
    let mut canvas = image::RgbaImage::new(canvas_size.width, canvas_size.height);
    // The bounding box can be narrower than the source (wide image, steep
    // angle), so the offset may be negative; overlay clips as needed.
    let dx = (canvas_size.width as i64 - img.width() as i64) / 2;
    let dy = (canvas_size.height as i64 - img.height() as i64) / 2;
    image::imageops::overlay(&mut canvas, &img.to_rgba8(), dx, dy);

    let rotated = imageproc::geometric_transformations::rotate_about_center(
        &canvas,
        normalized.to_radians() as f32,
        imageproc::geometric_transformations::Interpolation::Bilinear,
        image::Rgba([0, 0, 0, 0]),
    );
    DynamicImage::ImageRgba8(rotated)
}
