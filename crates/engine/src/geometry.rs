//! Dimension planning for the geometric transforms.
//!
//! All planning is pure integer math over source and requested dimensions;
//! pixel work happens elsewhere. A requested dimension of zero means
//! "derive from the other axis, preserving the source aspect ratio".

/// A resolved width/height pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// How a thumbnail request maps onto the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitPlan {
    /// The source already matches the target box exactly.
    Keep,
    /// Fit within the box, scaling down.
    Shrink(Dimensions),
    /// Fit within the box, scaling up.
    Enlarge(Dimensions),
}

/// Derive a dimension from the other axis, truncating like the aspect ratio
/// computation it replaces. Extreme ratios can truncate to zero; clamp so a
/// degenerate request still yields a valid image.
fn derived(source_axis: u32, other_source_axis: u32, other_target: u32) -> u32 {
    let value = (source_axis as f64 * (other_target as f64 / other_source_axis as f64)) as u32;
    value.max(1)
}

/// Fill in zero dimensions of the requested box from the source aspect ratio.
pub fn aspect_fill(source: Dimensions, width: u32, height: u32) -> Dimensions {
    let mut target = Dimensions { width, height };
    if width == 0 {
        target.width = derived(source.width, source.height, height);
    }
    if height == 0 {
        target.height = derived(source.height, source.width, width);
    }
    target
}

/// Plan a thumbnail: aspect-fill the box, then pick the fit direction.
///
/// The target box larger than the source in either dimension selects the
/// enlarging fit; the source exceeding the box selects the shrinking fit;
/// an exact match leaves the image untouched.
pub fn plan_thumbnail(source: Dimensions, width: u32, height: u32) -> FitPlan {
    let target = aspect_fill(source, width, height);
    if target.width > source.width || target.height > source.height {
        FitPlan::Enlarge(target)
    } else if source.width > target.width || source.height > target.height {
        FitPlan::Shrink(target)
    } else {
        FitPlan::Keep
    }
}

/// Plan a resize: each axis stretches independently to the requested size.
///
/// With `upscale` disabled, a requested dimension larger than the source
/// clamps to the source dimension. Zero dimensions derive from the other
/// axis only after that clamping, so the derived axis follows the effective
/// (not the requested) size.
pub fn plan_resize(source: Dimensions, width: u32, height: u32, upscale: bool) -> Dimensions {
    let mut target_width = if width < source.width || upscale {
        width
    } else {
        source.width
    };
    let mut target_height = if height < source.height || upscale {
        height
    } else {
        source.height
    };

    if width == 0 {
        target_width = derived(source.width, source.height, target_height);
    }
    if height == 0 {
        target_height = derived(source.height, source.width, target_width);
    }

    Dimensions {
        width: target_width,
        height: target_height,
    }
}

/// Bounding box of the source rotated by `degrees`; the canvas grows (or
/// shrinks) so nothing is cropped.
pub fn rotated_canvas(source: Dimensions, degrees: f64) -> Dimensions {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let width = (source.width as f64 * cos + source.height as f64 * sin).ceil() as u32;
    let height = (source.width as f64 * sin + source.height as f64 * cos).ceil() as u32;
    Dimensions {
        width: width.max(1),
        height: height.max(1),
    }
}
