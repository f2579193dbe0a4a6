//! Shared test fixtures.

use image::DynamicImage;

/// Encode a solid RGB image of the given size as PNG bytes.
#[allow(dead_code)]
pub fn png_image(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::new_rgb8(width, height);
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode fixture image");
    buf.into_inner()
}
