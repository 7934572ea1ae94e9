//! Packed RGBA pixels and conversion to and from `image` buffers.
//!
//! A packed pixel keeps the decoded byte order `r, g, b, a` in memory, so a
//! `[u32]` plane is byte-for-byte the same as an RGBA8 image row.

use image::{imageops, imageops::FilterType, Rgba, RgbaImage};

#[inline]
pub fn pack_rgba(p: [u8; 4]) -> u32 {
    u32::from_le_bytes(p)
}

#[inline]
pub fn unpack_rgba(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

pub fn from_image(img: &RgbaImage) -> Vec<u32> {
    img.pixels().map(|p| pack_rgba(p.0)).collect()
}

/// `None` when `pixels` does not hold exactly `width * height` values.
pub fn to_image(width: u32, height: u32, pixels: &[u32]) -> Option<RgbaImage> {
    let bytes: Vec<u8> = pixels.iter().flat_map(|&v| unpack_rgba(v)).collect();
    RgbaImage::from_raw(width, height, bytes)
}

/// Scales `img` to exactly `width x height` when it differs.
pub fn fit(img: RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if (w, h) == (width, height) || width == 0 || height == 0 {
        return img;
    }
    log::warn!("resizing source image {w}x{h} to {width}x{height}");
    imageops::resize(&img, width, height, FilterType::Triangle)
}

/// Stand-in source when no image is given: a tiled checkerboard over a
/// diagonal colour ramp, busy enough that refraction is easy to see.
pub fn test_pattern(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let tx = width.max(1);
        let ty = height.max(1);
        let r = (x * 255 / tx) as u8;
        let b = (y * 255 / ty) as u8;
        let check = ((x / 6) + (y / 3)) % 2 == 0;
        let g = if check { 200 } else { 60 };
        Rgba([r, g, b, 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_keeps_byte_order() {
        let v = pack_rgba([1, 2, 3, 4]);
        assert_eq!(v.to_le_bytes(), [1, 2, 3, 4]);
        assert_eq!(unpack_rgba(v), [1, 2, 3, 4]);
    }

    #[test]
    fn image_conversion_is_row_major() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([9, 8, 7, 6]));
        let px = from_image(&img);
        assert_eq!(px.len(), 6);
        assert_eq!(px[5], pack_rgba([9, 8, 7, 6]));

        let back = to_image(3, 2, &px).unwrap();
        assert_eq!(back, img);
        assert!(to_image(4, 2, &px).is_none());
    }

    #[test]
    fn fit_only_resizes_when_needed() {
        let img = test_pattern(10, 6);
        assert_eq!(fit(img.clone(), 10, 6), img);
        assert_eq!(fit(img, 5, 3).dimensions(), (5, 3));
    }
}
