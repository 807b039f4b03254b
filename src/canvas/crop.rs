//! Crop the committed selection out of the original bitmap and build the
//! down-scaled preview shown next to the canvas.
use base64::Engine as _;
use image::RgbaImage;

use crate::canvas::Bitmap;
use crate::errors::{InspectorError, InspectorResult};
use crate::geometry::Rect;

/// Result of cropping a selection.
pub struct CropPreview {
    /// Full-resolution crop.
    pub image: RgbaImage,
    /// Crop scaled to fit the preview box; never upscaled.
    pub preview: RgbaImage,
    /// Region of the original bitmap that was cropped.
    pub region: Rect,
}

impl CropPreview {
    pub fn preview_scale(&self) -> f64 {
        self.preview.width() as f64 / self.image.width().max(1) as f64
    }

    pub fn png_bytes(&self) -> InspectorResult<Vec<u8>> {
        encode_png(&self.image)
    }

    pub fn preview_base64(&self) -> InspectorResult<String> {
        let bytes = encode_png(&self.preview)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// `preview_max` bounds both edges of the preview: scale is
/// `min(max / w, max / h, 1)`.
pub fn crop_region(bitmap: &Bitmap, region: Rect, preview_max: u32) -> InspectorResult<CropPreview> {
    if region.width == 0 || region.height == 0 {
        return Err(InspectorError::NoActiveSelection);
    }
    let image = bitmap.crop(region)?;
    let (cw, ch) = image.dimensions();

    let scale = (preview_max as f64 / cw as f64)
        .min(preview_max as f64 / ch as f64)
        .min(1.0);
    let preview = if scale < 1.0 {
        let pw = ((cw as f64 * scale).round() as u32).max(1);
        let ph = ((ch as f64 * scale).round() as u32).max(1);
        image::imageops::resize(&image, pw, ph, image::imageops::FilterType::Triangle)
    } else {
        image.clone()
    };

    tracing::debug!(
        x = region.x,
        y = region.y,
        width = cw,
        height = ch,
        scale,
        "selection cropped"
    );

    Ok(CropPreview {
        image,
        preview,
        region,
    })
}

pub fn encode_png(img: &RgbaImage) -> InspectorResult<Vec<u8>> {
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn bitmap(w: u32, h: u32) -> Bitmap {
        Bitmap::new(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn small_crop_is_not_upscaled() {
        let crop = crop_region(&bitmap(100, 100), Rect::new(10, 10, 50, 40), 280).unwrap();
        assert_eq!(crop.image.dimensions(), (50, 40));
        assert_eq!(crop.preview.dimensions(), (50, 40));
        assert_eq!(crop.preview_scale(), 1.0);
    }

    #[test]
    fn large_crop_fits_preview_box() {
        let crop = crop_region(&bitmap(1200, 800), Rect::new(0, 0, 1120, 560), 280).unwrap();
        assert_eq!(crop.preview.dimensions(), (280, 140));
        assert_eq!(crop.preview_scale(), 0.25);
    }

    #[test]
    fn png_round_trips_through_decoder() {
        let crop = crop_region(&bitmap(20, 20), Rect::new(2, 2, 8, 6), 280).unwrap();
        let png = crop.png_bytes().unwrap();
        let decoded = Bitmap::from_bytes(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
        assert!(!crop.preview_base64().unwrap().is_empty());
    }

    #[test]
    fn empty_region_is_rejected() {
        assert!(matches!(
            crop_region(&bitmap(20, 20), Rect::new(2, 2, 0, 6), 280),
            Err(InspectorError::NoActiveSelection)
        ));
    }
}
