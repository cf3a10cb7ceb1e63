//! Normalization of fetched images into padded canvases.
//!
//! [`Compositor::compose`] runs the full per-item transformation:
//!
//! 1. decode the raw bytes (format inferred from content)
//! 2. convert to 8-bit RGBA, whatever the source channel layout
//! 3. scale to fit `max_content_size`, preserving aspect ratio
//! 4. place the result centered on a `canvas_size` canvas filled with
//!    `padding_color`, alpha-compositing through the content's own alpha
//! 5. encode the canvas as PNG

pub mod canvas;
pub mod geometry;

use crate::core::config::CompositionConfig;
use crate::core::error::ProcessError;
use crate::core::types::Size;
use crate::fetch::RawImage;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;
use std::io::Cursor;

/// A finished canvas ready for storage.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    /// The composed canvas, exactly `canvas_size`.
    pub canvas: RgbaImage,
    /// Size the content was resampled to.
    pub content_size: Size,
    /// Top-left of the content on the canvas (may be negative).
    pub offset: (i64, i64),
    /// PNG encoding of `canvas`.
    pub encoded: Vec<u8>,
}

/// Turns raw image bytes into padded canvases.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    filter: FilterType,
}

impl Compositor {
    /// Compositor using Lanczos3 resampling.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Use a different resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Decode, fit, center, and encode one fetched image.
    pub fn compose(
        &self,
        raw: &RawImage,
        config: &CompositionConfig,
    ) -> Result<OutputArtifact, ProcessError> {
        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ProcessError::Decode(e.to_string()))?;
        debug!(
            "Decoded {} as {}x{} {:?}",
            raw.url,
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        let (canvas, content_size, offset) = self.place(decoded, config)?;
        let encoded = encode_png(&canvas)?;

        Ok(OutputArtifact {
            canvas,
            content_size,
            offset,
            encoded,
        })
    }

    /// The in-memory part of [`compose`](Self::compose): no decoding, no encoding.
    pub fn compose_image(
        &self,
        decoded: DynamicImage,
        config: &CompositionConfig,
    ) -> Result<RgbaImage, ProcessError> {
        self.place(decoded, config).map(|(canvas, _, _)| canvas)
    }

    fn place(
        &self,
        decoded: DynamicImage,
        config: &CompositionConfig,
    ) -> Result<(RgbaImage, Size, (i64, i64)), ProcessError> {
        let rgba = decoded.into_rgba8();
        let (src_width, src_height) = rgba.dimensions();
        let content_size = geometry::fit_within(
            Size::new(src_width, src_height),
            config.max_content_size,
        )?;

        let resized = if content_size == Size::new(src_width, src_height) {
            rgba
        } else {
            image::imageops::resize(&rgba, content_size.width, content_size.height, self.filter)
        };

        let mut canvas = canvas::blank_canvas(config.canvas_size, config.padding_color);
        let (x, y) = geometry::center_offset(config.canvas_size, content_size);
        canvas::alpha_over(&mut canvas, &resized, x, y);

        Ok((canvas, content_size, (x, y)))
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an RGBA buffer as PNG.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, ProcessError> {
    let mut buffer = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ProcessError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
