//! Weave rendering to image buffers
//!
//! Every warp thread / weft shot intersection becomes a square cell painted
//! in the color the shed resolver picks. Cells are drawn into an
//! [`ImageSink`], which owns the pixels and the final encoding.

use crate::document::WeaveDocument;
use crate::error::{Result, WeaveError};
use crate::options::Options;
use crate::shed::ShedResolver;
use crate::weave::{SECTION_THREADING, SECTION_TREADLING, SECTION_WARP};
use image::{imageops, Rgba, RgbaImage};
use std::collections::HashMap;
use tracing::debug;

/// Transparent background of a fresh canvas
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Physical resolution written to the `pHYs` chunk: 11811 pixels per metre
/// on both axes (chunk bytes `00 00 2E 23 00 00 2E 23 01`).
const PIXELS_PER_METER: u32 = 11_811;

/// Drawing surface the renderer paints into.
pub trait ImageSink {
    /// Canvas width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Fill the rectangle from `(x1, y1)` to `(x2, y2)`, both corners
    /// inclusive, clipped to the canvas.
    fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgba<u8>);

    /// Swap top and bottom rows.
    fn flip_vertical(&mut self);

    /// Swap left and right columns.
    fn mirror_horizontal(&mut self);

    /// Encode the finished canvas.
    fn encode(&self) -> Result<Vec<u8>>;
}

/// RGBA canvas encoded as PNG.
#[derive(Debug, Clone)]
pub struct PngCanvas {
    image: RgbaImage,
}

impl PngCanvas {
    /// Square transparent canvas.
    pub fn new(side: u32) -> Self {
        Self { image: RgbaImage::from_pixel(side, side, TRANSPARENT) }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl ImageSink for PngCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: Rgba<u8>) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || x1 >= w || y1 >= h {
            return;
        }
        let x2 = x2.min(w - 1);
        let y2 = y2.min(h - 1);
        for y in y1..=y2 {
            for x in x1..=x2 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    fn flip_vertical(&mut self) {
        imageops::flip_vertical_in_place(&mut self.image);
    }

    fn mirror_horizontal(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.image);
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let (w, h) = self.image.dimensions();
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, w, h);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: PIXELS_PER_METER,
                yppu: PIXELS_PER_METER,
                unit: png::Unit::Meter,
            }));
            let mut writer = encoder.write_header()?;
            writer.write_image_data(self.image.as_raw())?;
            writer.finish()?;
        }
        Ok(buf)
    }
}

/// Largest canvas the renderer will allocate, in pixels (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Side of the square canvas for `size` threads of `grid_size` pixels.
///
/// Canvases above [`MAX_CANVAS_PIXELS`] are rejected before any allocation.
pub fn canvas_side(size: usize, grid_size: u32) -> Result<u32> {
    let side = u32::try_from(size)
        .ok()
        .and_then(|s| s.checked_mul(grid_size))
        .filter(|&side| side > 0)
        .ok_or_else(|| {
            WeaveError::config(format!(
                "canvas of {} threads at {} px per cell is not drawable",
                size, grid_size
            ))
        })?;
    if u64::from(side) * u64::from(side) > MAX_CANVAS_PIXELS {
        return Err(WeaveError::config(format!(
            "canvas of {0}x{0} px exceeds the {1} pixel limit; lower size or grid_size",
            side, MAX_CANVAS_PIXELS
        )));
    }
    Ok(side)
}

/// Thread count recorded in the document's `WARP` section.
pub fn thread_count(doc: &WeaveDocument) -> Result<usize> {
    let threads = doc
        .get(SECTION_WARP, "Threads")
        .ok_or_else(|| WeaveError::missing(SECTION_WARP, "Threads"))?;
    threads.trim().parse().map_err(|_| WeaveError::missing(SECTION_WARP, "Threads"))
}

/// Paint every cell of the weave into `sink`, then reorient it so the warp
/// runs top to bottom.
///
/// Shots are walked in treadling order and threads in threading order. Each
/// cell spans `grid_size + 1` pixels per side, so a cell's last row and
/// column are covered by the next cell drawn.
#[tracing::instrument(skip(doc, sink))]
pub fn render_weave<S: ImageSink>(doc: &WeaveDocument, grid_size: u32, sink: &mut S) -> Result<()> {
    let resolver = ShedResolver::new(doc)?;
    let treadling = doc
        .section(SECTION_TREADLING)
        .ok_or_else(|| WeaveError::missing(SECTION_TREADLING, ""))?;
    let threading = doc
        .section(SECTION_THREADING)
        .ok_or_else(|| WeaveError::missing(SECTION_THREADING, ""))?;

    let mut color_cache: HashMap<&str, Rgba<u8>> = HashMap::new();

    for shot in treadling.keys() {
        let y1 = offset(shot, grid_size, SECTION_TREADLING)?;
        for thread in threading.keys() {
            let x1 = offset(thread, grid_size, SECTION_THREADING)?;

            let key = resolver.color_key(thread, shot)?;
            let color = match color_cache.get(key) {
                Some(&rgba) => rgba,
                None => {
                    let rgba = resolver.parse_color(key)?;
                    color_cache.insert(key, rgba);
                    rgba
                }
            };

            sink.fill_rect(
                x1,
                y1,
                x1.saturating_add(grid_size),
                y1.saturating_add(grid_size),
                color,
            );
        }
    }

    sink.flip_vertical();
    sink.mirror_horizontal();
    debug!(cells = treadling.len() * threading.len(), "rendered weave");
    Ok(())
}

/// Top-left pixel offset of a 1-based thread or shot key.
fn offset(key: &str, grid_size: u32, section: &str) -> Result<u32> {
    let index: u32 = key.parse().map_err(|_| WeaveError::missing(section, key))?;
    index
        .checked_sub(1)
        .and_then(|i| i.checked_mul(grid_size))
        .ok_or_else(|| WeaveError::missing(section, key))
}

/// Render a document onto a fresh canvas sized from its thread count.
pub fn render_canvas(doc: &WeaveDocument, options: &Options) -> Result<PngCanvas> {
    let side = canvas_side(thread_count(doc)?, options.grid_size)?;
    let mut canvas = PngCanvas::new(side);
    render_weave(doc, options.grid_size, &mut canvas)?;
    Ok(canvas)
}

/// Render a document to encoded PNG bytes.
pub fn render_image(doc: &WeaveDocument, options: &Options) -> Result<Vec<u8>> {
    render_canvas(doc, options)?.encode()
}
