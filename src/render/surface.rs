use crate::foundation::core::{Rgb8, Viewport};
use crate::foundation::error::{ContrailError, ContrailResult};

/// CPU raster surface bound to a viewport.
///
/// Pixels are premultiplied RGBA8, row-major, `width * height * 4` bytes. The
/// host composites them behind its content;
/// [`to_rgba8_over`](Self::to_rgba8_over) flattens onto an opaque background
/// for export paths.
#[derive(Debug)]
pub struct Surface {
    pixmap: vello_cpu::Pixmap,
    viewport: Viewport,
}

impl Surface {
    /// Acquire a surface sized to `viewport`.
    pub fn new(viewport: Viewport) -> ContrailResult<Self> {
        Ok(Self {
            pixmap: alloc_pixmap(viewport)?,
            viewport,
        })
    }

    /// Resize to a new viewport, dropping the old pixel buffer. Content is
    /// re-drawn on the next frame; nothing else about the session changes.
    pub fn resize(&mut self, viewport: Viewport) -> ContrailResult<()> {
        self.pixmap = alloc_pixmap(viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Flatten onto an opaque background color (premultiplied source-over),
    /// yielding straight RGBA8 with alpha 255 throughout.
    pub fn to_rgba8_over(&self, background: Rgb8) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data().len());
        for px in self.data().chunks_exact(4) {
            let inv = 255 - u16::from(px[3]);
            out.push(px[0].saturating_add(mul_div255(u16::from(background.r), inv)));
            out.push(px[1].saturating_add(mul_div255(u16::from(background.g), inv)));
            out.push(px[2].saturating_add(mul_div255(u16::from(background.b), inv)));
            out.push(255);
        }
        out
    }

    pub(crate) fn raster_size(&self) -> (u16, u16) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub(crate) fn clear_transparent(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}

fn alloc_pixmap(viewport: Viewport) -> ContrailResult<vello_cpu::Pixmap> {
    let w: u16 = viewport.width.try_into().map_err(|_| {
        ContrailError::surface(format!("surface width exceeds u16: {}", viewport.width))
    })?;
    let h: u16 = viewport.height.try_into().map_err(|_| {
        ContrailError::surface(format!("surface height exceeds u16: {}", viewport.height))
    })?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
