//! Asset errors and the font atlases used by the debug panel.

use crate::gpu::GpuContext;
use fontdue::{Font, FontSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors raised while loading images, cube maps or fonts from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cube map face '{path}' is {width}x{height}, expected {expected}x{expected}")]
    CubeFaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },
    #[error("failed to parse font '{path}': {message}")]
    Font { path: PathBuf, message: String },
}

/// Reads a whole file, attaching the path to any I/O failure.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Opaque identifier for a loaded font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub(crate) usize);

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug)]
pub struct GlyphInfo {
    /// UV rectangle in the atlas (x, y, width, height) normalized to [0, 1].
    pub uv: [f32; 4],
    pub width: u32,
    pub height: u32,
    /// Offset from the cursor position to where the glyph is drawn.
    pub offset_x: f32,
    pub offset_y: f32,
    pub advance: f32,
}

/// A font atlas containing pre-rasterized printable ASCII glyphs.
pub struct FontAtlas {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    glyphs: HashMap<char, GlyphInfo>,
    size: f32,
    line_height: f32,
}

/// Row-packs glyph rectangles into an atlas, doubling the smaller side until
/// everything fits. Returns the atlas size and the top-left of each rectangle.
fn pack_rows(sizes: &[(u32, u32)], padding: u32) -> ((u32, u32), Vec<(u32, u32)>) {
    let mut atlas = (256u32, 256u32);
    'grow: loop {
        let mut placements = Vec::with_capacity(sizes.len());
        let (mut x, mut y, mut row_height) = (padding, padding, 0u32);

        for &(w, h) in sizes {
            if x + w + padding > atlas.0 {
                x = padding;
                y += row_height + padding;
                row_height = 0;
            }
            if y + h + padding > atlas.1 || w + 2 * padding > atlas.0 {
                if atlas.0 <= atlas.1 {
                    atlas.0 *= 2;
                } else {
                    atlas.1 *= 2;
                }
                continue 'grow;
            }
            placements.push((x, y));
            x += w + padding;
            row_height = row_height.max(h);
        }

        return (atlas, placements);
    }
}

impl FontAtlas {
    /// Create an atlas from TTF/OTF data at the given pixel size.
    pub fn new(gpu: &GpuContext, font_data: &[u8], size: f32) -> Result<Self, String> {
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(str::to_string)?;

        let rasterized: Vec<(char, fontdue::Metrics, Vec<u8>)> = (32u8..=126u8)
            .map(char::from)
            .map(|c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();

        let sizes: Vec<(u32, u32)> = rasterized
            .iter()
            .map(|(_, m, _)| (m.width as u32, m.height as u32))
            .collect();
        let ((atlas_width, atlas_height), placements) = pack_rows(&sizes, 1);

        let mut atlas_data = vec![0u8; (atlas_width * atlas_height) as usize];
        let mut glyphs = HashMap::new();

        for ((c, metrics, bitmap), &(x, y)) in rasterized.iter().zip(&placements) {
            let glyph_w = metrics.width as u32;
            let glyph_h = metrics.height as u32;

            for gy in 0..glyph_h {
                let src = (gy * glyph_w) as usize;
                let dst = ((y + gy) * atlas_width + x) as usize;
                atlas_data[dst..dst + glyph_w as usize]
                    .copy_from_slice(&bitmap[src..src + glyph_w as usize]);
            }

            glyphs.insert(
                *c,
                GlyphInfo {
                    uv: [
                        x as f32 / atlas_width as f32,
                        y as f32 / atlas_height as f32,
                        glyph_w as f32 / atlas_width as f32,
                        glyph_h as f32 / atlas_height as f32,
                    ],
                    width: glyph_w,
                    height: glyph_h,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );
        }

        let extent = wgpu::Extent3d {
            width: atlas_width,
            height: atlas_height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas_width),
                rows_per_image: Some(atlas_height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Font Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let line_height = font
            .horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * 1.2);

        Ok(Self {
            texture,
            view,
            sampler,
            glyphs,
            size,
            line_height,
        })
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Loaded font atlases, addressed by [`FontId`].
#[derive(Default)]
pub struct Assets {
    pub(crate) fonts: Vec<Arc<FontAtlas>>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a font file and rasterize it at `size` pixels.
    pub fn load_font(
        &mut self,
        gpu: &GpuContext,
        path: impl AsRef<Path>,
        size: f32,
    ) -> Result<FontId, AssetError> {
        let path = path.as_ref();
        let data = read_bytes(path)?;
        let atlas = FontAtlas::new(gpu, &data, size).map_err(|message| AssetError::Font {
            path: path.to_path_buf(),
            message,
        })?;
        log::debug!("loaded panel font {} at {}px", path.display(), size);

        let id = FontId(self.fonts.len());
        self.fonts.push(Arc::new(atlas));
        Ok(id)
    }

    pub fn font(&self, id: FontId) -> Option<Arc<FontAtlas>> {
        self.fonts.get(id.0).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_keeps_glyphs_inside_atlas() {
        let sizes = vec![(40, 50); 60];
        let ((w, h), placements) = pack_rows(&sizes, 1);
        assert_eq!(placements.len(), sizes.len());
        for (&(x, y), &(gw, gh)) in placements.iter().zip(&sizes) {
            assert!(x + gw < w);
            assert!(y + gh < h);
        }
    }

    #[test]
    fn packing_grows_for_wide_glyphs() {
        let ((w, _), placements) = pack_rows(&[(600, 10)], 1);
        assert!(w >= 602);
        assert_eq!(placements, vec![(1, 1)]);
    }

    #[test]
    fn missing_font_reports_path() {
        let err = read_bytes(Path::new("does/not/exist.ttf")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.ttf"));
    }
}
