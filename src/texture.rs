//! Decoded images and the environment cube map.
//!
//! Decoding happens on the CPU during composition ([`TextureData`],
//! [`CubeMapData`]); the renderer uploads the cube map with
//! [`CubeTexture::new`].

use crate::assets::AssetError;
use crate::gpu::GpuContext;
use std::path::{Path, PathBuf};

/// A decoded RGBA8 image.
#[derive(Clone, Debug)]
pub struct TextureData {
    /// File the image came from (used in logs and errors).
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Decode an image file to RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| match source {
                image::ImageError::IoError(source) => AssetError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                source => AssetError::Image {
                    path: path.to_path_buf(),
                    source,
                },
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();

        Ok(Self {
            source: path.to_path_buf(),
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Wrap raw RGBA8 pixels.
    pub fn from_rgba(source: impl Into<PathBuf>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            pixels,
        }
    }

    /// Mean color of the image in [0, 1].
    pub fn average_rgb(&self) -> [f32; 3] {
        let count = (self.pixels.len() / 4).max(1) as f64;
        let mut sum = [0f64; 3];
        for px in self.pixels.chunks_exact(4) {
            for (s, &c) in sum.iter_mut().zip(px) {
                *s += c as f64;
            }
        }
        sum.map(|s| (s / count / 255.0) as f32)
    }
}

/// Six square faces of equal size, ordered +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Debug)]
pub struct CubeMapData {
    pub size: u32,
    pub faces: [TextureData; 6],
}

impl CubeMapData {
    /// Load and validate the six faces.
    pub fn load(paths: &[PathBuf; 6]) -> Result<Self, AssetError> {
        let faces = [
            TextureData::load(&paths[0])?,
            TextureData::load(&paths[1])?,
            TextureData::load(&paths[2])?,
            TextureData::load(&paths[3])?,
            TextureData::load(&paths[4])?,
            TextureData::load(&paths[5])?,
        ];
        Self::from_faces(faces)
    }

    /// Validate that every face is square and matches the first face.
    pub fn from_faces(faces: [TextureData; 6]) -> Result<Self, AssetError> {
        let size = faces[0].width;
        if let Some(bad) = faces
            .iter()
            .find(|f| f.width != size || f.height != size)
        {
            return Err(AssetError::CubeFaceSize {
                path: bad.source.clone(),
                width: bad.width,
                height: bad.height,
                expected: size,
            });
        }
        Ok(Self { size, faces })
    }

    /// Mean color over all faces; stands in for a fully blurred reflection.
    pub fn average_rgb(&self) -> [f32; 3] {
        let mut sum = [0.0f32; 3];
        for face in &self.faces {
            for (s, c) in sum.iter_mut().zip(face.average_rgb()) {
                *s += c / 6.0;
            }
        }
        sum
    }
}

/// GPU cube texture sampled by the material shader.
pub struct CubeTexture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
}

impl CubeTexture {
    /// Upload a cube map as a six-layer texture viewed as a cube.
    pub fn new(gpu: &GpuContext, data: &CubeMapData) -> Self {
        let mut pixels = Vec::with_capacity((data.size * data.size * 4 * 6) as usize);
        for face in &data.faces {
            pixels.extend_from_slice(&face.pixels);
        }
        Self::from_layers(gpu, data.size, &pixels, "Environment Cube Map")
    }

    /// A 1x1 single-color cube, bound when no environment map loaded.
    pub fn placeholder(gpu: &GpuContext) -> Self {
        let pixels = [255u8; 4 * 6];
        Self::from_layers(gpu, 1, &pixels, "Placeholder Cube Map")
    }

    fn from_layers(gpu: &GpuContext, size: u32, pixels: &[u8], label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(name: &str, size: u32, rgba: [u8; 4]) -> TextureData {
        TextureData::from_rgba(name, size, size, rgba.repeat((size * size) as usize))
    }

    #[test]
    fn cube_map_rejects_mismatched_face() {
        let faces = [
            solid("px", 4, [0; 4]),
            solid("nx", 4, [0; 4]),
            solid("py", 2, [0; 4]),
            solid("ny", 4, [0; 4]),
            solid("pz", 4, [0; 4]),
            solid("nz", 4, [0; 4]),
        ];
        match CubeMapData::from_faces(faces) {
            Err(AssetError::CubeFaceSize { path, expected, .. }) => {
                assert_eq!(path, PathBuf::from("py"));
                assert_eq!(expected, 4);
            }
            other => panic!("unexpected result: {:?}", other.map(|c| c.size)),
        }
    }

    #[test]
    fn cube_map_average_color() {
        let faces = [
            solid("px", 2, [255, 0, 0, 255]),
            solid("nx", 2, [255, 0, 0, 255]),
            solid("py", 2, [255, 0, 0, 255]),
            solid("ny", 2, [0, 0, 0, 255]),
            solid("pz", 2, [0, 0, 0, 255]),
            solid("nz", 2, [0, 0, 0, 255]),
        ];
        let cube = CubeMapData::from_faces(faces).unwrap();
        let avg = cube.average_rgb();
        assert!((avg[0] - 0.5).abs() < 1e-5);
        assert_eq!(avg[1], 0.0);
    }

    #[test]
    fn missing_image_is_io_error() {
        let err = TextureData::load("no/such/px.jpg").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
