//! Extruded 3D title text.
//!
//! `fontdue` rasterizes glyphs to coverage bitmaps rather than exposing
//! outlines, so the title is built from coverage: the text is rasterized
//! into one [`Footprint`] grid (cells with at least 50% coverage are
//! solid), and the footprint is extruded along Z with optional terraced
//! bevels on both caps.
//!
//! Font parsing and extrusion run on a worker thread started by
//! [`TitleLoader::spawn`]; the result is collected with
//! [`PendingTitle::wait`].

use crate::assets::{AssetError, read_bytes};
use crate::geometry::RawGeometry;
use fontdue::{Font, FontSettings};
use glam::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Coverage (0-255) at or above which a raster cell counts as solid.
const COVERAGE_THRESHOLD: u8 = 128;

/// Errors raised while deriving the title geometry.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("title text {text:?} produced no geometry")]
    Empty { text: String },
    #[error("title worker exited without a result")]
    WorkerGone,
}

/// Text and extrusion parameters for the title.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TitleParams {
    pub text: String,
    /// Height of one em in world units.
    pub size: f32,
    /// Extrusion depth of the body, excluding bevels.
    pub depth: f32,
    /// Raster resolution control; glyphs are rasterized at
    /// `curve_segments * 8` pixels per em.
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// Z extent of the bevel on each cap.
    pub bevel_thickness: f32,
    /// How far the bevel steps inward.
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TitleParams {
    fn default() -> Self {
        Self {
            text: "STUDIO CARRE".to_string(),
            size: 0.7,
            depth: 0.6,
            curve_segments: 6,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

impl TitleParams {
    /// Rasterization size in pixels per em.
    pub fn raster_px(&self) -> f32 {
        (self.curve_segments.max(1) * 8) as f32
    }

    /// World-space edge length of one raster cell.
    pub fn cell_size(&self) -> f32 {
        self.size / self.raster_px()
    }

    fn bevel_layers(&self) -> u32 {
        if self.bevel_enabled {
            self.bevel_segments
        } else {
            0
        }
    }
}

/// A grid of solid cells. `y` grows upward; cells outside the grid are
/// empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Footprint {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl Footprint {
    /// Build a footprint from solid cell coordinates, shifted so the
    /// lowest coordinates land on (0, 0).
    pub fn from_cells(cells: &[(i32, i32)]) -> Self {
        let Some(min_x) = cells.iter().map(|c| c.0).min() else {
            return Self::default();
        };
        let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
        let max_x = cells.iter().map(|c| c.0).max().unwrap_or(0);
        let max_y = cells.iter().map(|c| c.1).max().unwrap_or(0);

        let mut footprint = Self {
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
            cells: vec![false; ((max_x - min_x + 1) * (max_y - min_y + 1)) as usize],
        };
        for &(x, y) in cells {
            let i = footprint.index(x - min_x, y - min_y);
            footprint.cells[i] = true;
        }
        footprint
    }

    /// Build a footprint from text rows, top row first; `#` is solid.
    pub fn from_rows(rows: &[&str]) -> Self {
        let top = rows.len() as i32 - 1;
        let cells: Vec<(i32, i32)> = rows
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .filter(|(_, c)| *c == '#')
                    .map(move |(col, _)| (col as i32, top - row as i32))
            })
            .collect();
        Self::from_cells(&cells)
    }

    /// Rasterize `text` left to right on one baseline at `px` pixels per em.
    pub fn rasterize(font: &Font, text: &str, px: f32) -> Self {
        let mut covered = Vec::new();
        let mut pen = 0.0f32;
        let mut prev = None;

        for ch in text.chars() {
            if let Some(prev) = prev {
                pen += font.horizontal_kern(prev, ch, px).unwrap_or(0.0);
            }
            let (metrics, bitmap) = font.rasterize(ch, px);
            let left = pen.round() as i32 + metrics.xmin;
            let top = metrics.ymin + metrics.height as i32 - 1;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    if bitmap[row * metrics.width + col] >= COVERAGE_THRESHOLD {
                        covered.push((left + col as i32, top - row as i32));
                    }
                }
            }

            pen += metrics.advance_width;
            prev = Some(ch);
        }

        Self::from_cells(&covered)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn filled(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height && self.cells[self.index(x, y)]
    }

    /// Shrink by `cells` in Chebyshev distance: a cell survives only if the
    /// whole square of that radius around it is solid.
    pub fn eroded(&self, cells: u32) -> Self {
        let mut current = self.clone();
        for _ in 0..cells {
            let mut next = current.clone();
            for y in 0..current.height {
                for x in 0..current.width {
                    let keep = (-1..=1)
                        .all(|dy| (-1..=1).all(|dx| current.filled(x + dx, y + dy)));
                    let i = next.index(x, y);
                    next.cells[i] = keep;
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

/// Append a quad, flipping its winding if needed so it faces `normal`.
fn push_facing(geometry: &mut RawGeometry, mut corners: [Vec3; 4], normal: Vec3) {
    if (corners[1] - corners[0])
        .cross(corners[2] - corners[0])
        .dot(normal)
        < 0.0
    {
        corners.reverse();
    }
    geometry.push_quad(corners, normal);
}

/// Horizontal runs of cells matching `solid` as caps at `z`.
fn push_cap(
    geometry: &mut RawGeometry,
    width: i32,
    height: i32,
    cell: f32,
    z: f32,
    normal: Vec3,
    solid: impl Fn(i32, i32) -> bool,
) {
    for y in 0..height {
        let mut x = 0;
        while x < width {
            if !solid(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && solid(x, y) {
                x += 1;
            }
            let (x0, x1) = (start as f32 * cell, x as f32 * cell);
            let (y0, y1) = (y as f32 * cell, (y + 1) as f32 * cell);
            push_facing(
                geometry,
                [
                    Vec3::new(x0, y0, z),
                    Vec3::new(x1, y0, z),
                    Vec3::new(x1, y1, z),
                    Vec3::new(x0, y1, z),
                ],
                normal,
            );
        }
    }
}

/// Side walls of `footprint` between `z0` and `z1`, on cell edges that
/// border an empty cell.
fn push_walls(geometry: &mut RawGeometry, footprint: &Footprint, cell: f32, z0: f32, z1: f32) {
    for y in 0..footprint.height {
        for x in 0..footprint.width {
            if !footprint.filled(x, y) {
                continue;
            }
            let sides = [
                ((1, 0), (x + 1, y), (x + 1, y + 1), Vec3::X),
                ((-1, 0), (x, y), (x, y + 1), Vec3::NEG_X),
                ((0, 1), (x, y + 1), (x + 1, y + 1), Vec3::Y),
                ((0, -1), (x, y), (x + 1, y), Vec3::NEG_Y),
            ];
            for ((dx, dy), a, b, normal) in sides {
                if footprint.filled(x + dx, y + dy) {
                    continue;
                }
                let a = Vec3::new(a.0 as f32 * cell, a.1 as f32 * cell, 0.0);
                let b = Vec3::new(b.0 as f32 * cell, b.1 as f32 * cell, 0.0);
                push_facing(
                    geometry,
                    [
                        a.with_z(z0),
                        b.with_z(z0),
                        b.with_z(z1),
                        a.with_z(z1),
                    ],
                    normal,
                );
            }
        }
    }
}

/// Extrude a footprint into a closed, recentered solid.
///
/// The body spans `depth` along Z. With bevels enabled each cap gets
/// `bevel_segments` terraced layers; layer `k` is the footprint eroded by
/// `k / segments` of `bevel_size + bevel_offset` and adds
/// `bevel_thickness / segments` of depth.
pub fn extrude(
    footprint: &Footprint,
    cell: f32,
    params: &TitleParams,
) -> Result<RawGeometry, TextError> {
    if footprint.is_empty() {
        return Err(TextError::Empty {
            text: params.text.clone(),
        });
    }

    let mut geometry = RawGeometry::default();
    let half = params.depth * 0.5;
    push_walls(&mut geometry, footprint, cell, -half, half);

    let layers = params.bevel_layers();
    let inset = (params.bevel_size + params.bevel_offset).max(0.0);
    let mut terraces = vec![footprint.clone()];
    for k in 1..=layers {
        let cells = (k as f32 / layers as f32 * inset / cell).round() as u32;
        terraces.push(footprint.eroded(cells));
    }
    let step = if layers > 0 {
        params.bevel_thickness / layers as f32
    } else {
        0.0
    };

    for sign in [1.0f32, -1.0] {
        let normal = Vec3::Z * sign;
        let z_at = |k: usize| sign * (half + step * k as f32);

        for k in 1..terraces.len() {
            let (outer, inner) = (&terraces[k - 1], &terraces[k]);
            push_cap(
                &mut geometry,
                footprint.width,
                footprint.height,
                cell,
                z_at(k - 1),
                normal,
                |x, y| outer.filled(x, y) && !inner.filled(x, y),
            );
            let (z0, z1) = (z_at(k - 1), z_at(k));
            push_walls(&mut geometry, inner, cell, z0.min(z1), z0.max(z1));
        }

        let top = terraces.len() - 1;
        let last = &terraces[top];
        push_cap(
            &mut geometry,
            footprint.width,
            footprint.height,
            cell,
            z_at(top),
            normal,
            |x, y| last.filled(x, y),
        );
    }

    geometry.recenter();
    Ok(geometry)
}

/// Rasterize and extrude the title text with an already-parsed font.
pub fn extrude_title(font: &Font, params: &TitleParams) -> Result<RawGeometry, TextError> {
    let footprint = Footprint::rasterize(font, &params.text, params.raster_px());
    log::debug!(
        "title footprint {}x{} cells, {} solid",
        footprint.width(),
        footprint.height(),
        footprint.solid_count()
    );
    extrude(&footprint, params.cell_size(), params)
}

/// Starts title derivation on a background thread.
pub struct TitleLoader;

impl TitleLoader {
    /// Read and parse the font at `font_path` and extrude the title on a
    /// worker thread. The worker never touches the scene; its only output
    /// is the returned handle.
    pub fn spawn(font_path: impl Into<PathBuf>, params: TitleParams) -> PendingTitle {
        let font_path = font_path.into();
        let (sender, receiver) = mpsc::channel();

        let worker = std::thread::Builder::new()
            .name("title-loader".into())
            .spawn(move || {
                let result = load_title(&font_path, &params);
                // The receiver may already be gone if composition was abandoned
                let _ = sender.send(result);
            });

        match worker {
            Ok(handle) => PendingTitle {
                receiver,
                worker: Some(handle),
            },
            Err(e) => {
                log::warn!("failed to start title worker: {}", e);
                PendingTitle::resolved(Err(TextError::WorkerGone))
            }
        }
    }
}

fn load_title(font_path: &Path, params: &TitleParams) -> Result<RawGeometry, TextError> {
    let data = read_bytes(font_path)?;
    let font = Font::from_bytes(data, FontSettings::default()).map_err(|message| {
        AssetError::Font {
            path: font_path.to_path_buf(),
            message: message.to_string(),
        }
    })?;
    log::debug!("parsed title font {}", font_path.display());
    extrude_title(&font, params)
}

/// Handle to a title being derived in the background.
pub struct PendingTitle {
    receiver: mpsc::Receiver<Result<RawGeometry, TextError>>,
    worker: Option<JoinHandle<()>>,
}

impl PendingTitle {
    /// A handle that is already complete.
    pub fn resolved(result: Result<RawGeometry, TextError>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(result);
        Self {
            receiver,
            worker: None,
        }
    }

    /// Block until the title geometry is ready.
    pub fn wait(mut self) -> Result<RawGeometry, TextError> {
        let result = self.receiver.recv().unwrap_or(Err(TextError::WorkerGone));
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("title worker panicked");
            }
        }
        result
    }
}
