//! Mapping between the unbounded lattice and a finite pixel surface.
//!
//! The visible window is `rows × cols` cells centred on [`Viewport::center`];
//! its top-left cell is `center - floor(extent / 2)` on each axis. Pixel `x`
//! runs along columns and pixel `y` along rows.

use crate::cell::{Bounds, Position};
use crate::config::ZoomConfig;

/// Visible window size in whole cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Extent {
    pub rows: u32,
    pub cols: u32,
}

impl Extent {
    #[must_use]
    pub fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// A fractional lattice coordinate, as produced by [`screen_to_lattice`].
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct LatticePoint {
    pub row: f64,
    pub col: f64,
}

impl LatticePoint {
    /// The cell containing this point.
    #[must_use]
    pub fn cell(self) -> Position {
        Position::new(self.row.floor() as i32, self.col.floor() as i32)
    }
}

/// Sign convention for [`pan_by`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PanMode {
    /// The world follows the pointer, so the centre moves against the motion.
    Drag,
    /// Explicit controls move the centre along the delta.
    Scroll,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

#[must_use]
pub fn visible_extent(surface_width: u32, surface_height: u32, cell_size: u32) -> Extent {
    if cell_size == 0 {
        return Extent::default();
    }
    Extent {
        rows: surface_height / cell_size,
        cols: surface_width / cell_size,
    }
}

#[must_use]
pub fn top_left(center: Position, extent: Extent) -> Position {
    center.offset(-((extent.rows / 2) as i32), -((extent.cols / 2) as i32))
}

/// Inverse of the render mapping. The result keeps its fractional part so brush
/// centres are sub-cell precise.
#[must_use]
pub fn screen_to_lattice(
    pixel_x: f64,
    pixel_y: f64,
    center: Position,
    extent: Extent,
    cell_size: u32,
) -> LatticePoint {
    let origin = top_left(center, extent);
    let size = f64::from(cell_size.max(1));
    LatticePoint {
        row: f64::from(origin.row) + pixel_y / size,
        col: f64::from(origin.col) + pixel_x / size,
    }
}

/// Pixel deltas rounded to whole cells and applied to `center`.
#[must_use]
pub fn pan_by(
    center: Position,
    pixel_dx: f64,
    pixel_dy: f64,
    cell_size: u32,
    mode: PanMode,
) -> Position {
    let size = f64::from(cell_size.max(1));
    let d_row = cells_from_pixels(pixel_dy, size);
    let d_col = cells_from_pixels(pixel_dx, size);
    match mode {
        PanMode::Drag => center.offset(d_row.saturating_neg(), d_col.saturating_neg()),
        PanMode::Scroll => center.offset(d_row, d_col),
    }
}

fn cells_from_pixels(pixels: f64, cell_size: f64) -> i32 {
    if pixels.is_finite() {
        (pixels / cell_size).round() as i32
    } else {
        0
    }
}

/// One zoom step. Positive `direction` enlarges cells, negative shrinks them,
/// zero leaves them alone; the result stays within the configured range.
#[must_use]
pub fn zoom(cell_size: u32, direction: i32, limits: &ZoomConfig) -> u32 {
    let next = match direction.signum() {
        1 => cell_size.saturating_add(limits.zoom_step),
        -1 => cell_size.saturating_sub(limits.zoom_step),
        _ => cell_size,
    };
    limits.clamp(next)
}

/// Continuous zoom by `ratio` (pinch gestures), clamped like [`zoom`].
#[must_use]
pub fn pinch(cell_size: u32, ratio: f64, limits: &ZoomConfig) -> u32 {
    if !(ratio.is_finite() && ratio > 0.0) {
        return limits.clamp(cell_size);
    }
    let scaled = (f64::from(cell_size) * ratio).round();
    limits.clamp(scaled.min(f64::from(u32::MAX)) as u32)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Viewport {
    pub center: Position,
    pub cell_size: u32,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(surface_width: u32, surface_height: u32, cell_size: u32) -> Self {
        Self {
            center: Position::default(),
            cell_size,
            surface_width,
            surface_height,
        }
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        visible_extent(self.surface_width, self.surface_height, self.cell_size)
    }

    /// Nothing can be drawn until the surface has a size.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.extent().cells() > 0
    }

    #[must_use]
    pub fn top_left(&self) -> Position {
        top_left(self.center, self.extent())
    }

    #[must_use]
    pub fn screen_to_lattice(&self, pixel_x: f64, pixel_y: f64) -> LatticePoint {
        screen_to_lattice(pixel_x, pixel_y, self.center, self.extent(), self.cell_size)
    }

    /// Pixel position of a cell's top-left corner, if it is on screen.
    #[must_use]
    pub fn lattice_to_screen(&self, p: Position) -> Option<(u32, u32)> {
        let (screen_row, screen_col) = self.screen_cell(p)?;
        Some((screen_col * self.cell_size, screen_row * self.cell_size))
    }

    /// `(screen_row, screen_col)` of a visible cell.
    #[must_use]
    pub fn screen_cell(&self, p: Position) -> Option<(u32, u32)> {
        let extent = self.extent();
        let origin = self.top_left();
        let screen_row = i64::from(p.row) - i64::from(origin.row);
        let screen_col = i64::from(p.col) - i64::from(origin.col);
        let inside = (0..i64::from(extent.rows)).contains(&screen_row)
            && (0..i64::from(extent.cols)).contains(&screen_col);
        inside.then_some((screen_row as u32, screen_col as u32))
    }

    pub fn pan_by(&mut self, pixel_dx: f64, pixel_dy: f64, mode: PanMode) {
        self.center = pan_by(self.center, pixel_dx, pixel_dy, self.cell_size, mode);
    }

    /// Drag gesture: `origin` is the centre when the drag started and the deltas
    /// are measured from the press point, so rounding never accumulates.
    pub fn drag_from(&mut self, origin: Position, pixel_dx: f64, pixel_dy: f64) {
        self.center = pan_by(origin, pixel_dx, pixel_dy, self.cell_size, PanMode::Drag);
    }

    pub fn nudge(&mut self, arrow: Arrow) {
        let (d_row, d_col) = match arrow {
            Arrow::Up => (-1, 0),
            Arrow::Down => (1, 0),
            Arrow::Left => (0, -1),
            Arrow::Right => (0, 1),
        };
        self.center = self.center.offset(d_row, d_col);
    }

    pub fn resize(&mut self, surface_width: u32, surface_height: u32) {
        self.surface_width = surface_width;
        self.surface_height = surface_height;
    }

    /// Lattice position at which a `width × height` pattern's top-left must be
    /// placed for its box to sit centred in the window.
    #[must_use]
    pub fn placement_offset(&self, width: u32, height: u32) -> Position {
        let extent = self.extent();
        let origin = self.top_left();
        let d_row = (i64::from(extent.rows) - i64::from(height)).div_euclid(2);
        let d_col = (i64::from(extent.cols) - i64::from(width)).div_euclid(2);
        origin.offset(saturate(d_row), saturate(d_col))
    }

    /// Every visible cell in row-major order with its screen coordinates.
    pub fn visible(&self) -> impl Iterator<Item = (u32, u32, Position)> {
        let extent = self.extent();
        let origin = self.top_left();
        (0..extent.rows).flat_map(move |screen_row| {
            (0..extent.cols).map(move |screen_col| {
                (
                    screen_row,
                    screen_col,
                    origin.offset(screen_row as i32, screen_col as i32),
                )
            })
        })
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Fit of the live population and the visible window into a small overview map.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MinimapLayout {
    /// Minimap pixels per cell.
    pub scale: f64,
    /// Lattice position drawn at the minimap's top-left pixel.
    pub origin: Position,
    /// Visible window as `[x, y, width, height]` in minimap pixels.
    pub view: [f64; 4],
}

impl MinimapLayout {
    /// Minimap pixel of a lattice cell as `(x, y)`.
    #[must_use]
    pub fn project(&self, p: Position) -> (f64, f64) {
        (
            (f64::from(p.col) - f64::from(self.origin.col)) * self.scale,
            (f64::from(p.row) - f64::from(self.origin.row)) * self.scale,
        )
    }
}

/// Cells of padding kept around the population on the minimap.
pub const MINIMAP_PADDING: i32 = 2;

/// `None` for an empty board or a zero-sized map.
#[must_use]
pub fn minimap_layout(
    population: Option<Bounds>,
    viewport: &Viewport,
    map_width: u32,
    map_height: u32,
) -> Option<MinimapLayout> {
    if map_width == 0 || map_height == 0 {
        return None;
    }
    let bounds = population?.padded(MINIMAP_PADDING);
    let scale = (f64::from(map_width) / f64::from(bounds.width()))
        .min(f64::from(map_height) / f64::from(bounds.height()));
    let origin = Position::new(bounds.min_row, bounds.min_col);
    let layout = MinimapLayout {
        scale,
        origin,
        view: [0.0; 4],
    };

    let extent = viewport.extent();
    let (x, y) = layout.project(viewport.top_left());
    Some(MinimapLayout {
        view: [x, y, f64::from(extent.cols) * scale, f64::from(extent.rows) * scale],
        ..layout
    })
}
