//! The control surface driven by the UI layer.
//!
//! [`Universe`] owns the authoritative board, the viewport, the timer gate and
//! the visual overlays. Every call runs to completion before the next one, and
//! the render path reads the committed state directly.

use tracing::{debug, info, trace, warn};
use wasm_bindgen::prelude::*;

use crate::brush::{stamp_brush, BrushMode, BrushShape};
use crate::cell::{CellKey, Position};
use crate::clock::{SimClock, Ticket};
use crate::config::LifeConfig;
use crate::error::Result;
use crate::overlay::{FadeField, HeatField, HeatSettings, TraceField};
use crate::palette::{age_color, Rgba};
use crate::pattern::{self, PatternFormat};
use crate::viewport::{self, Arrow, Extent, MinimapLayout, PanMode, Viewport};
use crate::{Board, TickStats};

/// One visible cell with something to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub screen_row: u32,
    pub screen_col: u32,
    pub position: Position,
    pub age: u32,
    pub fade: f32,
    pub color: Rgba,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub extent: Extent,
    pub cell_size: u32,
    pub sprites: Vec<Sprite>,
}

impl Frame {
    /// `[screen_row, screen_col, 0xRRGGBBAA]` triples, the layout handed to JS.
    #[must_use]
    pub fn packed(&self) -> Vec<u32> {
        self.sprites
            .iter()
            .flat_map(|s| [s.screen_row, s.screen_col, s.color.packed()])
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin: Position,
    pixel_x: f64,
    pixel_y: f64,
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct Universe {
    config: LifeConfig,
    board: Board,
    viewport: Viewport,
    clock: SimClock,
    brush_size: u32,
    brush_shape: BrushShape,
    stroke: Option<BrushMode>,
    drag: Option<DragState>,
    fade: FadeField,
    heat: HeatField,
    trace: TraceField,
    generation: u64,
}

impl Universe {
    /// Empty universe on a `width × height` pixel surface with default settings.
    #[must_use]
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self::with_config(LifeConfig::default(), surface_width, surface_height)
    }

    #[must_use]
    pub fn with_config(config: LifeConfig, surface_width: u32, surface_height: u32) -> Self {
        let config = config.sanitized();
        Self {
            board: Board::new(),
            viewport: Viewport::new(surface_width, surface_height, config.zoom.initial_cell_size),
            clock: SimClock::new(config.speed.clone()),
            brush_size: config.brush.initial_size,
            brush_shape: config.brush.shape,
            stroke: None,
            drag: None,
            fade: FadeField::new(),
            heat: HeatField::new(),
            trace: TraceField::new(),
            generation: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn fade(&self) -> &FadeField {
        &self.fade
    }

    #[must_use]
    pub fn heat(&self) -> &HeatField {
        &self.heat
    }

    #[must_use]
    pub fn trace(&self) -> &TraceField {
        &self.trace
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    #[must_use]
    pub fn period_ms(&self) -> u32 {
        self.clock.period_ms()
    }

    #[must_use]
    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Starts the run loop. The host schedules [`Universe::on_timer`] with the
    /// returned ticket every [`Universe::period_ms`].
    pub fn start(&mut self) -> Ticket {
        let was_running = self.clock.is_running();
        let ticket = self.clock.start();
        if !was_running {
            info!(
                generation = self.generation,
                period_ms = self.clock.period_ms(),
                "simulation started"
            );
        }
        ticket
    }

    pub fn stop(&mut self) {
        if self.clock.is_running() {
            info!(generation = self.generation, "simulation stopped");
        }
        self.clock.stop();
    }

    /// Timer callback. Advances one generation and returns `true` when the host
    /// should schedule the next firing; a stale or stopped ticket does nothing.
    pub fn on_timer(&mut self, ticket: Ticket) -> bool {
        if !self.clock.accepts(ticket) {
            trace!(ticket = ticket.0, "ignoring stale timer firing");
            return false;
        }
        self.step();
        true
    }

    /// Advances exactly one generation and updates the per-generation overlays.
    pub fn step(&mut self) -> TickStats {
        let stats = self.board.tick();
        self.generation += 1;

        if self.config.heat.enabled {
            let settings = HeatSettings::from(&self.config.heat);
            self.heat.record_generation(self.board.live(), &settings);
        }
        if self.config.trace.enabled {
            self.trace.record_generation(self.board.live());
        }

        debug!(
            generation = self.generation,
            population = stats.population,
            births = stats.births,
            deaths = stats.deaths,
            "generation advanced"
        );
        stats
    }

    /// Stops the simulation and empties the board and every overlay.
    pub fn clear(&mut self) {
        self.stop();
        self.board.clear();
        self.fade.clear();
        self.heat.clear();
        self.trace.clear();
        self.generation = 0;
        info!("board cleared");
    }

    pub fn reset_heat(&mut self) {
        self.heat.clear();
    }

    pub fn reset_trace(&mut self) {
        self.trace.clear();
    }

    /// Returns the period actually applied.
    pub fn set_speed(&mut self, period_ms: u32) -> u32 {
        self.clock.set_period(period_ms)
    }

    pub fn resize(&mut self, surface_width: u32, surface_height: u32) {
        self.viewport.resize(surface_width, surface_height);
    }

    /// Explicit pan control: moves the centre along the pixel delta.
    pub fn pan_by(&mut self, pixel_dx: f64, pixel_dy: f64) {
        self.viewport.pan_by(pixel_dx, pixel_dy, PanMode::Scroll);
    }

    pub fn set_center(&mut self, center: Position) {
        self.viewport.center = center;
    }

    pub fn nudge(&mut self, arrow: Arrow) {
        self.viewport.nudge(arrow);
    }

    pub fn begin_drag(&mut self, pixel_x: f64, pixel_y: f64) {
        self.drag = Some(DragState {
            origin: self.viewport.center,
            pixel_x,
            pixel_y,
        });
    }

    /// Pans so the world follows the pointer since [`Universe::begin_drag`].
    pub fn drag_to(&mut self, pixel_x: f64, pixel_y: f64) {
        if let Some(drag) = self.drag {
            self.viewport
                .drag_from(drag.origin, pixel_x - drag.pixel_x, pixel_y - drag.pixel_y);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// One zoom step; positive enlarges cells. Returns the new cell size.
    pub fn zoom(&mut self, direction: i32) -> u32 {
        self.viewport.cell_size =
            viewport::zoom(self.viewport.cell_size, direction, &self.config.zoom);
        self.viewport.cell_size
    }

    /// Wheel zoom: scrolling up (negative delta) zooms in.
    pub fn wheel(&mut self, delta_y: f64) -> u32 {
        let direction = if delta_y < 0.0 {
            1
        } else if delta_y > 0.0 {
            -1
        } else {
            0
        };
        self.zoom(direction)
    }

    pub fn pinch(&mut self, ratio: f64) -> u32 {
        self.viewport.cell_size =
            viewport::pinch(self.viewport.cell_size, ratio, &self.config.zoom);
        self.viewport.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: u32) -> u32 {
        self.viewport.cell_size = self.config.zoom.clamp(cell_size);
        self.viewport.cell_size
    }

    #[must_use]
    pub fn minimap(&self, map_width: u32, map_height: u32) -> Option<MinimapLayout> {
        viewport::minimap_layout(self.board.bounds(), &self.viewport, map_width, map_height)
    }

    /// Sets the brush diameter in cells. Returns the clamped size.
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush_size = self.config.brush.clamp(size);
        self.brush_size
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) {
        self.brush_shape = shape;
    }

    /// Sets a single lattice cell. Returns whether it changed.
    pub fn paint(&mut self, position: Position, mode: BrushMode) -> bool {
        self.board.set(position, mode)
    }

    /// Stamps the brush under a pixel position. Returns the number of cells changed.
    pub fn paint_at_pixel(&mut self, pixel_x: f64, pixel_y: f64, mode: BrushMode) -> usize {
        let center = self.viewport.screen_to_lattice(pixel_x, pixel_y);
        let radius = f64::from(self.brush_size) / 2.0;
        let cells = stamp_brush(center.row, center.col, radius, self.brush_shape);
        self.board.paint(cells, mode)
    }

    pub fn begin_stroke(&mut self, pixel_x: f64, pixel_y: f64, mode: BrushMode) -> usize {
        self.stroke = Some(mode);
        self.paint_at_pixel(pixel_x, pixel_y, mode)
    }

    /// Continues the stroke started by [`Universe::begin_stroke`]; a no-op otherwise.
    pub fn continue_stroke(&mut self, pixel_x: f64, pixel_y: f64) -> usize {
        match self.stroke {
            Some(mode) => self.paint_at_pixel(pixel_x, pixel_y, mode),
            None => 0,
        }
    }

    pub fn end_stroke(&mut self) {
        self.stroke = None;
    }

    /// Decodes `text` by the suffix of `file_name` and replaces the board with
    /// the pattern centred in the current window. Returns the imported population.
    ///
    /// # Errors
    ///
    /// Unsupported suffixes and malformed JSON are rejected without touching
    /// any state.
    pub fn import(&mut self, text: &str, file_name: &str) -> Result<usize> {
        let decoded = PatternFormat::from_file_name(file_name)
            .and_then(|format| pattern::decode(text, format));
        let pattern = match decoded {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!(file = file_name, error = %err, "pattern rejected");
                return Err(err);
            }
        };

        let (width, height) = pattern.span();
        let offset = self.viewport.placement_offset(width, height);
        self.board = Board::from_positions(
            pattern
                .cells
                .iter()
                .map(|p| offset.offset(p.row, p.col)),
        );
        self.fade.clear();

        info!(
            file = file_name,
            population = self.board.population(),
            width,
            height,
            "pattern imported"
        );
        Ok(self.board.population())
    }

    /// The live set as this tool's JSON save format.
    #[must_use]
    pub fn export(&self) -> String {
        let text = pattern::encode_json(self.board.live());
        info!(population = self.board.population(), bytes = text.len(), "pattern exported");
        text
    }

    /// Advances the fade of every visible cell by one frame and collects what to
    /// draw. Without a drawable surface this is an empty frame and no state changes.
    pub fn render_frame(&mut self) -> Frame {
        let extent = self.viewport.extent();
        let mut frame = Frame {
            extent,
            cell_size: self.viewport.cell_size,
            sprites: Vec::new(),
        };
        if !self.viewport.has_surface() {
            trace!("no drawable surface, skipping frame");
            return frame;
        }

        let step = self.config.fade.fade_step;
        for (screen_row, screen_col, position) in self.viewport.visible() {
            let key = position.key();
            let alive = self.board.live().contains(&key);
            if !alive && !self.fade.contains(key) {
                continue;
            }
            let fade = self.fade.update(key, alive, step);
            if fade > 0.0 {
                let age = self.board.ages().get(&key).copied().unwrap_or(0);
                frame.sprites.push(Sprite {
                    screen_row,
                    screen_col,
                    position,
                    age,
                    fade,
                    color: age_color(age, fade),
                });
            }
        }
        frame
    }

    #[must_use]
    pub fn heat_at(&self, position: Position) -> f64 {
        self.heat.get(position.key())
    }

    #[must_use]
    pub fn was_visited(&self, position: Position) -> bool {
        self.trace.contains(position.key())
    }
}

fn arrow_from_key(key: &str) -> Option<Arrow> {
    match key {
        "ArrowUp" => Some(Arrow::Up),
        "ArrowDown" => Some(Arrow::Down),
        "ArrowLeft" => Some(Arrow::Left),
        "ArrowRight" => Some(Arrow::Right),
        _ => None,
    }
}

fn brush_mode(erase: bool) -> BrushMode {
    if erase {
        BrushMode::Dead
    } else {
        BrushMode::Alive
    }
}

#[wasm_bindgen]
impl Universe {
    /// `config_json` is an optional, possibly partial, [`LifeConfig`] document.
    #[wasm_bindgen(constructor)]
    pub fn create(
        surface_width: u32,
        surface_height: u32,
        config_json: Option<String>,
    ) -> std::result::Result<Universe, JsError> {
        let config = match config_json {
            Some(text) if !text.trim().is_empty() => LifeConfig::from_json(&text)?,
            _ => LifeConfig::default(),
        };
        Ok(Self::with_config(config, surface_width, surface_height))
    }

    #[wasm_bindgen(js_name = start)]
    pub fn start_js(&mut self) -> u32 {
        self.start().0
    }

    #[wasm_bindgen(js_name = stop)]
    pub fn stop_js(&mut self) {
        self.stop();
    }

    #[wasm_bindgen(js_name = onTimer)]
    pub fn on_timer_js(&mut self, ticket: u32) -> bool {
        self.on_timer(Ticket(ticket))
    }

    /// Single step; returns the new population.
    #[wasm_bindgen(js_name = step)]
    pub fn step_js(&mut self) -> u32 {
        self.step().population as u32
    }

    #[wasm_bindgen(js_name = clear)]
    pub fn clear_js(&mut self) {
        self.clear();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running_js(&self) -> bool {
        self.is_running()
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed_js(&mut self, period_ms: u32) -> u32 {
        self.set_speed(period_ms)
    }

    #[wasm_bindgen(js_name = periodMs)]
    pub fn period_ms_js(&self) -> u32 {
        self.period_ms()
    }

    #[wasm_bindgen(js_name = resize)]
    pub fn resize_js(&mut self, surface_width: u32, surface_height: u32) {
        self.resize(surface_width, surface_height);
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by_js(&mut self, pixel_dx: f64, pixel_dy: f64) {
        self.pan_by(pixel_dx, pixel_dy);
    }

    #[wasm_bindgen(js_name = setCenter)]
    pub fn set_center_js(&mut self, row: i32, col: i32) {
        self.set_center(Position::new(row, col));
    }

    /// Handles `ArrowUp`/`ArrowDown`/`ArrowLeft`/`ArrowRight`; returns whether the key was used.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down_js(&mut self, key: &str) -> bool {
        match arrow_from_key(key) {
            Some(arrow) => {
                self.nudge(arrow);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag_js(&mut self, pixel_x: f64, pixel_y: f64) {
        self.begin_drag(pixel_x, pixel_y);
    }

    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to_js(&mut self, pixel_x: f64, pixel_y: f64) {
        self.drag_to(pixel_x, pixel_y);
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag_js(&mut self) {
        self.end_drag();
    }

    #[wasm_bindgen(js_name = zoom)]
    pub fn zoom_js(&mut self, direction: i32) -> u32 {
        self.zoom(direction)
    }

    #[wasm_bindgen(js_name = wheel)]
    pub fn wheel_js(&mut self, delta_y: f64) -> u32 {
        self.wheel(delta_y)
    }

    #[wasm_bindgen(js_name = pinch)]
    pub fn pinch_js(&mut self, ratio: f64) -> u32 {
        self.pinch(ratio)
    }

    #[wasm_bindgen(js_name = setCellSize)]
    pub fn set_cell_size_js(&mut self, cell_size: u32) -> u32 {
        self.set_cell_size(cell_size)
    }

    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size_js(&mut self, size: u32) -> u32 {
        self.set_brush_size(size)
    }

    #[wasm_bindgen(js_name = setSquareBrush)]
    pub fn set_square_brush_js(&mut self, square: bool) {
        self.set_brush_shape(if square { BrushShape::Square } else { BrushShape::Circle });
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down_js(&mut self, pixel_x: f64, pixel_y: f64, erase: bool) -> u32 {
        self.begin_stroke(pixel_x, pixel_y, brush_mode(erase)) as u32
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move_js(&mut self, pixel_x: f64, pixel_y: f64) -> u32 {
        self.continue_stroke(pixel_x, pixel_y) as u32
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up_js(&mut self) {
        self.end_stroke();
    }

    #[wasm_bindgen(js_name = paintCell)]
    pub fn paint_cell_js(&mut self, row: i32, col: i32, erase: bool) -> bool {
        self.paint(Position::new(row, col), brush_mode(erase))
    }

    /// Rejections surface as a JS `Error` carrying the user-facing message.
    #[wasm_bindgen(js_name = importPattern)]
    pub fn import_js(&mut self, text: &str, file_name: &str) -> std::result::Result<u32, JsError> {
        Ok(self.import(text, file_name)? as u32)
    }

    #[wasm_bindgen(js_name = exportPattern)]
    pub fn export_js(&self) -> String {
        self.export()
    }

    /// Packed `[screen_row, screen_col, rgba]` triples; see [`Frame::packed`].
    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame_js(&mut self) -> Vec<u32> {
        self.render_frame().packed()
    }

    #[wasm_bindgen(js_name = visibleRows)]
    pub fn visible_rows_js(&self) -> u32 {
        self.viewport.extent().rows
    }

    #[wasm_bindgen(js_name = visibleCols)]
    pub fn visible_cols_js(&self) -> u32 {
        self.viewport.extent().cols
    }

    #[wasm_bindgen(js_name = cellSize)]
    pub fn cell_size_js(&self) -> u32 {
        self.viewport.cell_size
    }

    #[wasm_bindgen(js_name = population)]
    pub fn population_js(&self) -> u32 {
        self.board.population() as u32
    }

    #[wasm_bindgen(js_name = generation)]
    pub fn generation_js(&self) -> f64 {
        self.generation as f64
    }

    #[wasm_bindgen(js_name = heatAt)]
    pub fn heat_at_js(&self, row: i32, col: i32) -> f64 {
        self.heat_at(Position::new(row, col))
    }

    #[wasm_bindgen(js_name = wasVisited)]
    pub fn was_visited_js(&self, row: i32, col: i32) -> bool {
        self.was_visited(Position::new(row, col))
    }

    #[wasm_bindgen(js_name = resetHeat)]
    pub fn reset_heat_js(&mut self) {
        self.reset_heat();
    }

    #[wasm_bindgen(js_name = resetTrace)]
    pub fn reset_trace_js(&mut self) {
        self.reset_trace();
    }

    /// Flat `[row, col, row, col, ...]` of every live cell, for the minimap.
    #[wasm_bindgen(js_name = liveCells)]
    pub fn live_cells_js(&self) -> Vec<i32> {
        self.board
            .live()
            .iter()
            .map(|k| k.decode())
            .flat_map(|p| [p.row, p.col])
            .collect()
    }

    /// `[scale, origin_row, origin_col, view_x, view_y, view_w, view_h]`, empty
    /// when there is nothing to show.
    #[wasm_bindgen(js_name = minimap)]
    pub fn minimap_js(&self, map_width: u32, map_height: u32) -> Vec<f64> {
        self.minimap(map_width, map_height)
            .map(|m| {
                let [x, y, w, h] = m.view;
                vec![
                    m.scale,
                    f64::from(m.origin.row),
                    f64::from(m.origin.col),
                    x,
                    y,
                    w,
                    h,
                ]
            })
            .unwrap_or_default()
    }
}

impl Universe {
    /// Key of the cell under a pixel, for hover feedback.
    #[must_use]
    pub fn key_at_pixel(&self, pixel_x: f64, pixel_y: f64) -> CellKey {
        self.viewport.screen_to_lattice(pixel_x, pixel_y).cell().key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use proptest::prelude::*;

    /// 10 x 20 cells of 10 px, top-left (-5, -10).
    fn universe() -> Universe {
        let mut config = LifeConfig::default();
        config.zoom.initial_cell_size = 10;
        Universe::with_config(config, 200, 100)
    }

    fn blinker(u: &mut Universe) {
        for col in -1..=1 {
            u.paint(Position::new(0, col), BrushMode::Alive);
        }
    }

    #[test]
    fn new_universe_is_idle_and_empty() {
        let u = Universe::new(800, 600);
        assert!(!u.is_running());
        assert_eq!(u.board().population(), 0);
        assert_eq!(u.viewport().cell_size, 20);
        assert_eq!(u.period_ms(), 30);
        assert_eq!(u.generation(), 0);
    }

    #[test]
    fn step_advances_and_counts() {
        let mut u = universe();
        blinker(&mut u);
        let stats = u.step();
        assert_eq!(stats.population, 3);
        assert!(u.board().is_alive(Position::new(-1, 0)));
        assert_eq!(u.generation(), 1);
    }

    #[test]
    fn stopped_timer_firing_is_a_no_op() {
        let mut u = universe();
        blinker(&mut u);
        let ticket = u.start();
        assert!(u.on_timer(ticket));
        assert_eq!(u.generation(), 1);
        u.stop();
        assert!(!u.on_timer(ticket));
        assert_eq!(u.generation(), 1);
        let restarted = u.start();
        assert!(!u.on_timer(ticket));
        assert!(u.on_timer(restarted));
        assert_eq!(u.generation(), 2);
    }

    #[test]
    fn clear_stops_and_empties_everything() {
        let mut config = LifeConfig::default();
        config.trace.enabled = true;
        config.heat.enabled = true;
        let mut u = Universe::with_config(config, 200, 100);
        blinker(&mut u);
        u.start();
        u.step();
        u.render_frame();
        assert!(!u.trace().is_empty());
        assert!(!u.heat().is_empty());
        assert!(!u.fade().is_empty());
        u.clear();
        assert!(!u.is_running());
        assert!(u.board().is_empty());
        assert!(u.trace().is_empty());
        assert!(u.heat().is_empty());
        assert!(u.fade().is_empty());
        assert_eq!(u.generation(), 0);
    }

    #[test]
    fn overlays_follow_generations_only_when_enabled() {
        let mut u = universe();
        blinker(&mut u);
        u.step();
        assert!(u.heat().is_empty());
        assert!(u.trace().is_empty());

        let mut config = LifeConfig::default();
        config.trace.enabled = true;
        config.heat.enabled = true;
        let mut u = Universe::with_config(config, 200, 100);
        blinker(&mut u);
        u.step();
        u.step();
        assert!((u.heat_at(Position::new(0, 0)) - 2.0).abs() < 1e-12);
        assert!((u.heat_at(Position::new(0, 1)) - 1.0).abs() < 1e-12);
        assert!(u.was_visited(Position::new(1, 0)));
        assert!(u.was_visited(Position::new(0, 1)));
        u.reset_trace();
        assert!(!u.was_visited(Position::new(0, 1)));
    }

    #[test]
    fn settings_are_clamped() {
        let mut u = universe();
        assert_eq!(u.set_speed(0), 5);
        assert_eq!(u.set_speed(1_000), 100);
        assert_eq!(u.set_brush_size(0), 1);
        assert_eq!(u.set_brush_size(99), 15);
        assert_eq!(u.set_cell_size(1), 8);
        assert_eq!(u.zoom(1), 10);
        assert_eq!(u.wheel(-120.0), 12);
        assert_eq!(u.wheel(120.0), 10);
        assert_eq!(u.wheel(0.0), 10);
        assert_eq!(u.pinch(100.0), 40);
    }

    #[test]
    fn paint_at_pixel_uses_viewport_and_brush() {
        let mut u = universe();
        // pixel (25, 35) -> lattice (-5 + 3.5, -10 + 2.5) = cell (-2, -8)
        assert_eq!(u.paint_at_pixel(25.0, 35.0, BrushMode::Alive), 1);
        assert!(u.board().is_alive(Position::new(-2, -8)));
        assert_eq!(u.key_at_pixel(25.0, 35.0), Position::new(-2, -8).key());

        u.set_brush_size(3);
        u.set_brush_shape(BrushShape::Square);
        assert_eq!(u.paint_at_pixel(105.0, 55.0, BrushMode::Alive), 9);
        assert_eq!(u.paint_at_pixel(105.0, 55.0, BrushMode::Dead), 9);
        assert_eq!(u.board().population(), 1);
    }

    #[test]
    fn strokes_keep_their_mode_until_released() {
        let mut u = universe();
        u.begin_stroke(5.0, 5.0, BrushMode::Alive);
        u.continue_stroke(15.0, 5.0);
        u.continue_stroke(25.0, 5.0);
        u.end_stroke();
        assert_eq!(u.board().population(), 3);
        assert_eq!(u.continue_stroke(35.0, 5.0), 0);

        u.begin_stroke(15.0, 5.0, BrushMode::Dead);
        u.end_stroke();
        assert_eq!(u.board().population(), 2);
    }

    #[test]
    fn drag_pans_from_gesture_start() {
        let mut u = universe();
        u.begin_drag(100.0, 50.0);
        u.drag_to(80.0, 50.0);
        u.drag_to(60.0, 70.0);
        assert_eq!(u.viewport().center, Position::new(-2, 4));
        u.end_drag();
        u.drag_to(0.0, 0.0);
        assert_eq!(u.viewport().center, Position::new(-2, 4));
    }

    #[test]
    fn far_drag_does_not_overflow() {
        let mut u = universe();
        u.begin_drag(0.0, 0.0);
        u.drag_to(-1e12, 0.0);
        assert_eq!(u.viewport().center, Position::new(0, i32::MAX));
        u.drag_to(0.0, 1e12);
        assert_eq!(u.viewport().center, Position::new(-i32::MAX, 0));
        u.end_drag();
    }

    #[test]
    fn pan_and_keys() {
        let mut u = universe();
        u.pan_by(20.0, -10.0);
        assert_eq!(u.viewport().center, Position::new(-1, 2));
        assert!(u.key_down_js("ArrowDown"));
        assert!(!u.key_down_js("Enter"));
        assert_eq!(u.viewport().center, Position::new(0, 2));
        u.set_center(Position::new(1_000, -1_000));
        assert_eq!(u.viewport().top_left(), Position::new(995, -1_010));
    }

    #[test]
    fn import_centres_pattern_and_resets_fade() {
        let mut u = universe();
        u.paint(Position::new(-4, -9), BrushMode::Alive);
        u.render_frame();
        assert!(!u.fade().is_empty());

        let n = u.import("x = 3, y = 3\nbo$2bo$3o!", "glider.rle").unwrap();
        assert_eq!(n, 5);
        assert!(u.fade().is_empty());
        assert!(!u.board().is_alive(Position::new(-4, -9)));
        // window 10 x 20 at (-5, -10); a 3 x 3 box goes to (-5 + 3, -10 + 8)
        let origin = Position::new(-2, -2);
        for (r, c) in [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
            let p = origin.offset(r, c);
            assert!(u.board().is_alive(p));
            assert_eq!(u.board().age(p), Some(0));
        }
    }

    #[test]
    fn import_life_and_json() {
        let mut u = universe();
        assert_eq!(u.import("#Life 1.05\n#P 0 0\n**\n**\n", "block.lif").unwrap(), 4);
        assert_eq!(u.import("#P 0 0\n*.*", "pair.lif.txt").unwrap(), 2);
        let saved = u.export();
        assert_eq!(u.import(&saved, "game-of-life-pattern.json").unwrap(), 2);
    }

    #[test]
    fn rejected_import_leaves_state_alone() {
        let mut u = universe();
        blinker(&mut u);
        u.render_frame();
        let board = u.board().clone();
        let fade_len = u.fade().len();

        let err = u.import("bo$2bo$3o!", "glider.mc").unwrap_err();
        assert!(matches!(err, LifeError::UnsupportedFormat(_)));
        let err = u.import("[\"1,x\"]", "broken.json").unwrap_err();
        assert!(matches!(err, LifeError::InvalidKey(_)));

        assert_eq!(u.board(), &board);
        assert_eq!(u.fade().len(), fade_len);
    }

    #[test]
    fn export_lists_live_keys() {
        let mut u = universe();
        u.paint(Position::new(2, -3), BrushMode::Alive);
        u.paint(Position::new(0, 0), BrushMode::Alive);
        assert_eq!(u.export(), r#"["0,0","2,-3"]"#);
    }

    #[test]
    fn render_frame_fades_in_and_out() {
        let mut u = universe();
        let p = Position::new(0, 0);
        u.paint(p, BrushMode::Alive);
        let frame = u.render_frame();
        assert_eq!(frame.extent, Extent { rows: 10, cols: 20 });
        assert_eq!(frame.sprites.len(), 1);
        let sprite = frame.sprites[0];
        assert_eq!((sprite.screen_row, sprite.screen_col), (5, 10));
        assert!((sprite.fade - 0.15).abs() < 1e-6);
        assert_eq!(sprite.color.r, 255);

        for _ in 0..10 {
            u.render_frame();
        }
        assert!((u.fade().get(p.key()) - 1.0).abs() < f32::EPSILON);

        u.paint(p, BrushMode::Dead);
        let mut frames = 0;
        while u.fade().contains(p.key()) {
            u.render_frame();
            frames += 1;
            assert!(frames < 20);
        }
        assert!(u.render_frame().sprites.is_empty());
    }

    #[test]
    fn offscreen_cells_are_not_faded() {
        let mut u = universe();
        u.paint(Position::new(500, 500), BrushMode::Alive);
        assert!(u.render_frame().sprites.is_empty());
        assert!(u.fade().is_empty());
    }

    #[test]
    fn missing_surface_renders_nothing() {
        let mut u = Universe::new(0, 0);
        u.paint(Position::new(0, 0), BrushMode::Alive);
        let frame = u.render_frame();
        assert!(frame.sprites.is_empty());
        assert!(u.fade().is_empty());
        u.resize(100, 100);
        assert_eq!(u.render_frame().sprites.len(), 1);
    }

    #[test]
    fn packed_frame_layout() {
        let mut u = universe();
        u.paint(Position::new(-5, -10), BrushMode::Alive);
        let packed = u.render_frame_js();
        assert_eq!(packed.len(), 3);
        assert_eq!(&packed[..2], &[0, 0]);
        assert_eq!(packed[2] >> 8, 0x00FF_FFFF);
    }

    #[test]
    fn minimap_reports_layout() {
        let mut u = universe();
        assert!(u.minimap_js(180, 180).is_empty());
        u.paint(Position::new(0, 0), BrushMode::Alive);
        let m = u.minimap_js(180, 180);
        assert_eq!(m.len(), 7);
        assert!((m[0] - 36.0).abs() < 1e-12);
        assert_eq!(u.live_cells_js(), vec![0, 0]);
    }

    proptest! {
        #[test]
        fn prop_stale_tickets_never_advance(ops in proptest::collection::vec(0u8..4, 0..60)) {
            let mut u = universe();
            blinker(&mut u);
            let mut tickets = Vec::new();
            let mut current = None;
            for op in ops {
                match op {
                    0 => {
                        let t = u.start();
                        current = Some(t);
                        tickets.push(t);
                    }
                    1 => {
                        u.stop();
                        current = None;
                    }
                    _ => {
                        for &t in &tickets {
                            let before = u.generation();
                            let advanced = u.on_timer(t);
                            prop_assert_eq!(advanced, current == Some(t));
                            prop_assert_eq!(u.generation(), before + u64::from(advanced));
                        }
                    }
                }
            }
        }
    }
}
