#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the war board client.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the adapter depends on macroquad without its default `audio` feature.
//!
//! The board scene is drawn primitive by primitive. Sprite sheets are loaded
//! one per frame after the window opens; sprites only appear once the
//! texture-load debouncer signals a redraw, and placeholder fills stand in
//! for them until then. All `macroquad::ui` calls live in the local `ui`
//! module.

pub mod sprites;
mod ui;

use std::{
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use tracing::{debug, error};
use warboard_core::{CursorHint, TILE_SIZE};
use warboard_rendering::{
    textures::{TextureLoadTracker, DEFAULT_DEBOUNCE},
    Color, DialogChoice, DrawPrimitive, FrameFeedback, FrameInput, Highlight, Presentation,
    RenderingBackend, Scene, ScreenRect, SpriteSheet,
};

use self::{
    sprites::{SheetLoader, SheetManifest, SheetTextures},
    ui::{draw_creation_dialog, draw_side_panel, SidePanelContext},
};

const PANEL_WIDTH: f32 = 240.0;
const PANEL_BACKGROUND: Color = Color::from_rgb_u8(36, 38, 46);
const BOARD_MARGIN: f32 = 16.0;
const HOVER_OUTLINE_THICKNESS: f32 = 2.0;
const OVERLAY_OUTLINE_THICKNESS: f32 = 1.0;

/// Side panel button whose press is replayed into the next frame's input.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelButton {
    /// Ends the active army's turn.
    EndTurn,
    /// Fetches a fresh board snapshot.
    Refresh,
    /// Starts the game.
    StartGame,
    /// Ends the game.
    EndGame,
}

impl PanelButton {
    const fn slot(self) -> usize {
        match self {
            PanelButton::EndTurn => 0,
            PanelButton::Refresh => 1,
            PanelButton::StartGame => 2,
            PanelButton::EndGame => 3,
        }
    }
}

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct DialogInputState {
    dialog_choice_latched: Option<DialogChoice>,
    buttons_latched: [bool; 4],
}

impl DialogInputState {
    /// Returns the latched dialog answer, clearing it so the choice fires once.
    pub fn take_dialog_choice(&mut self) -> Option<DialogChoice> {
        self.dialog_choice_latched.take()
    }

    /// Records the dialog button pressed this frame.
    pub fn register_dialog_choice(&mut self, choice: DialogChoice) {
        self.dialog_choice_latched = Some(choice);
    }

    /// Returns whether `button` was pressed on the previous frame and clears the latch.
    pub fn take_button(&mut self, button: PanelButton) -> bool {
        std::mem::take(&mut self.buttons_latched[button.slot()])
    }

    /// Records that `button` was pressed this frame.
    pub fn register_button(&mut self, button: PanelButton) {
        self.buttons_latched[button.slot()] = true;
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    quit_requested: bool,
    end_turn: bool,
    toggle_terrain: bool,
    refresh: bool,
    ctrl_held: bool,
    alt_held: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            end_turn: is_key_pressed(KeyCode::E),
            toggle_terrain: is_key_pressed(KeyCode::M),
            refresh: is_key_pressed(KeyCode::R),
            ctrl_held: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
            alt_held: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    scale: f32,
    manifest_path: PathBuf,
    texture_debounce: Duration,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            scale: 2.0,
            manifest_path: SheetManifest::default_path(),
            texture_debounce: DEFAULT_DEBOUNCE,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that reads the default sheet manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures whether presentation waits for the display refresh.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Sets the integer-friendly zoom applied to board pixels.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.max(1.0);
        self
    }

    /// Reads sheet paths from the manifest at `path`.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Sets the quiet period after a sheet load before sprites are redrawn.
    #[must_use]
    pub fn with_texture_debounce(mut self, window: Duration) -> Self {
        self.texture_debounce = window;
        self
    }

    /// Configures whether the backend should load sprite sheets at all.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

/// Placement of the board inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BoardMetrics {
    scale: f32,
    offset: Vec2,
    size: Vec2,
}

impl BoardMetrics {
    fn from_scene(scene: &Scene, scale: f32) -> Self {
        let size = Vec2::new(scene.width_px as f32, scene.height_px as f32);
        Self {
            scale,
            offset: Vec2::splat(BOARD_MARGIN),
            size,
        }
    }

    fn window_size(&self) -> Vec2 {
        let board = self.size * self.scale + Vec2::splat(BOARD_MARGIN * 2.0);
        Vec2::new(board.x + PANEL_WIDTH, board.y.max(480.0))
    }

    fn panel_origin(&self, screen_width: f32) -> Vec2 {
        Vec2::new((screen_width - PANEL_WIDTH).max(0.0), 0.0)
    }

    /// Converts a window position to unscaled board pixels, if it lies on the board.
    fn to_board(&self, screen: Vec2) -> Option<Vec2> {
        let board = (screen - self.offset) / self.scale;
        if board.x < 0.0 || board.y < 0.0 || board.x >= self.size.x || board.y >= self.size.y {
            return None;
        }
        Some(board)
    }

    fn to_screen(&self, rect: ScreenRect) -> (Vec2, Vec2) {
        (self.offset + rect.origin * self.scale, rect.size * self.scale)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameFeedback + 'static,
    {
        let Self {
            swap_interval,
            scale,
            manifest_path,
            texture_debounce,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            background_color,
            scene,
        } = presentation;

        let manifest = if load_sprites {
            Some(SheetManifest::from_path(&manifest_path)?)
        } else {
            None
        };

        let window_size = BoardMetrics::from_scene(&scene, scale).window_size();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x as i32,
            window_height: window_size.y as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (load_error_sender, load_error_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut loader = manifest
                .as_ref()
                .map(|manifest| SheetLoader::new(manifest, sprites::load_sheet_image));
            let mut textures = SheetTextures::new();
            let mut tracker = TextureLoadTracker::new(texture_debounce);
            let mut drawable: Vec<SpriteSheet> = Vec::new();
            let mut panel_input = DialogInputState::default();

            let clear = to_macroquad_color(clear_color);
            let background = to_macroquad_color(background_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                if let Some(pending) = loader.as_mut() {
                    match pending.load_next(&mut textures) {
                        Ok(Some(sheet)) => {
                            debug!(sheet = sheet.name(), "sprite sheet loaded");
                            tracker.sheet_loaded(sheet, Instant::now());
                        }
                        Ok(None) => loader = None,
                        Err(load_error) => {
                            error!(error = %format!("{load_error:#}"), "sprite sheet failed to load");
                            tracker.cancel();
                            let _ = load_error_sender.send(Err(load_error));
                            return;
                        }
                    }
                }
                if tracker.poll_redraw(Instant::now()) {
                    drawable = SpriteSheet::ALL
                        .into_iter()
                        .filter(|sheet| tracker.is_loaded(*sheet))
                        .collect();
                    debug!(sheets = drawable.len(), "redrawing with loaded sheets");
                }

                macroquad::window::clear_background(clear);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics = BoardMetrics::from_scene(&scene, scale);
                let (mouse_x, mouse_y) = mouse_position();
                let pointer = metrics.to_board(Vec2::new(mouse_x, mouse_y));
                let frame_input = FrameInput {
                    pointer,
                    pressed: pointer.is_some() && is_mouse_button_pressed(MouseButton::Left),
                    ctrl_held: keyboard.ctrl_held,
                    alt_held: keyboard.alt_held,
                    dialog_choice: panel_input.take_dialog_choice(),
                    end_turn: keyboard.end_turn || panel_input.take_button(PanelButton::EndTurn),
                    toggle_terrain: keyboard.toggle_terrain,
                    refresh: keyboard.refresh || panel_input.take_button(PanelButton::Refresh),
                    start_game: panel_input.take_button(PanelButton::StartGame),
                    end_game: panel_input.take_button(PanelButton::EndGame),
                };

                let feedback = update_scene(frame_dt, frame_input, &mut scene);
                let metrics = BoardMetrics::from_scene(&scene, scale);

                draw_board_background(&metrics, background);
                draw_scene(&scene, &metrics, &textures, &drawable);
                if let Some(board_px) = pointer {
                    draw_hover_outline(board_px, feedback.cursor, &metrics);
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let panel_origin = metrics.panel_origin(screen_width);
                let mut root_ui = macroquad::ui::root_ui();
                let panel_result = draw_side_panel(
                    &mut root_ui,
                    SidePanelContext {
                        origin: panel_origin,
                        size: Vec2::new(PANEL_WIDTH, screen_height),
                        background: to_macroquad_color(PANEL_BACKGROUND),
                        lines: &feedback.panel_lines,
                    },
                );
                for button in panel_result.pressed() {
                    panel_input.register_button(button);
                }
                if let Some(dialog) = &feedback.dialog {
                    let centre = metrics.offset + metrics.size * metrics.scale * 0.5;
                    if let Some(choice) = draw_creation_dialog(&mut root_ui, centre, dialog) {
                        panel_input.register_dialog_choice(choice);
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        load_error_receiver.try_recv().unwrap_or(Ok(()))?;

        Ok(())
    }
}

fn draw_board_background(metrics: &BoardMetrics, color: macroquad::color::Color) {
    let size = metrics.size * metrics.scale;
    macroquad::shapes::draw_rectangle(metrics.offset.x, metrics.offset.y, size.x, size.y, color);
}

fn draw_scene(
    scene: &Scene,
    metrics: &BoardMetrics,
    textures: &SheetTextures,
    drawable: &[SpriteSheet],
) {
    for primitive in &scene.primitives {
        match primitive {
            DrawPrimitive::Background { dest } => {
                let (origin, size) = metrics.to_screen(*dest);
                macroquad::shapes::draw_rectangle(
                    origin.x,
                    origin.y,
                    size.x,
                    size.y,
                    macroquad::color::WHITE,
                );
            }
            DrawPrimitive::Sprite {
                sheet,
                source,
                dest,
            } => {
                let drawn = drawable.contains(sheet)
                    && textures.draw_region(*sheet, *source, *dest, metrics.scale, metrics.offset);
                if !drawn {
                    draw_placeholder(*sheet, *dest, metrics);
                }
            }
            DrawPrimitive::Overlay { dest, highlight } => {
                draw_overlay(*dest, *highlight, metrics);
            }
        }
    }
}

fn draw_placeholder(sheet: SpriteSheet, dest: ScreenRect, metrics: &BoardMetrics) {
    let color = match sheet {
        SpriteSheet::Terrain => Color::from_rgb_u8(200, 220, 170),
        SpriteSheet::Units => Color::from_rgb_u8(90, 90, 90).with_opacity(0.6),
    };
    let (origin, size) = metrics.to_screen(dest);
    match sheet {
        SpriteSheet::Terrain => {
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(color),
            );
        }
        SpriteSheet::Units => {
            let radius = size.x.min(size.y) * 0.3;
            let centre = origin + Vec2::new(size.x * 0.5, size.y - size.x * 0.5);
            macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(color));
        }
    }
}

fn draw_overlay(dest: ScreenRect, highlight: Highlight, metrics: &BoardMetrics) {
    if highlight == Highlight::None {
        return;
    }
    let (origin, size) = metrics.to_screen(dest);
    let fill = highlight.fill().with_opacity(Highlight::OPACITY);
    macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(fill));
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        size.x,
        size.y,
        OVERLAY_OUTLINE_THICKNESS,
        to_macroquad_color(highlight.stroke().with_opacity(Highlight::OPACITY)),
    );
}

fn hover_color(cursor: CursorHint) -> Option<Color> {
    match cursor {
        CursorHint::Default => None,
        CursorHint::Move => Some(Color::from_rgb_u8(60, 170, 90)),
        CursorHint::Attack => Some(Color::from_rgb_u8(220, 40, 40)),
        CursorHint::Select => Some(Color::from_rgb_u8(250, 210, 60)),
        CursorHint::Produce => Some(Color::from_rgb_u8(70, 120, 230)),
    }
}

fn draw_hover_outline(board_px: Vec2, cursor: CursorHint, metrics: &BoardMetrics) {
    let Some(color) = hover_color(cursor) else {
        return;
    };
    let tile = TILE_SIZE as f32;
    let column = (board_px.x / tile).floor() as u32;
    let row = (board_px.y / tile).floor() as u32;
    let (origin, size) = metrics.to_screen(ScreenRect::tile(column, row));
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        size.x,
        size.y,
        HOVER_OUTLINE_THICKNESS,
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(width_px: u32, height_px: u32) -> Scene {
        Scene::new(width_px, height_px, Vec::new())
    }

    #[test]
    fn pointer_positions_map_to_unscaled_board_pixels() {
        let metrics = BoardMetrics::from_scene(&scene(64, 32), 2.0);

        assert_eq!(
            metrics.to_board(Vec2::new(BOARD_MARGIN + 40.0, BOARD_MARGIN + 10.0)),
            Some(Vec2::new(20.0, 5.0))
        );
        assert_eq!(metrics.to_board(Vec2::new(4.0, 40.0)), None);
        assert_eq!(
            metrics.to_board(Vec2::new(BOARD_MARGIN + 128.0, BOARD_MARGIN)),
            None,
            "right edge is exclusive"
        );
    }

    #[test]
    fn screen_rects_are_scaled_and_offset() {
        let metrics = BoardMetrics::from_scene(&scene(32, 32), 3.0);

        let (origin, size) = metrics.to_screen(ScreenRect::tile(1, 0));

        assert_eq!(origin, Vec2::new(BOARD_MARGIN + 48.0, BOARD_MARGIN));
        assert_eq!(size, Vec2::splat(48.0));
    }

    #[test]
    fn window_leaves_room_for_the_side_panel() {
        let metrics = BoardMetrics::from_scene(&scene(320, 160), 2.0);

        let size = metrics.window_size();

        assert_eq!(size.x, 640.0 + BOARD_MARGIN * 2.0 + PANEL_WIDTH);
        assert_eq!(size.y, 480.0);
        assert_eq!(metrics.panel_origin(size.x).x, 640.0 + BOARD_MARGIN * 2.0);
    }

    #[test]
    fn only_actionable_hints_are_outlined() {
        assert!(hover_color(CursorHint::Default).is_none());
        for cursor in [
            CursorHint::Move,
            CursorHint::Attack,
            CursorHint::Select,
            CursorHint::Produce,
        ] {
            assert!(hover_color(cursor).is_some());
        }
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(
            (color.r, color.g, color.b, color.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }

    #[test]
    fn builder_clamps_scale_to_one() {
        let backend = MacroquadBackend::new().with_scale(0.25);

        assert_eq!(backend.scale, 1.0);
    }
}
