#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Warboard adapters.
//!
//! The crate turns immutable board snapshots into ordered lists of draw
//! primitives that reference rectangles inside two fixed sprite sheets.
//! Backends only need to understand [`DrawPrimitive`]; every decision about
//! what to draw and where lives in [`atlas`] and [`scene`].

pub mod atlas;
pub mod scene;
pub mod textures;

use anyhow::Result as AnyResult;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use warboard_core::{CursorHint, UnitKind, TILE_SIZE};

pub use scene::compose;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel scaled by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            alpha: self.alpha * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Sprite sheet a primitive samples from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteSheet {
    /// Terrain tileset.
    Terrain,
    /// Unit and badge sheet.
    Units,
}

impl SpriteSheet {
    /// Both sheets, in load order.
    pub const ALL: [SpriteSheet; 2] = [SpriteSheet::Terrain, SpriteSheet::Units];

    /// Width and height of the sheet image in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            SpriteSheet::Terrain => (445, 1163),
            SpriteSheet::Units => (781, 1790),
        }
    }

    /// Short identifier used in logs and manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SpriteSheet::Terrain => "terrain",
            SpriteSheet::Units => "units",
        }
    }
}

/// Pixel rectangle inside a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRect {
    /// Left edge in sheet pixels.
    pub x: u32,
    /// Top edge in sheet pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SourceRect {
    /// Creates a new source rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle lies entirely within the sheet image.
    #[must_use]
    pub const fn fits_within(&self, sheet: SpriteSheet) -> bool {
        let (sheet_width, sheet_height) = sheet.dimensions();
        self.width > 0
            && self.height > 0
            && self.x + self.width <= sheet_width
            && self.y + self.height <= sheet_height
    }

    /// Whether the two rectangles share at least one pixel.
    #[must_use]
    pub const fn overlaps(&self, other: &SourceRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Destination rectangle on the board surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ScreenRect {
    /// Creates a destination rectangle from its corner and size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle covering the board tile at the provided column and row.
    #[must_use]
    pub fn tile(column: u32, row: u32) -> Self {
        let tile = TILE_SIZE as f32;
        Self::new(
            Vec2::new(column as f32 * tile, row as f32 * tile),
            Vec2::splat(tile),
        )
    }

    /// Returns the rectangle moved by the provided offset.
    #[must_use]
    pub fn translated(self, offset: Vec2) -> Self {
        Self::new(self.origin + offset, self.size)
    }
}

/// Affordance drawn over a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Outline only; nothing is actionable.
    None,
    /// The selected unit may move onto the tile.
    Movable,
    /// The selected unit may attack the tile.
    Attackable,
    /// The tile holds the selected unit.
    Selected,
}

impl Highlight {
    /// Opacity applied to every overlay.
    pub const OPACITY: f32 = 0.5;

    /// Fill color of the overlay before opacity is applied.
    #[must_use]
    pub const fn fill(self) -> Color {
        match self {
            Highlight::None => Color::TRANSPARENT,
            Highlight::Movable => Color::from_rgb_u8(255, 255, 224),
            Highlight::Attackable => Color::from_rgb_u8(255, 0, 0),
            Highlight::Selected => Color::from_rgb_u8(255, 160, 122),
        }
    }

    /// Outline color of the overlay before opacity is applied.
    #[must_use]
    pub const fn stroke(self) -> Color {
        Color::BLACK
    }
}

/// Single drawing instruction emitted by the compositor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum DrawPrimitive {
    /// Blank tile drawn when terrain display is disabled.
    Background {
        /// Tile area to clear.
        dest: ScreenRect,
    },
    /// Region of a sprite sheet copied onto the board.
    Sprite {
        /// Sheet to sample from.
        sheet: SpriteSheet,
        /// Region inside the sheet.
        source: SourceRect,
        /// Area on the board.
        dest: ScreenRect,
    },
    /// Semi-transparent affordance rectangle with a black outline.
    Overlay {
        /// Tile area to cover.
        dest: ScreenRect,
        /// Affordance that selects the fill color.
        highlight: Highlight,
    },
}

/// Toggles that influence scene composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneOptions {
    /// Draws terrain sprites instead of blank backgrounds.
    pub show_terrain: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { show_terrain: true }
    }
}

/// Fully composed drawable scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Board width in pixels.
    pub width_px: u32,
    /// Board height in pixels.
    pub height_px: u32,
    /// Primitives ordered back to front.
    pub primitives: Vec<DrawPrimitive>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(width_px: u32, height_px: u32, primitives: Vec<DrawPrimitive>) -> Self {
        Self {
            width_px,
            height_px,
            primitives,
        }
    }

    /// Sheets referenced by at least one sprite primitive.
    #[must_use]
    pub fn referenced_sheets(&self) -> Vec<SpriteSheet> {
        let mut sheets: Vec<SpriteSheet> = self
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::Sprite { sheet, .. } => Some(*sheet),
                DrawPrimitive::Background { .. } | DrawPrimitive::Overlay { .. } => None,
            })
            .collect();
        sheets.sort_unstable();
        sheets.dedup();
        sheets
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Color drawn behind tiles when terrain display is disabled.
    pub background_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            background_color: Color::from_rgb_u8(255, 255, 255),
            scene,
        }
    }
}

/// Choice made in the unit creation dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogChoice {
    /// Build the provided unit kind.
    Confirm(UnitKind),
    /// Dismiss the dialog.
    Cancel,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in board pixels, when the pointer is over the board.
    pub pointer: Option<Vec2>,
    /// Whether the primary button was pressed over the board on this frame.
    pub pressed: bool,
    /// Whether a ctrl key was held on this frame.
    pub ctrl_held: bool,
    /// Whether an alt key was held on this frame.
    pub alt_held: bool,
    /// Choice made in the creation dialog on the previous frame.
    pub dialog_choice: Option<DialogChoice>,
    /// Whether ending the turn was requested.
    pub end_turn: bool,
    /// Whether toggling terrain display was requested.
    pub toggle_terrain: bool,
    /// Whether a fresh board snapshot was requested.
    pub refresh: bool,
    /// Whether starting the game was requested.
    pub start_game: bool,
    /// Whether ending the game was requested.
    pub end_game: bool,
}

/// Unit creation dialog an adapter should present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogView {
    /// Heading shown above the options.
    pub title: String,
    /// Unit kinds offered, in display order.
    pub options: Vec<UnitKind>,
}

/// Information the scene owner hands back to the adapter after each frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameFeedback {
    /// Affordance for the tile under the pointer.
    pub cursor: CursorHint,
    /// Text lines for the side panel.
    pub panel_lines: Vec<String>,
    /// Open unit creation dialog.
    pub dialog: Option<DialogView>,
}

/// Rendering backend capable of presenting Warboard scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, may replace the scene before it is
    /// rendered, and reports what the adapter should display around it.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameFeedback + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// A sprite region does not fit inside its sheet.
    #[error("region {region:?} lies outside the {} sheet", .sheet.name())]
    OutOfSheetBounds {
        /// Sheet the region was declared for.
        sheet: SpriteSheet,
        /// Offending rectangle.
        region: SourceRect,
    },
}
