//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use glam::Vec2;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2 as MacroquadVec2},
    ui::{hash, Skin, Ui},
};
use warboard_rendering::{DialogChoice, DialogView};

use crate::PanelButton;

const DIALOG_WIDTH: f32 = 200.0;
const DIALOG_ROW_HEIGHT: f32 = 28.0;

/// Outcome of rendering the side panel during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SidePanelResult {
    /// Whether the end-turn button was pressed during this frame.
    pub(crate) end_turn: bool,
    /// Whether the refresh button was pressed during this frame.
    pub(crate) refresh: bool,
    /// Whether the start-game button was pressed during this frame.
    pub(crate) start_game: bool,
    /// Whether the end-game button was pressed during this frame.
    pub(crate) end_game: bool,
}

impl SidePanelResult {
    /// Buttons pressed during this frame.
    pub(crate) fn pressed(self) -> impl Iterator<Item = PanelButton> {
        [
            (self.end_turn, PanelButton::EndTurn),
            (self.refresh, PanelButton::Refresh),
            (self.start_game, PanelButton::StartGame),
            (self.end_game, PanelButton::EndGame),
        ]
        .into_iter()
        .filter_map(|(pressed, button)| pressed.then_some(button))
    }
}

/// Snapshot of the side panel's layout and content for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SidePanelContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Text lines describing the game and the chat.
    pub(crate) lines: &'a [String],
}

fn panel_skin(ui: &mut Ui, background: Color) -> Skin {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    skin.window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .color_selected(background)
        .color_selected_hovered(background)
        .color_inactive(background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();

    skin.label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();

    skin.button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(6.0, 6.0, 4.0, 4.0))
        .build();

    skin
}

/// Renders the game summary, chat and the game control buttons.
pub(crate) fn draw_side_panel(ui: &mut Ui, context: SidePanelContext<'_>) -> SidePanelResult {
    let skin = panel_skin(ui, context.background);
    ui.push_skin(&skin);

    let mut result = SidePanelResult::default();
    let _ = ui.window(
        hash!("side_panel"),
        MacroquadVec2::new(context.origin.x, context.origin.y),
        MacroquadVec2::new(context.size.x, context.size.y),
        |ui| {
            for line in context.lines {
                ui.label(None, line);
            }
            ui.separator();
            result.end_turn = ui.button(None, "End turn (E)");
            result.refresh = ui.button(None, "Refresh (R)");
            ui.separator();
            result.start_game = ui.button(None, "Start game");
            result.end_game = ui.button(None, "End game");
            ui.label(None, "M toggles terrain, Esc quits.");
        },
    );

    ui.pop_skin();

    result
}

/// Renders the unit creation dialog centred on `centre`.
///
/// Returns the button pressed this frame, if any.
pub(crate) fn draw_creation_dialog(
    ui: &mut Ui,
    centre: Vec2,
    dialog: &DialogView,
) -> Option<DialogChoice> {
    let skin = panel_skin(ui, Color::from_rgba(24, 24, 32, 240));
    ui.push_skin(&skin);

    let rows = dialog.options.len() as f32 + 2.0;
    let size = MacroquadVec2::new(DIALOG_WIDTH, rows * DIALOG_ROW_HEIGHT + 24.0);
    let origin = MacroquadVec2::new(centre.x - size.x * 0.5, centre.y - size.y * 0.5);

    let mut choice = None;
    let _ = ui.window(hash!("creation_dialog"), origin, size, |ui| {
        ui.label(None, &dialog.title);
        for kind in &dialog.options {
            if ui.button(None, kind.name()) {
                choice = Some(DialogChoice::Confirm(*kind));
            }
        }
        if ui.button(None, "Cancel") {
            choice = Some(DialogChoice::Cancel);
        }
    });

    ui.pop_skin();

    choice
}
