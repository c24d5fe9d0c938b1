//! Headless subcommands that inspect a board snapshot without opening a window.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use warboard_core::{Army, Board, Coord, CursorHint, TerrainKind, UnitKind};
use warboard_rendering::{
    atlas::{terrain_region, unit_region, SpriteRegion},
    compose, DrawPrimitive, Highlight, SceneOptions, ScreenRect, SourceRect,
};
use warboard_session::rpc::command_call;
use warboard_system_interaction::{dispatch, hover_hint, Interaction, Modifiers, PointerAction};

/// Output format for the `render` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RenderFormat {
    /// One primitive per line.
    Text,
    /// The scene as pretty-printed JSON.
    Json,
}

/// Writes the scene composed from `board`.
pub(crate) fn render(
    board: &Board,
    options: SceneOptions,
    format: RenderFormat,
    out: &mut impl Write,
) -> Result<()> {
    let scene = compose(board, options);
    match format {
        RenderFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &scene).context("failed to encode scene")?;
            writeln!(out)?;
        }
        RenderFormat::Text => {
            writeln!(
                out,
                "scene {}x{} px, {} primitives",
                scene.width_px,
                scene.height_px,
                scene.primitives.len()
            )?;
            for primitive in &scene.primitives {
                writeln!(out, "{}", describe_primitive(primitive))?;
            }
        }
    }
    Ok(())
}

fn describe_primitive(primitive: &DrawPrimitive) -> String {
    match primitive {
        DrawPrimitive::Background { dest } => format!("background {}", describe_dest(*dest)),
        DrawPrimitive::Sprite {
            sheet,
            source,
            dest,
        } => format!(
            "sprite {} {} -> {}",
            sheet.name(),
            describe_source(*source),
            describe_dest(*dest)
        ),
        DrawPrimitive::Overlay { dest, highlight } => {
            let name = match highlight {
                Highlight::None => "none",
                Highlight::Movable => "movable",
                Highlight::Attackable => "attackable",
                Highlight::Selected => "selected",
            };
            format!("overlay {name} {}", describe_dest(*dest))
        }
    }
}

fn describe_source(source: SourceRect) -> String {
    format!(
        "{},{} {}x{}",
        source.x, source.y, source.width, source.height
    )
}

fn describe_dest(dest: ScreenRect) -> String {
    format!(
        "{},{} {}x{}",
        dest.origin.x, dest.origin.y, dest.size.x, dest.size.y
    )
}

/// Writes what a pointer gesture on `at` would produce.
pub(crate) fn click(
    board: &Board,
    at: Coord,
    action: PointerAction,
    modifiers: Modifiers,
    out: &mut impl Write,
) -> Result<()> {
    let mut interactions = Vec::new();
    dispatch(board, action, at, modifiers, &mut interactions);
    if interactions.is_empty() {
        writeln!(out, "no command")?;
    }
    for interaction in interactions {
        match interaction {
            Interaction::Command(command) => {
                let (method, params) = command_call(&command);
                writeln!(
                    out,
                    "{method} {}",
                    serde_json::Value::Object(params)
                )?;
            }
            Interaction::OpenUnitCreation { at, catalog } => {
                let names: Vec<&str> = warboard_system_unit_creation::catalog(catalog)
                    .iter()
                    .map(|kind| kind.name())
                    .collect();
                writeln!(
                    out,
                    "unit creation at {},{}: {}",
                    at.x,
                    at.y,
                    names.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

/// Name of a cursor hint as printed by the CLI.
pub(crate) const fn hint_name(hint: CursorHint) -> &'static str {
    match hint {
        CursorHint::Default => "default",
        CursorHint::Move => "move",
        CursorHint::Attack => "attack",
        CursorHint::Select => "select",
        CursorHint::Produce => "produce",
    }
}

/// Writes the cursor hint for hovering `at`.
pub(crate) fn hover(board: &Board, at: Coord, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", hint_name(hover_hint(board, at)))?;
    Ok(())
}

fn describe_region(region: Option<SpriteRegion>) -> String {
    match region {
        Some(region) if region.double_height => format!("{} tall", describe_source(region.source)),
        Some(region) => describe_source(region.source),
        None => "-".to_string(),
    }
}

/// Writes the sheet regions every terrain and unit kind resolves to.
///
/// With `missing_only` only the combinations without art are listed.
pub(crate) fn atlas(missing_only: bool, out: &mut impl Write) -> Result<()> {
    let owners = [None, Some(Army::Red), Some(Army::Blue)];
    for &kind in TerrainKind::ALL {
        for owner in owners {
            let region = terrain_region(kind, owner);
            if missing_only && region.is_some() {
                continue;
            }
            writeln!(
                out,
                "terrain {} {} {}",
                kind.name(),
                owner.map_or("NEUTRAL", Army::name),
                describe_region(region)
            )?;
        }
    }
    for kind in UnitKind::ALL {
        for army in Army::ALL {
            for available in [true, false] {
                let region = unit_region(kind, army, available);
                if missing_only && region.is_some() {
                    continue;
                }
                writeln!(
                    out,
                    "unit {} {} {} {}",
                    kind.name(),
                    army.name(),
                    if available { "ready" } else { "done" },
                    describe_region(region)
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warboard_core::{MapTile, Tile, Unit};

    fn board() -> Board {
        Board::blank(2, 1, Army::Blue)
            .with_tile(
                Tile::new(Coord::new(0, 0), MapTile::new(TerrainKind::Plain, None))
                    .with_unit(Unit::new("b1", Army::Blue, UnitKind::Infantry)),
            )
            .with_tile(Tile::new(
                Coord::new(1, 0),
                MapTile::new(TerrainKind::Factory, Some(Army::Blue)),
            ))
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        run(&mut buffer).expect("command succeeds");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn text_render_lists_one_primitive_per_line() {
        let text = output(|out| render(&board(), SceneOptions::default(), RenderFormat::Text, out));
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("scene 32x16 px, 5 primitives"));
        assert!(lines.next().is_some_and(|line| line.starts_with("sprite terrain")));
        assert!(text.contains("overlay none 0,0 16x16"));
        assert!(text.contains("sprite units"));
    }

    #[test]
    fn json_render_round_trips_into_a_scene() {
        let text = output(|out| render(&board(), SceneOptions::default(), RenderFormat::Json, out));
        let scene: warboard_rendering::Scene =
            serde_json::from_str(&text).expect("valid scene json");

        assert_eq!(scene, compose(&board(), SceneOptions::default()));
    }

    #[test]
    fn click_prints_rpc_calls_and_dialogs() {
        let select = output(|out| {
            click(
                &board(),
                Coord::new(0, 0),
                PointerAction::Click,
                Modifiers::NONE,
                out,
            )
        });
        assert!(select.starts_with("unit_select "));
        assert!(select.contains("\"x\":0"));

        let dialog = output(|out| {
            click(
                &board(),
                Coord::new(1, 0),
                PointerAction::Click,
                Modifiers::NONE,
                out,
            )
        });
        assert!(dialog.starts_with("unit creation at 1,0: "));
        assert!(dialog.contains("TANK"));
    }

    #[test]
    fn hover_prints_the_hint_name() {
        assert_eq!(output(|out| hover(&board(), Coord::new(0, 0), out)), "select\n");
        assert_eq!(output(|out| hover(&board(), Coord::new(1, 0), out)), "produce\n");
    }

    #[test]
    fn atlas_missing_listing_names_only_gaps() {
        let text = output(|out| atlas(true, out));

        assert!(text.lines().all(|line| line.ends_with(" -")));
        assert!(text.contains("unit STEALTH RED ready -"));
        assert!(!text.contains("terrain PLAIN"));
    }
}
