//! Board to draw-primitive composition.

use tracing::warn;
use warboard_core::{Board, Tile, TILE_SIZE};

use crate::{
    atlas::{self, SpriteRegion},
    DrawPrimitive, Highlight, Scene, SceneOptions, ScreenRect,
};

/// Composes the complete scene for `board`.
///
/// Tiles are visited in row-major order and each contributes its terrain,
/// affordance overlays and unit, back to front. Nothing is cached between
/// calls, so composing the same board twice yields identical scenes.
#[must_use]
pub fn compose(board: &Board, options: SceneOptions) -> Scene {
    let mut primitives = Vec::with_capacity(board.grid.len() * 3);
    for tile in board.tiles() {
        push_terrain(tile, options, &mut primitives);
        push_overlays(board, tile, &mut primitives);
        push_unit(tile, &mut primitives);
    }

    Scene::new(
        board.width.saturating_mul(TILE_SIZE),
        board.height.saturating_mul(TILE_SIZE),
        primitives,
    )
}

fn push_terrain(tile: &Tile, options: SceneOptions, out: &mut Vec<DrawPrimitive>) {
    let dest = ScreenRect::tile(tile.x, tile.y);
    if !options.show_terrain {
        out.push(DrawPrimitive::Background { dest });
        return;
    }

    match atlas::resolve_terrain(&tile.map_tile) {
        Some(region) => out.push(sprite(region, tile)),
        None => warn!(
            terrain = tile.map_tile.terrain.name(),
            x = tile.x,
            y = tile.y,
            "no sprite for terrain, skipping"
        ),
    }
}

fn push_overlays(board: &Board, tile: &Tile, out: &mut Vec<DrawPrimitive>) {
    let dest = ScreenRect::tile(tile.x, tile.y);
    let highlight = if tile.can_be_attacked {
        Highlight::Attackable
    } else if tile.can_be_moved_to {
        Highlight::Movable
    } else {
        Highlight::None
    };
    out.push(DrawPrimitive::Overlay { dest, highlight });

    if board.holds_selected_unit(tile) {
        out.push(DrawPrimitive::Overlay {
            dest,
            highlight: Highlight::Selected,
        });
    }
}

fn push_unit(tile: &Tile, out: &mut Vec<DrawPrimitive>) {
    let Some(unit) = tile.unit.as_ref() else {
        return;
    };

    match atlas::resolve_unit(unit) {
        Some(region) => out.push(sprite(region, tile)),
        None => warn!(
            unit = unit.unit_type.name(),
            army = %unit.army,
            x = tile.x,
            y = tile.y,
            "no sprite for unit, drawing badges only"
        ),
    }

    for badge in atlas::badges(unit, tile) {
        out.push(DrawPrimitive::Sprite {
            sheet: crate::SpriteSheet::Units,
            source: badge.source,
            dest: badge.destination(tile.coord()),
        });
    }
}

fn sprite(region: SpriteRegion, tile: &Tile) -> DrawPrimitive {
    DrawPrimitive::Sprite {
        sheet: region.sheet,
        source: region.source,
        dest: region.destination(tile.coord()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceRect, SpriteSheet};
    use glam::Vec2;
    use warboard_core::{
        Army, Coord, MapTile, TerrainKind, TerrainType, Unit, UnitKind, UnitStatus, UnitType,
    };

    #[test]
    fn empty_plain_tile_draws_terrain_then_outline() {
        let board = Board::blank(1, 1, Army::Red);
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(
            scene.primitives,
            vec![
                DrawPrimitive::Sprite {
                    sheet: SpriteSheet::Terrain,
                    source: SourceRect::new(8, 64, 16, 16),
                    dest: ScreenRect::tile(0, 0),
                },
                DrawPrimitive::Overlay {
                    dest: ScreenRect::tile(0, 0),
                    highlight: Highlight::None,
                },
            ]
        );
        assert_eq!((scene.width_px, scene.height_px), (16, 16));
    }

    #[test]
    fn hidden_terrain_draws_backgrounds() {
        let board = Board::blank(2, 1, Army::Red);
        let scene = compose(
            &board,
            SceneOptions {
                show_terrain: false,
            },
        );

        assert_eq!(
            scene.primitives[0],
            DrawPrimitive::Background {
                dest: ScreenRect::tile(0, 0)
            }
        );
        assert_eq!(scene.referenced_sheets(), Vec::new());
    }

    #[test]
    fn attack_highlight_wins_over_movement() {
        let at = Coord::new(0, 0);
        let board = Board::blank(1, 1, Army::Red).with_tile(
            Tile::new(at, MapTile::new(TerrainKind::Plain, None)).with_flags(true, true),
        );
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(
            scene.primitives[1],
            DrawPrimitive::Overlay {
                dest: ScreenRect::tile(0, 0),
                highlight: Highlight::Attackable,
            }
        );
    }

    #[test]
    fn selected_unit_gets_an_extra_overlay_before_its_sprite() {
        let at = Coord::new(1, 0);
        let unit = Unit::new("sel", Army::Red, UnitKind::Infantry);
        let board = Board::blank(2, 1, Army::Red)
            .with_tile(Tile::new(at, MapTile::new(TerrainKind::Plain, None)).with_unit(unit))
            .with_selected(at);
        let scene = compose(&board, SceneOptions::default());
        let tile_primitives = &scene.primitives[2..];

        assert!(matches!(
            tile_primitives[2],
            DrawPrimitive::Overlay {
                highlight: Highlight::Selected,
                ..
            }
        ));
        assert_eq!(
            tile_primitives[3],
            DrawPrimitive::Sprite {
                sheet: SpriteSheet::Units,
                source: SourceRect::new(4, 105, 16, 16),
                dest: ScreenRect::tile(1, 0),
            }
        );
    }

    #[test]
    fn unrecognized_terrain_still_draws_overlay_and_unit() {
        let at = Coord::new(0, 0);
        let mut tile = Tile::new(at, MapTile::new(TerrainKind::Plain, None))
            .with_unit(Unit::new("u", Army::Blue, UnitKind::Recon));
        tile.map_tile.terrain = TerrainType::Unrecognized("LAVA".to_string());
        let board = Board::blank(1, 1, Army::Blue).with_tile(tile);
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(scene.primitives.len(), 2);
        assert!(matches!(scene.primitives[0], DrawPrimitive::Overlay { .. }));
        assert!(matches!(
            scene.primitives[1],
            DrawPrimitive::Sprite {
                sheet: SpriteSheet::Units,
                ..
            }
        ));
    }

    #[test]
    fn unrecognized_unit_keeps_its_overlay_and_badges() {
        let at = Coord::new(0, 0);
        let mut unit = Unit::new("h", Army::Red, UnitKind::Tank).with_status(UnitStatus {
            hp: 40,
            fuel: 10,
            ammo: 9,
            cargo: Vec::new(),
        });
        unit.unit_type = UnitType::Unrecognized("HOVERCRAFT".to_string());
        let board = Board::blank(1, 1, Army::Red)
            .with_tile(Tile::new(at, MapTile::new(TerrainKind::Plain, None)).with_unit(unit));
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(scene.primitives.len(), 4);
        assert!(matches!(scene.primitives[1], DrawPrimitive::Overlay { .. }));
        for badge in &scene.primitives[2..] {
            match badge {
                DrawPrimitive::Sprite { sheet, dest, .. } => {
                    assert_eq!(*sheet, SpriteSheet::Units);
                    assert_eq!(dest.size, Vec2::splat(8.0));
                }
                other => panic!("expected a badge, got {other:?}"),
            }
        }
    }

    #[test]
    fn stealth_units_have_no_sprite_but_still_show_damage() {
        let at = Coord::new(0, 0);
        let unit = Unit::new("s", Army::Blue, UnitKind::Stealth).with_status(UnitStatus {
            hp: 50,
            ..UnitStatus::default()
        });
        let board = Board::blank(1, 1, Army::Blue)
            .with_tile(Tile::new(at, MapTile::new(TerrainKind::Plain, None)).with_unit(unit));
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(scene.primitives.len(), 3);
        assert!(matches!(
            scene.primitives[2],
            DrawPrimitive::Sprite {
                sheet: SpriteSheet::Units,
                dest: ScreenRect { size, .. },
                ..
            } if size == Vec2::splat(8.0)
        ));
    }

    #[test]
    fn oversized_boards_saturate_instead_of_overflowing() {
        let mut board = Board::blank(0, 0, Army::Red);
        board.width = 300_000_000;
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(scene.width_px, u32::MAX);
        assert!(scene.primitives.is_empty());
    }

    #[test]
    fn tall_terrain_overhangs_the_row_above() {
        let at = Coord::new(0, 1);
        let board = Board::blank(1, 2, Army::Red)
            .with_tile(Tile::new(at, MapTile::new(TerrainKind::Mountain, None)));
        let scene = compose(&board, SceneOptions::default());

        assert_eq!(
            scene.primitives[2],
            DrawPrimitive::Sprite {
                sheet: SpriteSheet::Terrain,
                source: SourceRect::new(25, 31, 16, 32),
                dest: ScreenRect::new(Vec2::new(0.0, 0.0), Vec2::new(16.0, 32.0)),
            }
        );
    }
}
