use warboard_core::{
    Army, Board, Command, Coord, CursorHint, MapTile, ProductionDomain, TerrainKind, Tile, Unit,
    UnitKind,
};
use warboard_system_interaction::{
    dispatch, handle_click, handle_double_click, hover_hint, Interaction, Modifiers,
    PointerAction,
};

const SELECTED: Coord = Coord::new(0, 0);

fn plain(at: Coord) -> Tile {
    Tile::new(at, MapTile::new(TerrainKind::Plain, None))
}

/// 4x4 board with a selected red tank at the origin and red to move.
fn board_with_selection() -> Board {
    Board::blank(4, 4, Army::Red)
        .with_tile(plain(SELECTED).with_unit(Unit::new("tank", Army::Red, UnitKind::Tank)))
        .with_selected(SELECTED)
}

fn click(board: &Board, at: Coord, modifiers: Modifiers) -> Vec<Interaction> {
    let mut out = Vec::new();
    handle_click(board, at, modifiers, &mut out);
    out
}

fn double_click(board: &Board, at: Coord) -> Vec<Interaction> {
    let mut out = Vec::new();
    handle_double_click(board, at, &mut out);
    out
}

fn command(command: Command) -> Interaction {
    Interaction::Command(command)
}

#[test]
fn attackable_tile_emits_a_single_attack_from_the_selection() {
    let target = Coord::new(2, 1);
    let board = board_with_selection().with_tile(
        plain(target)
            .with_unit(Unit::new("enemy", Army::Blue, UnitKind::Recon))
            .with_flags(false, true),
    );

    assert_eq!(
        click(&board, target, Modifiers::NONE),
        vec![command(Command::Attack {
            from: SELECTED,
            to: target
        })]
    );
}

#[test]
fn movable_tile_emits_a_single_move() {
    let target = Coord::new(1, 0);
    let board = board_with_selection().with_tile(plain(target).with_flags(true, false));

    assert_eq!(
        click(&board, target, Modifiers::NONE),
        vec![command(Command::Move {
            from: SELECTED,
            to: target
        })]
    );
}

#[test]
fn attack_is_emitted_before_move_when_both_flags_are_set() {
    let target = Coord::new(1, 1);
    let board = board_with_selection().with_tile(plain(target).with_flags(true, true));

    // Both flags come from the server; the click reports both decisions in
    // table order rather than choosing one.
    assert_eq!(
        click(&board, target, Modifiers::NONE),
        vec![
            command(Command::Attack {
                from: SELECTED,
                to: target
            }),
            command(Command::Move {
                from: SELECTED,
                to: target
            }),
        ]
    );
}

#[test]
fn modifier_commands_combine_with_attack() {
    let target = Coord::new(1, 0);
    let board = board_with_selection().with_tile(
        plain(target)
            .with_unit(Unit::new("enemy", Army::Blue, UnitKind::Infantry))
            .with_flags(false, true),
    );

    assert_eq!(
        click(&board, target, Modifiers::new(true, false)),
        vec![
            command(Command::Load {
                from: SELECTED,
                onto: target
            }),
            command(Command::Attack {
                from: SELECTED,
                to: target
            }),
        ]
    );
    assert_eq!(
        click(&board, target, Modifiers::new(false, true)),
        vec![
            command(Command::Unload {
                from: SELECTED,
                onto: target,
                cargo_index: 0
            }),
            command(Command::Attack {
                from: SELECTED,
                to: target
            }),
        ]
    );
}

#[test]
fn clicking_an_own_unit_with_actions_selects_it() {
    let target = Coord::new(3, 3);
    let board = board_with_selection().with_tile(
        plain(target)
            .with_unit(Unit::new("inf", Army::Red, UnitKind::Infantry).with_actions(
                false, false, true,
            )),
    );

    assert_eq!(
        click(&board, target, Modifiers::NONE),
        vec![command(Command::Select { at: target })]
    );
}

#[test]
fn enemy_units_are_not_selectable() {
    let target = Coord::new(2, 2);
    let board = board_with_selection()
        .with_tile(plain(target).with_unit(Unit::new("e", Army::Blue, UnitKind::Tank)));

    assert!(click(&board, target, Modifiers::NONE).is_empty());
}

#[test]
fn own_vacant_production_structures_open_the_matching_catalog() {
    let cases = [
        (TerrainKind::Factory, ProductionDomain::Ground),
        (TerrainKind::Airport, ProductionDomain::Air),
        (TerrainKind::Port, ProductionDomain::Sea),
    ];
    for (kind, catalog) in cases {
        let at = Coord::new(2, 0);
        let board = board_with_selection()
            .with_tile(Tile::new(at, MapTile::new(kind, Some(Army::Red))));

        assert_eq!(
            click(&board, at, Modifiers::NONE),
            vec![Interaction::OpenUnitCreation { at, catalog }],
            "{kind:?}"
        );
        assert_eq!(hover_hint(&board, at), CursorHint::Produce);
    }
}

#[test]
fn opposing_factory_neither_opens_the_dialog_nor_emits_commands() {
    let at = Coord::new(3, 0);
    let board = board_with_selection()
        .with_tile(Tile::new(at, MapTile::new(TerrainKind::Factory, Some(Army::Blue))));

    assert!(click(&board, at, Modifiers::NONE).is_empty());
    assert_eq!(hover_hint(&board, at), CursorHint::Default);
}

#[test]
fn occupied_factory_does_not_open_the_dialog() {
    let at = Coord::new(1, 2);
    let blocker = Unit::new("b", Army::Red, UnitKind::Tank).with_actions(false, false, false);
    let board = board_with_selection().with_tile(
        Tile::new(at, MapTile::new(TerrainKind::Factory, Some(Army::Red))).with_unit(blocker),
    );

    assert!(click(&board, at, Modifiers::NONE).is_empty());
}

#[test]
fn selection_dependent_steps_are_skipped_without_a_selection() {
    let target = Coord::new(1, 0);
    let board = Board::blank(2, 1, Army::Red).with_tile(plain(target).with_flags(true, true));

    assert!(click(&board, target, Modifiers::new(true, false)).is_empty());
}

#[test]
fn double_click_captures_with_infantry_on_a_city() {
    let at = Coord::new(1, 1);
    let board = board_with_selection().with_tile(
        Tile::new(at, MapTile::new(TerrainKind::City, None))
            .with_unit(Unit::new("inf", Army::Red, UnitKind::Infantry)),
    );

    assert_eq!(
        double_click(&board, at),
        vec![command(Command::Capture { at })]
    );
}

#[test]
fn double_click_with_capture_flag_on_non_infantry_waits() {
    let at = Coord::new(1, 1);
    let tank = Unit::new("t", Army::Red, UnitKind::Tank).with_actions(true, true, true);
    for kind in [TerrainKind::City, TerrainKind::Plain] {
        let board = board_with_selection()
            .with_tile(Tile::new(at, MapTile::new(kind, None)).with_unit(tank.clone()));

        assert_eq!(
            double_click(&board, at),
            vec![command(Command::Wait { at })],
            "{kind:?}"
        );
    }
}

#[test]
fn double_click_with_infantry_off_a_structure_waits() {
    let at = Coord::new(2, 3);
    let board = board_with_selection()
        .with_tile(plain(at).with_unit(Unit::new("m", Army::Red, UnitKind::Mech)));

    assert_eq!(double_click(&board, at), vec![command(Command::Wait { at })]);
}

#[test]
fn double_click_on_an_empty_tile_does_nothing() {
    let board = board_with_selection();

    assert!(double_click(&board, Coord::new(3, 3)).is_empty());
}

#[test]
fn hover_prefers_move_then_attack_then_select() {
    let board = board_with_selection()
        .with_tile(plain(Coord::new(1, 0)).with_flags(true, true))
        .with_tile(plain(Coord::new(2, 0)).with_flags(false, true));

    assert_eq!(hover_hint(&board, Coord::new(1, 0)), CursorHint::Move);
    assert_eq!(hover_hint(&board, Coord::new(2, 0)), CursorHint::Attack);
    assert_eq!(hover_hint(&board, SELECTED), CursorHint::Select);
    assert_eq!(hover_hint(&board, Coord::new(3, 3)), CursorHint::Default);
}

#[test]
fn dispatch_routes_gestures() {
    let at = Coord::new(0, 0);
    let board = board_with_selection();
    let mut out = Vec::new();

    dispatch(&board, PointerAction::Click, at, Modifiers::NONE, &mut out);
    dispatch(&board, PointerAction::DoubleClick, at, Modifiers::NONE, &mut out);

    assert_eq!(
        out,
        vec![
            command(Command::Select { at }),
            command(Command::Wait { at }),
        ]
    );
}
