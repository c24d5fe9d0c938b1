use warboard_core::UnitKind;
use warboard_rendering::DialogChoice;
use warboard_rendering_macroquad::{DialogInputState, PanelButton};

fn replay_choices(sequence: &[Option<DialogChoice>]) -> Vec<Option<DialogChoice>> {
    let mut state = DialogInputState::default();
    let mut observed = Vec::new();
    for choice in sequence {
        observed.push(state.take_dialog_choice());
        if let Some(choice) = choice {
            state.register_dialog_choice(*choice);
        }
    }

    // Flush any trailing latched press so the harness observes the final choice.
    observed.push(state.take_dialog_choice());
    observed
}

fn replay_button(button: PanelButton, sequence: &[bool]) -> Vec<bool> {
    let mut state = DialogInputState::default();
    let mut observed = Vec::new();
    for &pressed in sequence {
        observed.push(state.take_button(button));
        if pressed {
            state.register_button(button);
        }
    }
    observed.push(state.take_button(button));
    observed
}

#[test]
fn dialog_choices_reach_the_next_frame_exactly_once() {
    let tank = Some(DialogChoice::Confirm(UnitKind::Tank));
    let cancel = Some(DialogChoice::Cancel);
    let sequence = [None, tank, None, cancel, None];
    let expected = vec![None, None, tank, None, cancel, None];

    let first_run = replay_choices(&sequence);
    let second_run = replay_choices(&sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn later_press_in_the_same_frame_wins() {
    let mut state = DialogInputState::default();
    state.register_dialog_choice(DialogChoice::Confirm(UnitKind::Recon));
    state.register_dialog_choice(DialogChoice::Cancel);

    assert_eq!(state.take_dialog_choice(), Some(DialogChoice::Cancel));
    assert_eq!(state.take_dialog_choice(), None);
}

#[test]
fn end_turn_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = replay_button(PanelButton::EndTurn, &button_sequence);
    let second_run = replay_button(PanelButton::EndTurn, &button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn refresh_and_game_buttons_replay_like_end_turn() {
    let button_sequence = [true, false, true];
    let expected = vec![false, true, false, true];

    for button in [
        PanelButton::Refresh,
        PanelButton::StartGame,
        PanelButton::EndGame,
    ] {
        assert_eq!(replay_button(button, &button_sequence), expected);
    }
}

#[test]
fn button_latches_are_independent() {
    let mut state = DialogInputState::default();
    state.register_button(PanelButton::StartGame);
    state.register_button(PanelButton::Refresh);

    assert!(!state.take_button(PanelButton::EndTurn));
    assert!(!state.take_button(PanelButton::EndGame));
    assert!(state.take_button(PanelButton::Refresh));
    assert!(state.take_button(PanelButton::StartGame));
    assert!(!state.take_button(PanelButton::StartGame));
}
