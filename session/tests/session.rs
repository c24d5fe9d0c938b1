use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use serde_json::{json, Value};
use warboard_core::{Army, Coord, CursorHint, PushEvent, UnitKind};
use warboard_rendering::{DrawPrimitive, SceneOptions};
use warboard_session::{
    PushChannel, RpcReply, RpcRequest, Session, SessionConfig, Transport, TransportError,
};
use warboard_system_interaction::{Modifiers, PointerAction};

#[derive(Default)]
struct Wire {
    sent: Vec<RpcRequest>,
    replies: VecDeque<RpcReply>,
    push: VecDeque<PushEvent>,
    refuse: bool,
}

/// Transport recording every request; replies are scripted by the test.
#[derive(Clone, Default)]
struct Recording(Rc<RefCell<Wire>>);

impl Recording {
    fn sent_methods(&self) -> Vec<&'static str> {
        self.0.borrow().sent.iter().map(|request| request.method).collect()
    }

    fn last_sent(&self) -> RpcRequest {
        self.0
            .borrow()
            .sent
            .last()
            .cloned()
            .expect("a request was sent")
    }

    fn answer_last(&self, result: Value) {
        let id = self.last_sent().id;
        self.0
            .borrow_mut()
            .replies
            .push_back(RpcReply::success(id, result));
    }

    fn fail_last(&self, error: TransportError) {
        let id = self.last_sent().id;
        self.0
            .borrow_mut()
            .replies
            .push_back(RpcReply::failure(id, error));
    }

    fn push(&self, event: PushEvent) {
        self.0.borrow_mut().push.push_back(event);
    }
}

impl Transport for Recording {
    fn send(&mut self, request: RpcRequest) -> Result<(), TransportError> {
        let mut wire = self.0.borrow_mut();
        if wire.refuse {
            return Err(TransportError::Unreachable("offline".to_string()));
        }
        wire.sent.push(request);
        Ok(())
    }

    fn poll(&mut self) -> Vec<RpcReply> {
        self.0.borrow_mut().replies.drain(..).collect()
    }
}

impl PushChannel for Recording {
    fn poll(&mut self) -> Vec<PushEvent> {
        self.0.borrow_mut().push.drain(..).collect()
    }
}

fn snapshot(current_turn: &str) -> Value {
    json!({
        "width": 2,
        "height": 2,
        "days": 1,
        "current_turn": current_turn,
        "game_active": true,
        "selected": null,
        "grid": [
            {"x": 0, "y": 0, "mapTile": {"type": "PLAIN", "army": null},
             "unit": {"id": "inf", "army": "BLUE", "type": "INFANTRY",
                      "can_move": true, "can_attack": true, "can_capture": true,
                      "status": {"hp": 100, "fuel": 99, "ammo": 0, "cargo": []}},
             "can_be_moved_to": false, "can_be_attacked": false, "capture_hp": 20},
            {"x": 1, "y": 0, "mapTile": {"type": "FACTORY", "army": "BLUE"},
             "unit": null, "can_be_moved_to": false, "can_be_attacked": false, "capture_hp": 20},
            {"x": 0, "y": 1, "mapTile": {"type": "SEA", "army": null},
             "unit": null, "can_be_moved_to": false, "can_be_attacked": false, "capture_hp": 20},
            {"x": 1, "y": 1, "mapTile": {"type": "CITY", "army": "RED"},
             "unit": null, "can_be_moved_to": false, "can_be_attacked": false, "capture_hp": 20}
        ]
    })
}

fn session() -> (Session<Recording, Recording>, Recording) {
    let wire = Recording::default();
    let session = Session::new(SessionConfig::new("game-7"), wire.clone(), wire.clone());
    (session, wire)
}

fn loaded_session(turn: &str) -> (Session<Recording, Recording>, Recording) {
    let (mut session, wire) = session();
    session.request_board();
    wire.answer_last(snapshot(turn));
    assert!(session.pump(), "first fetch installs a context");
    (session, wire)
}

#[test]
fn context_is_created_on_first_successful_fetch() {
    let (mut session, wire) = session();
    assert!(session.context().is_none());

    session.request_board();
    assert_eq!(wire.sent_methods(), vec!["game_board"]);
    assert_eq!(wire.last_sent().str_param("token"), Some("game-7"));
    assert!(!session.pump(), "nothing arrives before the reply");

    wire.answer_last(snapshot("BLUE"));
    assert!(session.pump());

    let context = session.context().expect("context exists");
    assert_eq!(context.generation, 1);
    assert_eq!(context.board.current_turn, Army::Blue);
    assert_eq!((context.scene.width_px, context.scene.height_px), (32, 32));
    assert_eq!(session.pending_requests(), 0);
}

#[test]
fn board_changed_push_triggers_a_refetch_that_replaces_the_context() {
    let (mut session, wire) = loaded_session("BLUE");
    let previous = session.board().expect("board installed");

    wire.push(PushEvent::BoardChanged);
    assert!(!session.pump());
    assert_eq!(wire.sent_methods(), vec!["game_board", "game_board"]);

    wire.answer_last(snapshot("RED"));
    assert!(session.pump());

    assert_eq!(previous.current_turn, Army::Blue, "old snapshot stays intact");
    let context = session.context().expect("context exists");
    assert_eq!(context.board.current_turn, Army::Red);
    assert_eq!(context.generation, 2);
}

#[test]
fn invalid_snapshot_keeps_the_previous_context() {
    let (mut session, wire) = loaded_session("BLUE");

    session.request_board();
    let mut broken = snapshot("RED");
    let _ = broken["grid"].as_array_mut().expect("grid").pop();
    wire.answer_last(broken);

    assert!(!session.pump());
    let context = session.context().expect("context kept");
    assert_eq!(context.board.current_turn, Army::Blue);
    assert_eq!(context.generation, 1);
}

#[test]
fn stale_replies_are_applied_in_arrival_order() {
    let (mut session, wire) = loaded_session("BLUE");

    session.request_board();
    let older = wire.last_sent().id;
    session.request_board();
    let newer = wire.last_sent().id;

    {
        let mut wire = wire.0.borrow_mut();
        wire.replies
            .push_back(RpcReply::success(newer, snapshot("RED")));
        wire.replies
            .push_back(RpcReply::success(older, snapshot("BLUE")));
    }
    assert!(session.pump());

    let context = session.context().expect("context exists");
    assert_eq!(context.board.current_turn, Army::Blue);
    assert_eq!(context.generation, 3);
}

#[test]
fn clicks_submit_dispatched_commands() {
    let (mut session, wire) = loaded_session("BLUE");

    session.pointer(PointerAction::Click, Coord::new(0, 0), Modifiers::NONE);
    let select = wire.last_sent();
    assert_eq!(select.method, "unit_select");
    assert_eq!((select.int_param("x"), select.int_param("y")), (Some(0), Some(0)));

    session.pointer(PointerAction::DoubleClick, Coord::new(0, 0), Modifiers::NONE);
    assert_eq!(wire.last_sent().method, "unit_wait");
}

#[test]
fn failed_commands_are_dropped_without_retry() {
    let (mut session, wire) = loaded_session("BLUE");

    session.pointer(PointerAction::Click, Coord::new(0, 0), Modifiers::NONE);
    wire.fail_last(TransportError::Status(500));
    assert!(!session.pump());

    assert_eq!(wire.sent_methods(), vec!["game_board", "unit_select"]);
    assert_eq!(session.pending_requests(), 0);
    assert!(session.context().is_some());
}

#[test]
fn refused_sends_are_not_tracked() {
    let (mut session, wire) = loaded_session("BLUE");
    wire.0.borrow_mut().refuse = true;

    session.pointer(PointerAction::Click, Coord::new(0, 0), Modifiers::NONE);

    assert_eq!(session.pending_requests(), 0);
}

#[test]
fn factory_click_opens_the_dialog_and_confirmation_builds_for_the_owner() {
    let (mut session, wire) = loaded_session("BLUE");

    session.pointer(PointerAction::Click, Coord::new(1, 0), Modifiers::NONE);
    let dialog = session.creation_dialog().expect("dialog opened");
    assert_eq!(dialog.at(), Coord::new(1, 0));
    assert_eq!(wire.sent_methods(), vec!["game_board"]);

    session
        .confirm_creation(UnitKind::Tank)
        .expect("tank is in the ground catalog");
    let create = wire.last_sent();
    assert_eq!(create.method, "unit_create");
    assert_eq!(create.str_param("army"), Some("BLUE"));
    assert_eq!(create.str_param("unit_type"), Some("TANK"));
    assert!(session.creation_dialog().is_none());
}

#[test]
fn cancelled_dialog_emits_nothing() {
    let (mut session, wire) = loaded_session("BLUE");

    session.pointer(PointerAction::Click, Coord::new(1, 0), Modifiers::NONE);
    session.cancel_creation();

    assert!(session.confirm_creation(UnitKind::Tank).is_err());
    assert_eq!(wire.sent_methods(), vec!["game_board"]);
}

#[test]
fn chat_messages_are_logged_newest_last() {
    let (mut session, wire) = loaded_session("BLUE");

    wire.push(PushEvent::Connected);
    wire.push(PushEvent::ChatMessage("hello".to_string()));
    wire.push(PushEvent::ChatMessage("gl hf".to_string()));
    wire.push(PushEvent::Disconnected);
    let _ = session.pump();

    assert_eq!(session.chat().lines().collect::<Vec<_>>(), vec!["hello", "gl hf"]);

    session.send_chat("");
    session.send_chat("gg");
    assert_eq!(wire.last_sent().str_param("msg"), Some("gg"));
    assert_eq!(wire.sent_methods().len(), 2);
}

#[test]
fn hover_reflects_the_installed_board() {
    let (session, _) = session();
    assert_eq!(session.hover(Coord::new(0, 0)), CursorHint::Default);

    let (session, _) = loaded_session("BLUE");
    assert_eq!(session.hover(Coord::new(0, 0)), CursorHint::Select);
    assert_eq!(session.hover(Coord::new(1, 0)), CursorHint::Produce);
    assert_eq!(session.hover(Coord::new(1, 1)), CursorHint::Default);
}

#[test]
fn scene_options_recompose_the_current_board() {
    let (mut session, _) = loaded_session("BLUE");

    session.set_scene_options(SceneOptions {
        show_terrain: false,
    });

    let scene = &session.context().expect("context exists").scene;
    assert!(matches!(scene.primitives[0], DrawPrimitive::Background { .. }));
}

#[test]
fn close_tears_down_the_context_and_ignores_later_input() {
    let (mut session, wire) = loaded_session("BLUE");

    session.close();
    assert!(session.is_closed());
    assert!(session.context().is_none());
    assert!(session.board().is_none());

    wire.push(PushEvent::BoardChanged);
    assert!(!session.pump());
    session.pointer(PointerAction::Click, Coord::new(0, 0), Modifiers::NONE);
    session.request_board();

    assert_eq!(wire.sent_methods(), vec!["game_board"]);
}
