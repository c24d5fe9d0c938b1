//! JSON-RPC 2.0 envelopes exchanged with the game server.

use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;
use warboard_core::{Command, Coord};

use crate::TransportError;

/// Protocol version stamped on every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method fetching the full board snapshot.
pub const FETCH_BOARD_METHOD: &str = "game_board";

/// Request envelope posted to the server.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RpcRequest {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Remote method name.
    pub method: &'static str,
    /// Named parameters, including the game token.
    pub params: Value,
    /// Fresh identifier correlating the reply.
    pub id: Uuid,
}

impl RpcRequest {
    /// Builds a request carrying `params` plus the game `token`.
    #[must_use]
    pub fn new(method: &'static str, mut params: Map<String, Value>, token: &str) -> Self {
        let _ = params.insert("token".to_string(), Value::String(token.to_string()));
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params: Value::Object(params),
            id: Uuid::new_v4(),
        }
    }

    /// Request fetching the current board snapshot.
    #[must_use]
    pub fn fetch_board(token: &str) -> Self {
        Self::new(FETCH_BOARD_METHOD, Map::new(), token)
    }

    /// Request submitting `command`.
    #[must_use]
    pub fn command(command: &Command, token: &str) -> Self {
        let (method, params) = command_call(command);
        Self::new(method, params, token)
    }

    /// Integer parameter `name`, if present.
    #[must_use]
    pub fn int_param(&self, name: &str) -> Option<i64> {
        self.params.get(name)?.as_i64()
    }

    /// String parameter `name`, if present.
    #[must_use]
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name)?.as_str()
    }
}

/// Reply correlated with a previously sent request.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcReply {
    /// Identifier of the originating request.
    pub id: Uuid,
    /// Result value or the failure that prevented one.
    pub outcome: Result<Value, TransportError>,
}

impl RpcReply {
    /// Successful reply carrying `result`.
    #[must_use]
    pub fn success(id: Uuid, result: Value) -> Self {
        Self {
            id,
            outcome: Ok(result),
        }
    }

    /// Failed reply.
    #[must_use]
    pub fn failure(id: Uuid, error: TransportError) -> Self {
        Self {
            id,
            outcome: Err(error),
        }
    }
}

fn at(coord: Coord) -> Map<String, Value> {
    let mut params = Map::new();
    let _ = params.insert("x".to_string(), json!(coord.x));
    let _ = params.insert("y".to_string(), json!(coord.y));
    params
}

fn between(from: Coord, to: Coord) -> Map<String, Value> {
    let mut params = at(from);
    let _ = params.insert("x2".to_string(), json!(to.x));
    let _ = params.insert("y2".to_string(), json!(to.y));
    params
}

/// Remote method and parameters implementing `command`.
#[must_use]
pub fn command_call(command: &Command) -> (&'static str, Map<String, Value>) {
    match command {
        Command::SendChat { text } => {
            let mut params = Map::new();
            let _ = params.insert("msg".to_string(), Value::String(text.clone()));
            ("message", params)
        }
        Command::EndTurn => ("army_end_turn", Map::new()),
        Command::StartGame => ("start_game", Map::new()),
        Command::EndGame => ("end_game", Map::new()),
        Command::Select { at: coord } => ("unit_select", at(*coord)),
        Command::Capture { at: coord } => ("capture_tile", at(*coord)),
        Command::Wait { at: coord } => ("unit_wait", at(*coord)),
        Command::Attack { from, to } => ("unit_attack", between(*from, *to)),
        Command::Load { from, onto } => ("unit_load", between(*from, *onto)),
        Command::Unload {
            from,
            onto,
            cargo_index,
        } => {
            let mut params = between(*from, *onto);
            let _ = params.insert("index".to_string(), json!(cargo_index));
            ("unit_unload", params)
        }
        Command::Join { from, into } => ("unit_join", between(*from, *into)),
        Command::Move { from, to } => ("unit_move", between(*from, *to)),
        Command::CreateUnit {
            army,
            kind,
            at: coord,
        } => {
            let mut params = at(*coord);
            let _ = params.insert("army".to_string(), json!(army.name()));
            let _ = params.insert("unit_type".to_string(), json!(kind.name()));
            ("unit_create", params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warboard_core::{Army, UnitKind};

    #[test]
    fn requests_carry_version_token_and_fresh_ids() {
        let first = RpcRequest::fetch_board("game-1");
        let second = RpcRequest::fetch_board("game-1");

        assert_eq!(first.jsonrpc, "2.0");
        assert_eq!(first.method, "game_board");
        assert_eq!(first.str_param("token"), Some("game-1"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn two_tile_commands_use_second_coordinate_names() {
        let request = RpcRequest::command(
            &Command::Attack {
                from: Coord::new(1, 2),
                to: Coord::new(3, 4),
            },
            "t",
        );

        assert_eq!(request.method, "unit_attack");
        assert_eq!(
            request.params,
            json!({"x": 1, "y": 2, "x2": 3, "y2": 4, "token": "t"})
        );
    }

    #[test]
    fn unload_sends_the_cargo_index() {
        let (method, params) = command_call(&Command::Unload {
            from: Coord::new(0, 0),
            onto: Coord::new(0, 1),
            cargo_index: 0,
        });

        assert_eq!(method, "unit_unload");
        assert_eq!(params.get("index"), Some(&json!(0)));
    }

    #[test]
    fn create_unit_uses_wire_names() {
        let request = RpcRequest::command(
            &Command::CreateUnit {
                army: Army::Blue,
                kind: UnitKind::Tank,
                at: Coord::new(3, 4),
            },
            "t",
        );

        assert_eq!(request.method, "unit_create");
        assert_eq!(request.str_param("army"), Some("BLUE"));
        assert_eq!(request.str_param("unit_type"), Some("TANK"));
        assert_eq!(request.int_param("x"), Some(3));
        assert_eq!(request.int_param("y"), Some(4));
    }

    #[test]
    fn chat_message_is_sent_verbatim() {
        let request = RpcRequest::command(
            &Command::SendChat {
                text: "gg".to_string(),
            },
            "t",
        );

        assert_eq!(request.method, "message");
        assert_eq!(request.str_param("msg"), Some("gg"));
    }

    #[test]
    fn envelope_serializes_as_json_rpc() {
        let request = RpcRequest::command(&Command::EndTurn, "t");
        let encoded = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(encoded["jsonrpc"], "2.0");
        assert_eq!(encoded["method"], "army_end_turn");
        assert_eq!(encoded["id"], json!(request.id.to_string()));
    }
}
