//! Authoritative board updates delivered by the game server.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::controller::BoardView;
use crate::error::Result;
use crate::surface::{FrameSink, Surface};
use crate::types::{Grid, Marker};

pub const LOSS_STATUS: &str = "You lose!";
pub const REPEATED_LOSS_STATUS: &str = "Don't be silly you lost!";
pub const DRAW_STATUS: &str = "A draw";

pub fn next_player_status(marker: Marker) -> String {
    format!("Next Player: {marker}")
}

/// Result codes carried in an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Loss,
    Draw,
}

impl Outcome {
    /// Returns `None` for codes this client does not know.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Outcome::Ongoing),
            1 => Some(Outcome::Loss),
            2 => Some(Outcome::Draw),
            _ => None,
        }
    }
}

/// Wrapper the server response arrives in: `{ "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEnvelope {
    pub data: BoardUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    pub board: Grid,
    pub next_player: Marker,
    /// Raw result code; omitted by the server while the game is ongoing.
    /// Anything that is not an integer decodes as `None`.
    #[serde(default = "ongoing_code", deserialize_with = "lenient_code")]
    pub result: Option<i64>,
    #[serde(default, alias = "winningRow")]
    pub winning_line: Option<Grid>,
}

impl BoardUpdate {
    pub fn outcome(&self) -> Option<Outcome> {
        self.result.and_then(Outcome::from_code)
    }
}

fn ongoing_code() -> Option<i64> {
    Some(0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Integer(i64),
    Other(IgnoredAny),
}

/// Accepts any JSON value so an odd result code never rejects the board.
fn lenient_code<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Integer(code) => Some(code),
        RawCode::Other(_) => None,
    })
}

/// Body sent to the server to ask for its reply to the current board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRequest {
    pub board: Grid,
}

/// Status line for an update. `had_result` is whether a result had already
/// been declared before this update was applied. Unknown result codes
/// yield `None`, leaving the previous status in place.
pub fn status_for(update: &BoardUpdate, had_result: bool) -> Option<String> {
    let status = match update.outcome()? {
        Outcome::Ongoing => next_player_status(update.next_player),
        Outcome::Loss if had_result => REPEATED_LOSS_STATUS.to_string(),
        Outcome::Loss => LOSS_STATUS.to_string(),
        Outcome::Draw => DRAW_STATUS.to_string(),
    };
    Some(status)
}

impl<S: Surface, F: FrameSink> BoardView<S, F> {
    /// Replaces the local board with the server's view, refreshes the
    /// status line and redraws.
    pub fn apply_update(&mut self, update: BoardUpdate) -> Result<()> {
        let had_result = self.state.has_result();
        let discarded = self.state.provisional_moves().len();
        self.state.apply_external_update(update.board, update.winning_line);

        match status_for(&update, had_result) {
            Some(status) => self.status = status,
            None => tracing::warn!(code = ?update.result, "ignoring unknown result code"),
        }
        tracing::debug!(
            result = ?update.result,
            has_result = self.state.has_result(),
            discarded,
            "applied board update"
        );

        self.draw()
    }

    pub fn apply_envelope(&mut self, envelope: UpdateEnvelope) -> Result<()> {
        self.apply_update(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn update(result: i64, winning_line: Option<Grid>) -> BoardUpdate {
        BoardUpdate {
            board: [[Cell::Empty; 3]; 3],
            next_player: Marker::Nought,
            result: Some(result),
            winning_line,
        }
    }

    #[test]
    fn ongoing_names_next_player() {
        assert_eq!(
            status_for(&update(0, None), false).as_deref(),
            Some("Next Player: 0")
        );
    }

    #[test]
    fn loss_message_depends_on_prior_result() {
        let line = Some([[Cell::Cross; 3], [Cell::Empty; 3], [Cell::Empty; 3]]);

        assert_eq!(status_for(&update(1, line), false).as_deref(), Some(LOSS_STATUS));
        assert_eq!(
            status_for(&update(1, line), true).as_deref(),
            Some(REPEATED_LOSS_STATUS)
        );
    }

    #[test]
    fn draw_and_unknown_codes() {
        assert_eq!(status_for(&update(2, None), false).as_deref(), Some(DRAW_STATUS));
        assert_eq!(status_for(&update(7, None), false), None);
    }

    #[test]
    fn decodes_server_response() {
        let json = r#"{"data":{"board":[[88,88,88],[48,48,0],[0,0,0]],"result":1,
            "winningRow":[[88,88,88],[0,0,0],[0,0,0]],"turn":6,"nextPlayer":48}}"#;

        let envelope: UpdateEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.data.outcome(), Some(Outcome::Loss));
        assert_eq!(envelope.data.next_player, Marker::Nought);
        assert_eq!(envelope.data.board[1], [Cell::Nought, Cell::Nought, Cell::Empty]);
        assert!(envelope.data.winning_line.is_some());
    }

    #[test]
    fn missing_result_means_ongoing() {
        let json = r#"{"board":[[88,0,0],[0,48,0],[0,0,0]],"nextPlayer":88}"#;

        let update: BoardUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.outcome(), Some(Outcome::Ongoing));
        assert_eq!(update.winning_line, None);
    }

    #[test]
    fn odd_result_codes_decode_as_unknown() {
        for code in ["-1", "1.5", "null", "\"loss\"", "4294967296"] {
            let json = format!(
                r#"{{"board":[[88,0,0],[0,0,0],[0,0,0]],"result":{code},"nextPlayer":48}}"#
            );

            let update: BoardUpdate = serde_json::from_str(&json).unwrap();

            assert_eq!(update.outcome(), None, "result {code}");
            assert_eq!(update.board[0][0], Cell::Cross);
        }
    }

    #[test]
    fn rejects_unknown_cell_codes() {
        let json = r#"{"board":[[1,0,0],[0,0,0],[0,0,0]],"nextPlayer":88}"#;

        assert!(serde_json::from_str::<BoardUpdate>(json).is_err());
    }

    #[test]
    fn request_serialises_board_codes() {
        let mut board = [[Cell::Empty; 3]; 3];
        board[0][2] = Cell::Cross;

        let json = serde_json::to_string(&BoardRequest { board }).unwrap();

        assert_eq!(json, r#"{"board":[[0,0,88],[0,0,0],[0,0,0]]}"#);
    }
}
