//! Stateful game controller wrapping Position.
//!
//! `GameState` owns the position, the two player bindings, move and
//! repetition history, and the status classification (check, checkmate,
//! stalemate, draws, resignation). [`GameState::apply_move`] is the only way
//! a move reaches the board; every precondition failure comes back as a
//! [`Rejection`] and leaves the game untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::board::Position;
use crate::engine::types::{
    ChessError, Color, DrawReason, GameStatus, Move, MoveRequest, Piece, PieceType, Rejection,
    Square,
};
use crate::engine::{legality, notation, pgn};

// =========================================================================
// Players
// =========================================================================

/// Identity bound to each colour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub white: String,
    pub black: String,
}

impl Players {
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Players {
            white: white.into(),
            black: black.into(),
        }
    }

    /// Colour played by `identity`, if it is bound at all. White wins when
    /// the same identity holds both sides.
    pub fn color_of(&self, identity: &str) -> Option<Color> {
        if self.white == identity {
            Some(Color::White)
        } else if self.black == identity {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn get(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

// =========================================================================
// RecordedMove / MoveOutcome
// =========================================================================

/// Tag for moves with side effects beyond relocating one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMove {
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
}

impl SpecialMove {
    fn of(mv: Move) -> Option<Self> {
        if mv.flags.is_castle_kingside() {
            Some(SpecialMove::CastleKingside)
        } else if mv.flags.is_castle_queenside() {
            Some(SpecialMove::CastleQueenside)
        } else if mv.flags.is_en_passant() {
            Some(SpecialMove::EnPassant)
        } else if mv.promotion.is_some() {
            Some(SpecialMove::Promotion)
        } else {
            None
        }
    }
}

/// A move in the game history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMove {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood before moving (a pawn for promotions).
    pub piece: Piece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
    /// SAN including the `+`/`#` suffix.
    pub notation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialMove>,
    pub timestamp: DateTime<Utc>,
}

impl RecordedMove {
    pub fn color(&self) -> Color {
        self.piece.color
    }
}

/// Result of a successful [`GameState::apply_move`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub recorded_move: RecordedMove,
    pub status: GameStatus,
    pub in_check: bool,
    pub winner: Option<Color>,
    pub draw_reason: Option<DrawReason>,
}

// =========================================================================
// GameState
// =========================================================================

/// A complete chess game between two bound identities.
#[derive(Clone, Debug)]
pub struct GameState {
    // Core state
    pub(crate) position: Position,
    pub(crate) players: Players,
    pub(crate) move_history: Vec<RecordedMove>,
    /// Keys of every position reached, including the current one.
    pub(crate) position_keys: Vec<String>,
    pub(crate) draw_offer: Option<Color>,

    // Status
    pub(crate) status: GameStatus,
    pub(crate) winner: Option<Color>,
    pub(crate) draw_reason: Option<DrawReason>,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Set when the game did not begin from the standard position.
    pub(crate) starting_fen: Option<String>,
}

impl GameState {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// New game from the standard starting position.
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self::with_position(Players::new(white, black), Position::starting(), None)
    }

    /// New game from an arbitrary FEN position.
    pub fn from_fen(
        white: impl Into<String>,
        black: impl Into<String>,
        fen: &str,
    ) -> Result<Self, ChessError> {
        let position = Position::from_fen(fen)?;
        Ok(Self::with_position(
            Players::new(white, black),
            position,
            Some(fen.to_string()),
        ))
    }

    fn with_position(players: Players, position: Position, starting_fen: Option<String>) -> Self {
        let mut game = Self {
            position,
            players,
            move_history: Vec::new(),
            position_keys: vec![position.key()],
            draw_offer: None,
            status: GameStatus::Playing,
            winner: None,
            draw_reason: None,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            starting_fen,
        };
        game.refresh_status();
        game
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.position.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        self.draw_reason
    }

    pub fn draw_offer(&self) -> Option<Color> {
        self.draw_offer
    }

    pub fn move_history(&self) -> &[RecordedMove] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<&RecordedMove> {
        self.move_history.last()
    }

    pub fn position_keys(&self) -> &[String] {
        &self.position_keys
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        legality::is_in_check(&self.position.board, self.position.side_to_move)
    }

    pub fn color_of(&self, identity: &str) -> Option<Color> {
        self.players.color_of(identity)
    }

    pub fn starting_fen(&self) -> Option<&str> {
        self.starting_fen.as_deref()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn to_pgn(&self) -> String {
        pgn::to_pgn(self)
    }

    /// 8×8 display array, rank 8 first. Pieces are like "wP", "bK".
    pub fn board_array(&self) -> [[String; 8]; 8] {
        self.position.board.board_array()
    }

    /// Legal moves of the piece on `sq`. Empty once the game is over.
    pub fn legal_moves_at(&self, sq: Square) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        legality::legal_moves_from(&self.position, sq)
    }

    /// All legal moves for the side to move. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        legality::all_legal_moves(&self.position)
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Validate and play a move for `identity`.
    ///
    /// Preconditions are checked in order: game not over, identity bound,
    /// identity's turn, a piece on the source, the piece is theirs, the
    /// destination is legal, the promotion kind is allowed. Promotion
    /// defaults to a queen.
    pub fn apply_move(
        &mut self,
        identity: &str,
        request: MoveRequest,
    ) -> Result<MoveOutcome, Rejection> {
        let color = self.check_actor(identity)?;
        let turn = self.position.side_to_move;
        if color != turn {
            return Err(Rejection::WrongTurn { expected: turn });
        }

        let piece = self
            .position
            .piece_at(request.from)
            .ok_or(Rejection::EmptySquare(request.from))?;
        if piece.color != color {
            return Err(Rejection::NotYourPiece(request.from));
        }

        let legal = legality::all_legal_moves(&self.position);
        let promotion = request.promotion.unwrap_or(PieceType::Queen);
        let mut reaching = legal
            .iter()
            .filter(|m| m.from == request.from && m.to == request.to)
            .peekable();
        let Some(first) = reaching.peek() else {
            return Err(Rejection::IllegalMove {
                from: request.from,
                to: request.to,
            });
        };
        // The requested kind only matters when the move promotes.
        if first.promotion.is_some()
            && let Some(kind) = request.promotion
            && !PieceType::PROMOTIONS.contains(&kind)
        {
            return Err(Rejection::InvalidPromotion(kind));
        }
        let mv = reaching
            .find(|m| m.promotion.is_none() || m.promotion == Some(promotion))
            .copied()
            .ok_or(Rejection::IllegalMove {
                from: request.from,
                to: request.to,
            })?;

        Ok(self.commit(mv, piece, &legal))
    }

    /// Parse SAN and play it for `identity`.
    pub fn apply_san(&mut self, identity: &str, san: &str) -> Result<MoveOutcome, Rejection> {
        self.check_actor(identity)?;
        let mv = notation::parse_san(&self.position, san)
            .map_err(|_| Rejection::UnparsableMove(san.to_string()))?;
        self.apply_move(identity, mv.to_request())
    }

    /// Apply an already-validated move and record it.
    fn commit(&mut self, mv: Move, piece: Piece, legal: &[Move]) -> MoveOutcome {
        let san = notation::move_to_san(&self.position, mv, legal);

        let captured = self.position.apply(mv);
        self.position_keys.push(self.position.key());
        self.draw_offer = None;
        self.refresh_status();

        let suffix = match self.status {
            GameStatus::Checkmate => "#",
            _ if self.in_check() => "+",
            _ => "",
        };

        let record = RecordedMove {
            from: mv.from,
            to: mv.to,
            piece,
            captured,
            promotion: mv.promotion,
            notation: format!("{san}{suffix}"),
            special: SpecialMove::of(mv),
            timestamp: Utc::now(),
        };
        self.move_history.push(record.clone());

        MoveOutcome {
            recorded_move: record,
            status: self.status,
            in_check: self.in_check(),
            winner: self.winner,
            draw_reason: self.draw_reason,
        }
    }

    /// Colour of `identity`, provided the game is still running.
    fn check_actor(&self, identity: &str) -> Result<Color, Rejection> {
        if self.status.is_game_over() {
            return Err(Rejection::GameOver(self.status));
        }
        self.players
            .color_of(identity)
            .ok_or_else(|| Rejection::NotAPlayer(identity.to_string()))
    }

    // -----------------------------------------------------------------
    // Resignation & draw offers
    // -----------------------------------------------------------------

    /// `identity` concedes; the opponent wins.
    pub fn resign(&mut self, identity: &str) -> Result<(), Rejection> {
        let color = self.check_actor(identity)?;
        self.status = GameStatus::Resigned;
        self.winner = Some(!color);
        self.draw_reason = None;
        self.draw_offer = None;
        Ok(())
    }

    pub fn offer_draw(&mut self, identity: &str) -> Result<(), Rejection> {
        let color = self.check_actor(identity)?;
        if self.draw_offer.is_some() {
            return Err(Rejection::DrawAlreadyOffered);
        }
        self.draw_offer = Some(color);
        Ok(())
    }

    /// Accept the opponent's pending offer; the game ends drawn by agreement.
    pub fn accept_draw(&mut self, identity: &str) -> Result<(), Rejection> {
        self.answer_draw_offer(identity)?;
        self.status = GameStatus::Draw;
        self.winner = None;
        self.draw_reason = Some(DrawReason::Agreement);
        self.draw_offer = None;
        Ok(())
    }

    pub fn decline_draw(&mut self, identity: &str) -> Result<(), Rejection> {
        self.answer_draw_offer(identity)?;
        self.draw_offer = None;
        Ok(())
    }

    fn answer_draw_offer(&self, identity: &str) -> Result<(), Rejection> {
        let color = self.check_actor(identity)?;
        match self.draw_offer {
            None => Err(Rejection::NoDrawOffer),
            Some(offerer) if offerer == color => Err(Rejection::OwnDrawOffer),
            Some(_) => Ok(()),
        }
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    pub(crate) fn refresh_status(&mut self) {
        let (status, winner, reason) = self.compute_status();
        self.status = status;
        self.winner = winner;
        self.draw_reason = reason;
    }

    fn compute_status(&self) -> (GameStatus, Option<Color>, Option<DrawReason>) {
        let side = self.position.side_to_move;
        let in_check = self.in_check();

        if !legality::has_any_legal_move(&self.position) {
            return if in_check {
                (GameStatus::Checkmate, Some(!side), None)
            } else {
                (GameStatus::Stalemate, None, None)
            };
        }

        let draw = |reason| (GameStatus::Draw, None, Some(reason));
        if self.position.halfmove_clock >= 100 {
            return draw(DrawReason::FiftyMoveRule);
        }
        if self.is_threefold_repetition() {
            return draw(DrawReason::ThreefoldRepetition);
        }
        if self.position.board.is_insufficient_material() {
            return draw(DrawReason::InsufficientMaterial);
        }

        if in_check {
            (GameStatus::Check, None, None)
        } else {
            (GameStatus::Playing, None, None)
        }
    }

    /// Current position key has appeared 3+ times.
    fn is_threefold_repetition(&self) -> bool {
        let Some(current) = self.position_keys.last() else {
            return false;
        };
        self.position_keys.iter().filter(|k| *k == current).count() >= 3
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = "alice";
    const B: &str = "bob";

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(g: &mut GameState, from: &str, to: &str) -> MoveOutcome {
        let who = g.players.get(g.turn()).to_string();
        g.apply_move(&who, MoveRequest::new(sq(from), sq(to)))
            .unwrap()
    }

    fn fen_game(fen: &str) -> GameState {
        GameState::from_fen(W, B, fen).unwrap()
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_is_playing() {
        let g = GameState::new(W, B);
        assert_eq!(g.status(), GameStatus::Playing);
        assert!(!g.is_game_over());
        assert_eq!(g.turn(), Color::White);
        assert_eq!(g.position_keys().len(), 1);
        assert_eq!(g.color_of(B), Some(Color::Black));
        assert_eq!(g.color_of("carol"), None);
        assert!(g.starting_fen().is_none());
    }

    #[test]
    fn game_from_fen() {
        let g = fen_game("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(g.turn(), Color::Black);
        assert!(g.starting_fen().is_some());
        assert!(GameState::from_fen(W, B, "invalid").is_err());
    }

    // -----------------------------------------------------------------
    // Making moves
    // -----------------------------------------------------------------

    #[test]
    fn apply_move_records_san() {
        let mut g = GameState::new(W, B);
        let out = play(&mut g, "e2", "e4");
        assert_eq!(out.recorded_move.notation, "e4");
        assert_eq!(out.status, GameStatus::Playing);
        assert!(!out.in_check);
        assert_eq!(g.turn(), Color::Black);
        assert_eq!(g.move_history().len(), 1);
        assert_eq!(g.position_keys().len(), 2);
        assert_eq!(g.position().en_passant, Some(sq("e3")));
    }

    #[test]
    fn rejections_do_not_mutate() {
        let mut g = GameState::new(W, B);
        let before = g.to_fen();

        let cases = [
            (
                "carol",
                MoveRequest::new(sq("e2"), sq("e4")),
                Rejection::NotAPlayer("carol".into()),
            ),
            (
                B,
                MoveRequest::new(sq("e7"), sq("e5")),
                Rejection::WrongTurn {
                    expected: Color::White,
                },
            ),
            (
                W,
                MoveRequest::new(sq("e4"), sq("e5")),
                Rejection::EmptySquare(sq("e4")),
            ),
            (
                W,
                MoveRequest::new(sq("e7"), sq("e5")),
                Rejection::NotYourPiece(sq("e7")),
            ),
            (
                W,
                MoveRequest::new(sq("e2"), sq("e5")),
                Rejection::IllegalMove {
                    from: sq("e2"),
                    to: sq("e5"),
                },
            ),
        ];
        for (who, req, expected) in cases {
            assert_eq!(g.apply_move(who, req), Err(expected));
        }
        assert_eq!(g.to_fen(), before);
        assert!(g.move_history().is_empty());
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut g = fen_game("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let out = play(&mut g, "e7", "e8");
        assert_eq!(out.recorded_move.promotion, Some(PieceType::Queen));
        assert_eq!(out.recorded_move.special, Some(SpecialMove::Promotion));
        assert_eq!(out.recorded_move.notation, "e8=Q+");
        assert_eq!(
            g.position().piece_at(sq("e8")),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
    }

    #[test]
    fn underpromotion_and_invalid_promotion() {
        let mut g = fen_game("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let bad = MoveRequest::new(sq("e7"), sq("e8")).promoting_to(PieceType::King);
        assert_eq!(
            g.apply_move(W, bad),
            Err(Rejection::InvalidPromotion(PieceType::King))
        );
        let knight = MoveRequest::new(sq("e7"), sq("e8")).promoting_to(PieceType::Knight);
        let out = g.apply_move(W, knight).unwrap();
        assert_eq!(out.recorded_move.notation, "e8=N");
    }

    #[test]
    fn apply_san_plays_parsed_move() {
        let mut g = GameState::new(W, B);
        g.apply_san(W, "Nf3").unwrap();
        assert_eq!(g.last_move().unwrap().notation, "Nf3");
        assert_eq!(
            g.apply_san(B, "Qh5"),
            Err(Rejection::UnparsableMove("Qh5".into()))
        );
    }

    #[test]
    fn apply_san_rejects_malformed_hints() {
        let mut g = GameState::new(W, B);
        for san in ["N0f3", "N9f3", "e0"] {
            assert_eq!(
                g.apply_san(W, san),
                Err(Rejection::UnparsableMove(san.into()))
            );
        }
        assert!(g.move_history().is_empty());
        assert_eq!(g.turn(), Color::White);
    }

    #[test]
    fn promotion_kind_ignored_on_ordinary_move() {
        let mut g = GameState::new(W, B);
        let req = MoveRequest::new(sq("e2"), sq("e4")).promoting_to(PieceType::King);
        let out = g.apply_move(W, req).unwrap();
        assert_eq!(out.recorded_move.notation, "e4");
        assert_eq!(out.recorded_move.promotion, None);
        assert_eq!(
            g.position().piece_at(sq("e4")),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn castling_is_recorded() {
        let mut g = fen_game("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let out = play(&mut g, "e1", "g1");
        assert_eq!(out.recorded_move.notation, "O-O");
        assert_eq!(out.recorded_move.special, Some(SpecialMove::CastleKingside));
        assert_eq!(
            g.position().piece_at(sq("f1")),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    #[test]
    fn fools_mate() {
        let mut g = GameState::new(W, B);
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        let out = play(&mut g, "d8", "h4");
        assert_eq!(out.status, GameStatus::Checkmate);
        assert_eq!(out.winner, Some(Color::Black));
        assert_eq!(out.recorded_move.notation, "Qh4#");
        assert!(g.is_game_over());
        assert_eq!(
            g.apply_move(W, MoveRequest::new(sq("e2"), sq("e4"))),
            Err(Rejection::GameOver(GameStatus::Checkmate))
        );
        assert!(g.legal_moves_at(sq("e2")).is_empty());
    }

    #[test]
    fn scholars_mate() {
        let mut g = GameState::new(W, B);
        for (from, to) in [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ] {
            play(&mut g, from, to);
        }
        assert_eq!(g.status(), GameStatus::Checkmate);
        assert_eq!(g.winner(), Some(Color::White));
        assert_eq!(g.last_move().unwrap().notation, "Qxf7#");
    }

    #[test]
    fn check_status() {
        let mut g = GameState::new(W, B);
        play(&mut g, "e2", "e4");
        play(&mut g, "f7", "f6");
        let out = play(&mut g, "d1", "h5");
        assert_eq!(out.status, GameStatus::Check);
        assert!(out.in_check);
        assert_eq!(out.recorded_move.notation, "Qh5+");
    }

    #[test]
    fn stalemate_detection() {
        let g = fen_game("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
        assert_eq!(g.status(), GameStatus::Stalemate);
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn fifty_move_rule_detection() {
        let g = fen_game("4k3/8/8/8/8/8/8/R3K3 w - - 100 80");
        assert_eq!(g.status(), GameStatus::Draw);
        assert_eq!(g.draw_reason(), Some(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn insufficient_material() {
        for fen in [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KB2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KN2 w - - 0 1",
            "4kn2/8/8/8/8/8/8/4K3 w - - 0 1",
        ] {
            let g = fen_game(fen);
            assert_eq!(
                g.draw_reason(),
                Some(DrawReason::InsufficientMaterial),
                "{fen}"
            );
        }
    }

    #[test]
    fn sufficient_material() {
        for fen in [
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3NKN2 w - - 0 1",
        ] {
            assert_eq!(fen_game(fen).status(), GameStatus::Playing, "{fen}");
        }
    }

    #[test]
    fn threefold_repetition() {
        let mut g = GameState::new(W, B);
        for _ in 0..2 {
            play(&mut g, "g1", "f3");
            play(&mut g, "g8", "f6");
            play(&mut g, "f3", "g1");
            play(&mut g, "f6", "g8");
        }
        assert_eq!(g.status(), GameStatus::Draw);
        assert_eq!(g.draw_reason(), Some(DrawReason::ThreefoldRepetition));
    }

    // -----------------------------------------------------------------
    // Resignation & draws
    // -----------------------------------------------------------------

    #[test]
    fn resignation() {
        let mut g = GameState::new(W, B);
        assert_eq!(g.resign("carol"), Err(Rejection::NotAPlayer("carol".into())));
        g.resign(B).unwrap();
        assert_eq!(g.status(), GameStatus::Resigned);
        assert_eq!(g.winner(), Some(Color::White));
        assert_eq!(g.resign(W), Err(Rejection::GameOver(GameStatus::Resigned)));
    }

    #[test]
    fn draw_offer_flow() {
        let mut g = GameState::new(W, B);
        assert_eq!(g.accept_draw(B), Err(Rejection::NoDrawOffer));
        g.offer_draw(W).unwrap();
        assert_eq!(g.offer_draw(B), Err(Rejection::DrawAlreadyOffered));
        assert_eq!(g.accept_draw(W), Err(Rejection::OwnDrawOffer));
        g.decline_draw(B).unwrap();
        assert_eq!(g.draw_offer(), None);

        g.offer_draw(B).unwrap();
        g.accept_draw(W).unwrap();
        assert_eq!(g.status(), GameStatus::Draw);
        assert_eq!(g.draw_reason(), Some(DrawReason::Agreement));
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn moving_clears_draw_offer() {
        let mut g = GameState::new(W, B);
        g.offer_draw(B).unwrap();
        play(&mut g, "e2", "e4");
        assert_eq!(g.draw_offer(), None);
        assert_eq!(g.accept_draw(W), Err(Rejection::NoDrawOffer));
    }

    #[test]
    fn board_array_starting_position() {
        let board = GameState::new(W, B).board_array();
        assert_eq!(board[0][0], "bR");
        assert_eq!(board[7][4], "wK");
        assert_eq!(board[3][0], "");
    }
}
