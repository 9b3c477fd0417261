use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row holding this side's king and rooks at the start.
    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row the pawns start on (double push allowed from here).
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Row on which a pawn promotes.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Index for array lookups: Pawn=0 .. King=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns.
    pub const fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20_000,
        }
    }

    /// Knight or bishop.
    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceType::Knight | PieceType::Bishop)
    }

    /// Uppercase SAN letter (`P` for pawns, which SAN itself omits).
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Parse a piece letter, ignoring case.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A coloured piece as it sits on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Piece { kind, color }
    }

    /// FEN character: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parse a FEN character; case selects the colour.
    pub fn from_char(c: char) -> Option<Self> {
        let kind = PieceType::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { kind, color })
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the board. Row 0 is rank 1, column 0 is file a.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Checked constructor for coordinates coming from outside the engine.
    pub fn new(row: u8, col: u8) -> Result<Self, ChessError> {
        if row < 8 && col < 8 {
            Ok(Square { row, col })
        } else {
            Err(ChessError::InvalidSquare(format!("({row}, {col})")))
        }
    }

    /// Unchecked constructor for engine-internal coordinates.
    #[inline]
    pub const fn at(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square { row, col }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::at(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Iterate over all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::at(row, col)))
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].wrapping_sub(b'a');
        let row = bytes[1].wrapping_sub(b'1');
        if col < 8 && row < 8 {
            Some(Square::at(row, col))
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    #[inline]
    pub fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    #[inline]
    pub fn rank_char(self) -> char {
        (b'1' + self.row) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl TryFrom<String> for Square {
    type Error = ChessError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&s).ok_or(ChessError::InvalidSquare(s))
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_algebraic()
    }
}

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Flags for special move types packed in a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(4);
    pub const CASTLE_KINGSIDE: MoveFlags = MoveFlags(8);
    pub const CASTLE_QUEENSIDE: MoveFlags = MoveFlags(16);

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & Self::CAPTURE.0 != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & Self::EN_PASSANT.0 != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & Self::DOUBLE_PUSH.0 != 0
    }

    #[inline]
    pub fn is_castle_kingside(self) -> bool {
        self.0 & Self::CASTLE_KINGSIDE.0 != 0
    }

    #[inline]
    pub fn is_castle_queenside(self) -> bool {
        self.0 & Self::CASTLE_QUEENSIDE.0 != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.is_castle_kingside() || self.is_castle_queenside()
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A candidate move: from-square, to-square, optional promotion, and flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: MoveFlags::NONE,
        }
    }

    pub fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags,
        }
    }

    pub fn with_promotion(
        from: Square,
        to: Square,
        promotion: PieceType,
        flags: MoveFlags,
    ) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
            flags,
        }
    }

    /// The request a player would send to play this move.
    pub fn to_request(self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// What a player asks for: a source, a destination and, for pawns reaching
/// the last rank, the piece to promote to (queen when omitted).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    /// Build a request from algebraic squares like `("e2", "e4")`.
    pub fn parse(from: &str, to: &str) -> Result<Self, ChessError> {
        let from = Square::from_algebraic(from)
            .ok_or_else(|| ChessError::InvalidSquare(from.to_string()))?;
        let to =
            Square::from_algebraic(to).ok_or_else(|| ChessError::InvalidSquare(to.to_string()))?;
        Ok(MoveRequest::new(from, to))
    }

    pub fn promoting_to(mut self, kind: PieceType) -> Self {
        self.promotion = Some(kind);
        self
    }
}

// ---------------------------------------------------------------------------
// CastlingFlags
// ---------------------------------------------------------------------------

/// Per-side record of whether the king or either rook has left home.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideFlags {
    pub king_moved: bool,
    pub kingside_rook_moved: bool,
    pub queenside_rook_moved: bool,
}

/// Special-state flags for both sides, indexed by [`Color::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingFlags(pub [SideFlags; 2]);

impl CastlingFlags {
    /// Nothing has moved yet.
    pub const FRESH: CastlingFlags = CastlingFlags([
        SideFlags {
            king_moved: false,
            kingside_rook_moved: false,
            queenside_rook_moved: false,
        },
        SideFlags {
            king_moved: false,
            kingside_rook_moved: false,
            queenside_rook_moved: false,
        },
    ]);

    /// No side may castle.
    pub const NONE: CastlingFlags = CastlingFlags([
        SideFlags {
            king_moved: true,
            kingside_rook_moved: true,
            queenside_rook_moved: true,
        },
        SideFlags {
            king_moved: true,
            kingside_rook_moved: true,
            queenside_rook_moved: true,
        },
    ]);

    #[inline]
    pub fn side(&self, color: Color) -> &SideFlags {
        &self.0[color.index()]
    }

    #[inline]
    pub fn side_mut(&mut self, color: Color) -> &mut SideFlags {
        &mut self.0[color.index()]
    }

    #[inline]
    pub fn can_castle_kingside(&self, color: Color) -> bool {
        let s = self.side(color);
        !s.king_moved && !s.kingside_rook_moved
    }

    #[inline]
    pub fn can_castle_queenside(&self, color: Color) -> bool {
        let s = self.side(color);
        !s.king_moved && !s.queenside_rook_moved
    }

    /// Number of castling rights `color` still holds (0..=2).
    pub fn retained(&self, color: Color) -> u32 {
        self.can_castle_kingside(color) as u32 + self.can_castle_queenside(color) as u32
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        let mut flags = CastlingFlags::NONE;
        if s == "-" {
            return Some(flags);
        }
        for c in s.chars() {
            let (color, kingside) = match c {
                'K' => (Color::White, true),
                'Q' => (Color::White, false),
                'k' => (Color::Black, true),
                'q' => (Color::Black, false),
                _ => return None,
            };
            let side = flags.side_mut(color);
            side.king_moved = false;
            if kingside {
                side.kingside_rook_moved = false;
            } else {
                side.queenside_rook_moved = false;
            }
        }
        Some(flags)
    }

    /// Convert to FEN castling string.
    pub fn to_fen(&self) -> String {
        let mut s = String::with_capacity(4);
        if self.can_castle_kingside(Color::White) {
            s.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            s.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            s.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            s.push('q');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

// ---------------------------------------------------------------------------
// GameStatus, DrawReason, Difficulty
// ---------------------------------------------------------------------------

/// Current status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
    Stalemate,
    Draw,
    Resigned,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
            GameStatus::Resigned => "resigned",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw | GameStatus::Resigned
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason for a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
    Agreement,
}

impl DrawReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
            DrawReason::InsufficientMaterial => "insufficient_material",
            DrawReason::Agreement => "agreement",
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI difficulty levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// All levels, weakest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Search depth in plies.
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }

    /// Chance of skipping search and playing a random legal move.
    pub fn random_move_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Malformed input handed to the engine by its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid SAN move: {0}")]
    InvalidSan(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),
}

/// A request that breaks the rules of the game. Returning one never changes
/// the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("game is already over: {0}")]
    GameOver(GameStatus),

    #[error("{0} is not a player in this game")]
    NotAPlayer(String),

    #[error("it is {expected}'s turn")]
    WrongTurn { expected: Color },

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("piece on {0} belongs to the opponent")]
    NotYourPiece(Square),

    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceType),

    #[error("no legal move matches '{0}'")]
    UnparsableMove(String),

    #[error("no draw offer is pending")]
    NoDrawOffer,

    #[error("a draw offer is already pending")]
    DrawAlreadyOffered,

    #[error("cannot answer your own draw offer")]
    OwnDrawOffer,
}

impl Rejection {
    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::GameOver(_) => "GAME_OVER",
            Rejection::NotAPlayer(_) => "NOT_A_PLAYER",
            Rejection::WrongTurn { .. } => "WRONG_TURN",
            Rejection::EmptySquare(_) => "EMPTY_SQUARE",
            Rejection::NotYourPiece(_) => "NOT_YOUR_PIECE",
            Rejection::IllegalMove { .. } => "ILLEGAL_MOVE",
            Rejection::InvalidPromotion(_) => "INVALID_PROMOTION",
            Rejection::UnparsableMove(_) => "UNPARSABLE_MOVE",
            Rejection::NoDrawOffer => "NO_DRAW_OFFER",
            Rejection::DrawAlreadyOffered => "DRAW_ALREADY_OFFERED",
            Rejection::OwnDrawOffer => "OWN_DRAW_OFFER",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
