//! Board representation: squares and piece placement
//!
//! The board is a 64-slot array of `Option<Piece>`, indexed rank-major
//! (index = rank * 8 + file, so a1 = 0, h1 = 7, a8 = 56, h8 = 63). The type
//! is `Copy`: simulation paths work on throwaway copies via
//! [`Board::with_move`] instead of mutating and restoring a shared board.

use crate::error::{EngineError, EngineResult};
use crate::types::{Color, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 64 board coordinates. File and rank are 0-based
/// (file 0 = a, rank 0 = rank 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Construct from 0-based file and rank. Returns `None` off the board.
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file > 7 || rank > 7 {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Construct from a rank-major index in 0..64.
    pub fn from_index(index: usize) -> Option<Square> {
        if index >= 64 {
            return None;
        }
        Some(Square {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        })
    }

    /// Parse algebraic notation ("e4").
    pub fn parse(input: &str) -> EngineResult<Square> {
        let bytes = input.as_bytes();
        if bytes.len() != 2 {
            return Err(EngineError::InvalidSquare {
                input: input.to_string(),
            });
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| EngineError::InvalidSquare {
            input: input.to_string(),
        })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Rank-major index in 0..64.
    pub fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// Offset by file/rank deltas; `None` off the board.
    pub fn offset(self, dfile: i8, drank: i8) -> Option<Square> {
        let file = self.file as i8 + dfile;
        let rank = self.rank as i8 + drank;
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return None;
        }
        Some(Square {
            file: file as u8,
            rank: rank as u8,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

impl TryFrom<String> for Square {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::parse(&value)
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}

/// Piece placement for all 64 squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Board with no pieces.
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    /// Standard starting position.
    pub fn starting_position() -> Board {
        use PieceKind::*;
        let mut board = Board::empty();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (file, &kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.set(
                Square::new(file, 0).unwrap(),
                Some(Piece::new(Color::White, kind)),
            );
            board.set(
                Square::new(file, 7).unwrap(),
                Some(Piece::new(Color::Black, kind)),
            );
            board.set(
                Square::new(file, 1).unwrap(),
                Some(Piece::new(Color::White, Pawn)),
            );
            board.set(
                Square::new(file, 6).unwrap(),
                Some(Piece::new(Color::Black, Pawn)),
            );
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Iterate over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|piece| (Square::from_index(i).unwrap(), piece)))
    }

    /// Locate the king of a color.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Copy of this board with the piece on `from` relocated to `to`.
    /// Any piece on `to` is removed. Used for check simulation.
    pub fn with_move(&self, from: Square, to: Square) -> Board {
        let mut next = *self;
        let piece = next.piece_at(from);
        next.set(from, None);
        next.set(to, piece);
        next
    }

    /// FEN piece-placement field (first of the six FEN fields).
    pub fn placement_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(file, rank).unwrap()) {
                    Some(piece) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen
    }
}
