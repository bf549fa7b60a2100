//! Knight movement geometry
//!
//! Knights move in an L (2+1) and jump over intervening pieces, so the test
//! is pure geometry.

use crate::board::Square;

pub(crate) fn knight_move_valid(from: Square, to: Square) -> bool {
    let dfile = (to.file() as i8 - from.file() as i8).abs();
    let drank = (to.rank() as i8 - from.rank() as i8).abs();
    (dfile == 2 && drank == 1) || (dfile == 1 && drank == 2)
}
