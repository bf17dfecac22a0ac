/// Single coordinate axis, also used for board width and height.
///
/// Signed so that callers can pass off-board positions, which every in-game operation ignores.
pub type Coord = i32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Flat cell index, `y * width + x`.
pub type CellIndex = usize;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Logical timestamp in milliseconds, supplied by the host.
pub type Millis = u64;
