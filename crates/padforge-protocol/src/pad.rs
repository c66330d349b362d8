use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the controller grid. Rows are numbered bottom-to-top,
/// columns left-to-right, both 0-indexed.
pub const GRID_SIZE: u8 = 8;

/// One physical pad on the 8x8 grid, addressed by (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pad {
    pub row: u8,
    pub col: u8,
}

impl Pad {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// The "row,col" string form used at external boundaries (map keys, logs).
    pub fn key(&self) -> String {
        format!("{},{}", self.row, self.col)
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (r, c) = s.split_once(',')?;
        Some(Pad {
            row: r.trim().parse().ok()?,
            col: c.trim().parse().ok()?,
        })
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_parse() {
        let p = Pad::new(4, 7);
        assert_eq!(Pad::parse(&p.key()), Some(p));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Pad::parse("nope"), None);
        assert_eq!(Pad::parse("1"), None);
    }
}
