//! Compass directions of the die border and of switchbox outputs.

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, bail};

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Enum, Serialize, Deserialize,
)]
pub enum Dir {
    W,
    E,
    S,
    N,
}

impl Dir {
    pub const DIRS: [Dir; 4] = [Dir::W, Dir::E, Dir::S, Dir::N];

    /// Index of the switchbox output that drives towards this edge's
    /// neighbour, i.e. `Yn` with `n = 1 + self.sb_index()`.
    pub fn sb_index(self) -> usize {
        match self {
            Dir::W => 0,
            Dir::S => 1,
            Dir::E => 2,
            Dir::N => 3,
        }
    }
}

impl core::ops::Not for Dir {
    type Output = Dir;
    fn not(self) -> Dir {
        match self {
            Dir::W => Dir::E,
            Dir::E => Dir::W,
            Dir::S => Dir::N,
            Dir::N => Dir::S,
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Dir::W => "W",
                Dir::E => "E",
                Dir::S => "S",
                Dir::N => "N",
            }
        )
    }
}

impl std::str::FromStr for Dir {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, SimpleError> {
        Ok(match s {
            "W" => Dir::W,
            "E" => Dir::E,
            "S" => Dir::S,
            "N" => Dir::N,
            _ => bail!("invalid direction {s}", s = s),
        })
    }
}
