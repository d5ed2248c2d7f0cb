use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, bail};
use unnamed_entity::{EntityId, EntityVec, entity_id};

use crate::die::Die;
use crate::grid::{TileInfo, get_tile_info};

entity_id! {
    pub id DieId u8, reserve 1;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipKind {
    Ccgm1a1,
    Ccgm1a2,
    Ccgm1a4,
}

impl ChipKind {
    pub const ALL: [ChipKind; 3] = [ChipKind::Ccgm1a1, ChipKind::Ccgm1a2, ChipKind::Ccgm1a4];

    /// Name and position of every die, in die index order.
    pub fn dies(self) -> &'static [(&'static str, i32, i32)] {
        match self {
            ChipKind::Ccgm1a1 => &[("1A", 0, 0)],
            ChipKind::Ccgm1a2 => &[("1A", 0, 0), ("1B", 0, 1)],
            ChipKind::Ccgm1a4 => &[("1A", 0, 0), ("1B", 0, 1), ("2A", 1, 0), ("2B", 1, 1)],
        }
    }
}

impl std::fmt::Display for ChipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChipKind::Ccgm1a1 => write!(f, "CCGM1A1"),
            ChipKind::Ccgm1a2 => write!(f, "CCGM1A2"),
            ChipKind::Ccgm1a4 => write!(f, "CCGM1A4"),
        }
    }
}

impl std::str::FromStr for ChipKind {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, SimpleError> {
        match ChipKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
        {
            Some(kind) => Ok(kind),
            None => bail!("unknown chip {s}", s = s),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub kind: ChipKind,
    pub dies: EntityVec<DieId, Die>,
}

impl Chip {
    /// Builds the in-die graph of every die.  Dies share nothing, so they
    /// are built in parallel.
    pub fn new(kind: ChipKind) -> Self {
        let dies: Vec<Die> = kind
            .dies()
            .par_iter()
            .map(|&(name, die_x, die_y)| {
                let mut die = Die::new(name, die_x, die_y);
                die.create_in_die_connections();
                die
            })
            .collect();
        let dies: EntityVec<DieId, Die> = dies.into_iter().collect();
        info!(
            "{kind}: {n} dies, {c} connections",
            n = dies.len(),
            c = dies.values().map(Die::num_connections).sum::<usize>()
        );
        Chip { kind, dies }
    }

    pub fn die_by_name(&self, name: &str) -> Option<DieId> {
        self.dies
            .iter()
            .find(|(_, die)| die.name == name)
            .map(|(id, _)| id)
    }

    pub fn tile_info(&self, die: DieId, x: i32, y: i32) -> TileInfo {
        get_tile_info(die.to_idx(), x, y)
    }
}
