//! Coordinate classification of a single GateMate die.
//!
//! Logical coordinates run over `[-2, max_col()] × [-2, max_row()]`.  The CPE
//! array occupies `[1, 160] × [1, 128]`, switchboxes sit on a checkerboard
//! sublattice of `[-1, 162] × [-1, 130]`, and the outermost rows and columns
//! hold the edge select tiles and IO.  All predicates are pure and total over
//! the whole `i32` plane; coordinates outside the die simply match nothing.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, bail};

use crate::dir::Dir;

pub const PLL_X_POS: i32 = 33;
pub const PLL_Y_POS: i32 = 131;
pub const SERDES_X_POS: i32 = 1;
pub const SERDES_Y_POS: i32 = 131;
pub const USR_RSTN_X_POS: i32 = 1;
pub const USR_RSTN_Y_POS: i32 = 66;

pub const fn max_row() -> i32 {
    131
}

pub const fn max_col() -> i32 {
    163
}

pub const fn num_rows() -> i32 {
    max_row() + 3
}

pub const fn num_cols() -> i32 {
    max_col() + 3
}

/// Iterates every coordinate of the die, row by row from the bottom.
pub fn all_coords() -> impl Iterator<Item = (i32, i32)> {
    (-2..=max_row()).flat_map(|y| (-2..=max_col()).map(move |x| (x, y)))
}

fn in_sb_area(x: i32, y: i32) -> bool {
    (-1..=162).contains(&x) && (-1..=130).contains(&y)
}

pub fn is_sb(x: i32, y: i32) -> bool {
    in_sb_area(x, y) && (x + 1).rem_euclid(2) == (y + 1).rem_euclid(2)
}

pub fn is_sb_big(x: i32, y: i32) -> bool {
    if !is_sb(x, y) {
        return false;
    }
    let same = (x + 1).rem_euclid(4) == (y + 1).rem_euclid(4);
    if (x + 1).rem_euclid(2) == 1 {
        !same
    } else {
        same
    }
}

pub fn is_sb_sml(x: i32, y: i32) -> bool {
    is_sb(x, y) && !is_sb_big(x, y)
}

pub fn get_sb_type(x: i32, y: i32) -> &'static str {
    if is_sb_big(x, y) { "SB_BIG" } else { "SB_SML" }
}

pub fn is_cpe(x: i32, y: i32) -> bool {
    (1..=160).contains(&x) && (1..=128).contains(&y)
}

pub fn is_outmux(x: i32, y: i32) -> bool {
    is_cpe(x, y) && (x + 1).rem_euclid(2) == (y + 1).rem_euclid(2)
}

pub fn is_edge_left(x: i32, y: i32) -> bool {
    x == -2 && (1..=128).contains(&y)
}

pub fn is_edge_right(x: i32, y: i32) -> bool {
    x == max_col() && (1..=128).contains(&y)
}

pub fn is_edge_bottom(x: i32, y: i32) -> bool {
    y == -2 && (1..=160).contains(&x)
}

// The top edge is narrower than the others; the PLL and SERDES live left of it.
pub fn is_edge_top(x: i32, y: i32) -> bool {
    y == max_row() && (28..=160).contains(&x)
}

/// The edge a border coordinate belongs to, if any.
pub fn edge_of(x: i32, y: i32) -> Option<Dir> {
    if is_edge_left(x, y) {
        Some(Dir::W)
    } else if is_edge_right(x, y) {
        Some(Dir::E)
    } else if is_edge_bottom(x, y) {
        Some(Dir::S)
    } else if is_edge_top(x, y) {
        Some(Dir::N)
    } else {
        None
    }
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum IoBank {
    S3,
    S1,
    S2,
    W1,
    W2,
    E1,
    E2,
    N1,
    N2,
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum IoPort {
    A,
    B,
}

/// One IO band: the bank it belongs to, the border it sits on and the first
/// and last coordinate along that border.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IoBand {
    pub bank: IoBank,
    pub edge: Dir,
    pub start: i32,
    pub end: i32,
}

pub const IO_BANDS: [IoBand; 9] = [
    IoBand { bank: IoBank::S3, edge: Dir::S, start: 5, end: 40 },
    IoBand { bank: IoBank::S1, edge: Dir::S, start: 57, end: 92 },
    IoBand { bank: IoBank::S2, edge: Dir::S, start: 101, end: 136 },
    IoBand { bank: IoBank::W1, edge: Dir::W, start: 25, end: 60 },
    IoBand { bank: IoBank::W2, edge: Dir::W, start: 69, end: 104 },
    IoBand { bank: IoBank::E1, edge: Dir::E, start: 25, end: 60 },
    IoBand { bank: IoBank::E2, edge: Dir::E, start: 69, end: 104 },
    IoBand { bank: IoBank::N1, edge: Dir::N, start: 57, end: 92 },
    IoBand { bank: IoBank::N2, edge: Dir::N, start: 101, end: 136 },
];

impl IoBand {
    /// Position along the border, if (x, y) lies inside this band.
    fn offset(&self, x: i32, y: i32) -> Option<i32> {
        let (border, pos) = match self.edge {
            Dir::W => (x == -2, y),
            Dir::E => (x == max_col(), y),
            Dir::S => (y == -2, x),
            Dir::N => (y == max_row(), x),
        };
        (border && (self.start..=self.end).contains(&pos)).then_some(pos - self.start)
    }

    /// Coordinate of the cell at `offset` along this band.
    pub fn coord(&self, offset: i32) -> (i32, i32) {
        let pos = self.start + offset;
        match self.edge {
            Dir::W => (-2, pos),
            Dir::E => (max_col(), pos),
            Dir::S => (pos, -2),
            Dir::N => (pos, max_row()),
        }
    }
}

impl IoBank {
    pub fn band(self) -> &'static IoBand {
        IO_BANDS
            .iter()
            .find(|band| band.bank == self)
            .expect("every bank has a band")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct IoName {
    pub bank: IoBank,
    pub port: IoPort,
    pub num: u32,
}

impl IoName {
    pub fn gpio_name(&self) -> String {
        format!("GPIO_{self}")
    }
}

pub fn is_edge_io(x: i32, y: i32) -> bool {
    IO_BANDS.iter().any(|band| band.offset(x, y).is_some())
}

/// Decodes a border coordinate into its IO pad name.  Every pad spans four
/// cells of the border: port A at offset 0, port B at offset 2.
pub fn get_io_name(x: i32, y: i32) -> Option<IoName> {
    IO_BANDS.iter().find_map(|band| {
        let offset = band.offset(x, y)?;
        Some(IoName {
            bank: band.bank,
            port: if offset % 4 == 0 {
                IoPort::A
            } else {
                IoPort::B
            },
            num: (offset / 4) as u32,
        })
    })
}

pub fn is_gpio(x: i32, y: i32) -> bool {
    if !is_edge_io(x, y) {
        return false;
    }
    if y == -2 || y == max_row() {
        x.rem_euclid(2) == 1
    } else {
        y.rem_euclid(2) == 1
    }
}

pub fn is_pll(x: i32, y: i32) -> bool {
    x == PLL_X_POS && y == PLL_Y_POS
}

pub fn is_serdes(x: i32, y: i32) -> bool {
    x == SERDES_X_POS && y == SERDES_Y_POS
}

pub fn is_usr_rstn(x: i32, y: i32) -> bool {
    x == USR_RSTN_X_POS && y == USR_RSTN_Y_POS
}

/// Lower-left CPE of the 2×2 CPE block containing (x, y).
pub fn base_loc(x: i32, y: i32) -> (i32, i32) {
    (((x - 1) & !1) + 1, ((y - 1) & !1) + 1)
}

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum TileTag {
    Cpe,
    Im,
    Om,
    SbBig,
    SbSml,
    Gpio,
    Ioes,
    Tes,
    Bes,
    Les,
    Res,
    Pll,
    Serdes,
    UsrRstn,
}

impl TileTag {
    pub const ALL: [TileTag; 14] = [
        TileTag::Cpe,
        TileTag::Im,
        TileTag::Om,
        TileTag::SbBig,
        TileTag::SbSml,
        TileTag::Gpio,
        TileTag::Ioes,
        TileTag::Tes,
        TileTag::Bes,
        TileTag::Les,
        TileTag::Res,
        TileTag::Pll,
        TileTag::Serdes,
        TileTag::UsrRstn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TileTag::Cpe => "CPE",
            TileTag::Im => "IM",
            TileTag::Om => "OM",
            TileTag::SbBig => "SB_BIG",
            TileTag::SbSml => "SB_SML",
            TileTag::Gpio => "GPIO",
            TileTag::Ioes => "IOES",
            TileTag::Tes => "TES",
            TileTag::Bes => "BES",
            TileTag::Les => "LES",
            TileTag::Res => "RES",
            TileTag::Pll => "PLL",
            TileTag::Serdes => "SERDES",
            TileTag::UsrRstn => "USR_RSTN",
        }
    }
}

impl std::fmt::Display for TileTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TileTag {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, SimpleError> {
        match TileTag::ALL.into_iter().find(|tag| tag.name() == s) {
            Some(tag) => Ok(tag),
            None => bail!("unknown tile tag {s}", s = s),
        }
    }
}

/// The set of tags present at one coordinate.  Iteration order is the
/// canonical tag order, so the joined name is stable.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TileType(BTreeSet<TileTag>);

impl TileType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: TileTag) {
        self.0.insert(tag);
    }

    pub fn contains(&self, tag: TileTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = TileTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TileTag> for TileType {
    fn from_iter<T: IntoIterator<Item = TileTag>>(iter: T) -> Self {
        TileType(iter.into_iter().collect())
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        write!(f, "{}", self.tags().join("_"))
    }
}

impl std::str::FromStr for TileType {
    type Err = SimpleError;

    // Tag names may themselves contain underscores, so try the two-part
    // names first.
    fn from_str(s: &str) -> Result<Self, SimpleError> {
        let mut res = TileType::new();
        if s == "NONE" {
            return Ok(res);
        }
        let parts: Vec<&str> = s.split('_').collect();
        let mut i = 0;
        while i < parts.len() {
            if i + 1 < parts.len() {
                if let Ok(tag) = format!("{}_{}", parts[i], parts[i + 1]).parse::<TileTag>() {
                    res.insert(tag);
                    i += 2;
                    continue;
                }
            }
            res.insert(parts[i].parse()?);
            i += 1;
        }
        Ok(res)
    }
}

/// All tags present at (x, y), in canonical order.
pub fn get_tile_types(x: i32, y: i32) -> Vec<TileTag> {
    let mut res = vec![];
    if is_cpe(x, y) {
        res.push(TileTag::Cpe);
        res.push(TileTag::Im);
        if is_outmux(x, y) {
            res.push(TileTag::Om);
        }
    }
    if is_sb_big(x, y) {
        res.push(TileTag::SbBig);
    }
    if is_sb_sml(x, y) {
        res.push(TileTag::SbSml);
    }
    if is_gpio(x, y) {
        res.push(TileTag::Gpio);
    }
    if is_edge_io(x, y) {
        res.push(TileTag::Ioes);
    }
    if is_edge_top(x, y) {
        res.push(TileTag::Tes);
    }
    if is_edge_bottom(x, y) {
        res.push(TileTag::Bes);
    }
    if is_edge_left(x, y) {
        res.push(TileTag::Les);
    }
    if is_edge_right(x, y) {
        res.push(TileTag::Res);
    }
    if is_pll(x, y) {
        res.push(TileTag::Pll);
    }
    if is_serdes(x, y) {
        res.push(TileTag::Serdes);
    }
    if is_usr_rstn(x, y) {
        res.push(TileTag::UsrRstn);
    }
    res
}

pub fn get_tile_type_set(x: i32, y: i32) -> TileType {
    get_tile_types(x, y).into_iter().collect()
}

pub fn get_tile_type(x: i32, y: i32) -> String {
    get_tile_type_set(x, y).to_string()
}

/// Every distinct tile type occurring on the die.
pub fn get_tile_type_list() -> BTreeSet<TileType> {
    all_coords().map(|(x, y)| get_tile_type_set(x, y)).collect()
}

/// Bitstream tile containing (x, y).  Edge tiles are twice the size of the
/// interior ones, so they are pulled inward by one before halving.
pub fn get_bitstream_tile(x: i32, y: i32) -> (i32, i32) {
    let mut x = x;
    let mut y = y;
    if x == -2 {
        x += 1;
    }
    if x == max_col() {
        x -= 1;
    }
    if y == -2 {
        y += 1;
    }
    if y == max_row() {
        y -= 1;
    }
    ((x + 1).div_euclid(2), (y + 1).div_euclid(2))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TileInfo {
    pub die: usize,
    pub bit_x: i32,
    pub bit_y: i32,
    pub prim_index: u32,
}

pub fn get_tile_info(die: usize, x: i32, y: i32) -> TileInfo {
    let (bit_x, bit_y) = get_bitstream_tile(x, y);
    let mut pos = 0;
    if is_cpe(x, y) {
        pos = (x + 1).rem_euclid(2) * 2 + (y + 1).rem_euclid(2) + 1;
    }
    if is_edge_top(x, y) || is_edge_bottom(x, y) {
        pos = (x - 1).rem_euclid(2) + 1;
    }
    if is_edge_left(x, y) || is_edge_right(x, y) {
        pos = (y - 1).rem_euclid(2) + 1;
    }
    TileInfo {
        die,
        bit_x,
        bit_y,
        prim_index: pos as u32,
    }
}

/// 1-based plane numbers of the routing fabric.
pub const PLANES: std::ops::RangeInclusive<u32> = 1..=12;
pub const NUM_PLANES: u32 = 12;

/// Direction index into [`ALT_PLANE`] used for inmux input D6.
pub const ALT_DIR_D6: usize = 0;
/// Direction index into [`ALT_PLANE`] used for inmux input D7.
pub const ALT_DIR_D7: usize = 1;

/// Inmux alternate-plane permutation, indexed by `[direction][plane - 1]`.
pub const ALT_PLANE: [[u32; 12]; 2] = [
    [5, 6, 7, 8, 1, 2, 3, 4, 11, 12, 9, 10],
    [9, 10, 11, 12, 9, 10, 11, 12, 12, 11, 10, 9],
];

pub fn alt_plane(dir: usize, plane: u32) -> u32 {
    ALT_PLANE[dir][(plane - 1) as usize]
}

pub fn prev_plane(plane: u32) -> u32 {
    (plane + NUM_PLANES - 2) % NUM_PLANES + 1
}

pub fn next_plane(plane: u32) -> u32 {
    plane % NUM_PLANES + 1
}

impl std::fmt::Display for IoBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::str::FromStr for IoBank {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, SimpleError> {
        match IO_BANDS.iter().find(|band| band.bank.to_string() == s) {
            Some(band) => Ok(band.bank),
            None => bail!("unknown IO bank {s}", s = s),
        }
    }
}

impl std::fmt::Display for IoPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for IoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{b}_{p}[{n}]",
            b = self.bank,
            p = self.port,
            n = self.num
        )
    }
}
