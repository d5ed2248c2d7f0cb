//! Routing fabric database of the GateMate FPGA family.
//!
//! The [`grid`] module classifies die coordinates into tile types, [`bels`],
//! [`wires`] and [`muxes`] describe what each tile type contains, and [`die`]
//! builds the point-to-point connection graph of a whole die.

pub mod bels;
pub mod chip;
pub mod db;
pub mod die;
pub mod dir;
pub mod grid;
pub mod muxes;
mod print;
pub mod wires;
