use std::{collections::BTreeMap, error::Error, fs::File, path::Path};

use jzon::JsonValue;
use serde::{Deserialize, Serialize};
use unnamed_entity::EntityId;

use crate::bels::{
    Pin, Primitive, get_pin_connection_name, get_primitive_pins, get_primitives_for_type,
    primitive_kinds,
};
use crate::chip::{Chip, ChipKind};
use crate::die::{Connection, Die};
use crate::grid::{TileType, get_tile_type_list};
use crate::muxes::{Mux, get_mux_connections_for_type};
use crate::wires::{Endpoint, Group, get_endpoints_for_type, get_groups_for_type};

/// Everything known about one tile type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    pub primitives: Vec<Primitive>,
    pub endpoints: Vec<Endpoint>,
    pub groups: Vec<Group>,
    pub muxes: Vec<Mux>,
}

impl TileCatalog {
    pub fn new(tt: &TileType) -> Self {
        TileCatalog {
            primitives: get_primitives_for_type(tt),
            endpoints: get_endpoints_for_type(tt),
            groups: get_groups_for_type(tt),
            muxes: get_mux_connections_for_type(tt),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub pins: BTreeMap<String, Vec<Pin>>,
    pub tiles: BTreeMap<TileType, TileCatalog>,
    pub chip: Chip,
}

impl Database {
    pub fn new(kind: ChipKind) -> Self {
        let pins = primitive_kinds()
            .map(|kind| (kind.to_string(), get_primitive_pins(kind).to_vec()))
            .collect();
        let tiles = get_tile_type_list()
            .into_iter()
            .map(|tt| {
                let cat = TileCatalog::new(&tt);
                (tt, cat)
            })
            .collect();
        Database {
            pins,
            tiles,
            chip: Chip::new(kind),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let f = File::open(path)?;
        let mut cf = zstd::stream::Decoder::new(f)?;
        let config = bincode::config::standard();
        Ok(bincode::serde::decode_from_std_read(&mut cf, config)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let f = File::create(path)?;
        let mut cf = zstd::stream::Encoder::new(f, 9)?;
        let config = bincode::config::standard();
        bincode::serde::encode_into_std_write(self, &mut cf, config)?;
        cf.finish()?;
        Ok(())
    }
}

impl From<&Pin> for JsonValue {
    fn from(pin: &Pin) -> Self {
        jzon::object! {
            name: &*pin.name,
            dir: pin.dir.to_string(),
            wire_type: &*pin.wire_type,
            alias: pin.alias,
        }
    }
}

fn primitive_json(prim: &Primitive) -> JsonValue {
    jzon::object! {
        name: &*prim.name,
        kind: &*prim.kind,
        z: prim.z,
        wires: Vec::from_iter(get_primitive_pins(&prim.kind).iter().map(|pin| jzon::object! {
            pin: &*pin.name,
            wire: get_pin_connection_name(prim, pin),
        })),
    }
}

impl From<&Mux> for JsonValue {
    fn from(mux: &Mux) -> Self {
        jzon::object! {
            src: mux.src.as_str(),
            dst: mux.dst.as_str(),
            name: mux.name.as_str(),
            bits: mux.bits,
            value: mux.value,
            invert: mux.invert,
            visible: mux.visible,
            config: mux.config,
        }
    }
}

impl From<&TileCatalog> for JsonValue {
    fn from(cat: &TileCatalog) -> Self {
        jzon::object! {
            primitives: Vec::from_iter(cat.primitives.iter().map(primitive_json)),
            endpoints: jzon::object::Object::from_iter(
                cat.endpoints.iter().map(|w| (w.name.as_str(), w.wire_type.as_str()))
            ),
            groups: jzon::object::Object::from_iter(
                cat.groups.iter().map(|g| (g.name.as_str(), g.kind.as_str()))
            ),
            muxes: Vec::from_iter(cat.muxes.iter()),
        }
    }
}

fn conn_json(conn: &Connection) -> JsonValue {
    jzon::array![conn.x, conn.y, conn.wire.to_idx()]
}

impl From<&Die> for JsonValue {
    fn from(die: &Die) -> Self {
        jzon::object! {
            name: die.name.as_str(),
            die_x: die.die_x,
            die_y: die.die_y,
            pads: jzon::object::Object::from_iter(die.gpio_pads().map(|(name, loc)| {
                (name, jzon::array![loc.x, loc.y])
            })),
            wires: Vec::from_iter(die.wires().map(|(_, name)| name)),
            conns: Vec::from_iter(die.connections().map(|(src, dsts)| {
                jzon::array![conn_json(src), Vec::from_iter(dsts.iter().map(conn_json))]
            })),
        }
    }
}

impl From<&Chip> for JsonValue {
    fn from(chip: &Chip) -> Self {
        jzon::object! {
            kind: chip.kind.to_string(),
            dies: Vec::from_iter(chip.dies.values()),
        }
    }
}

impl From<&Database> for JsonValue {
    fn from(db: &Database) -> Self {
        jzon::object! {
            pins: jzon::object::Object::from_iter(db.pins.iter().map(|(kind, pins)| {
                (kind.as_str(), Vec::from_iter(pins.iter()))
            })),
            tiles: jzon::object::Object::from_iter(
                db.tiles.iter().map(|(tt, cat)| (tt.to_string(), cat)),
            ),
            chip: &db.chip,
        }
    }
}
