use unnamed_entity::EntityId;

use crate::bels::{get_pin_connection_name, get_primitive_pins};
use crate::db::{Database, TileCatalog};
use crate::grid::TileType;

impl TileCatalog {
    pub fn print(&self, tt: &TileType, o: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(o, "TILE {tt}")?;
        for prim in &self.primitives {
            writeln!(
                o,
                "\tPRIM {n} {k} Z={z}",
                n = prim.name,
                k = prim.kind,
                z = prim.z
            )?;
            for pin in get_primitive_pins(&prim.kind) {
                writeln!(
                    o,
                    "\t\tPIN {n:20} {d:6} {w}{a}",
                    n = pin.name,
                    d = pin.dir.to_string(),
                    w = get_pin_connection_name(prim, pin),
                    a = if pin.alias { " ALIAS" } else { "" }
                )?;
            }
        }
        for group in &self.groups {
            writeln!(o, "\tGROUP {n} {k}", n = group.name, k = group.kind)?;
        }
        for wire in &self.endpoints {
            writeln!(o, "\tWIRE {n:28} {t}", n = wire.name, t = wire.wire_type)?;
        }
        for mux in &self.muxes {
            write!(
                o,
                "\tMUX {d:28} <- {s:28} {n} {v}/{b}",
                d = mux.dst,
                s = mux.src,
                n = mux.name,
                v = mux.value,
                b = mux.bits
            )?;
            if mux.invert {
                write!(o, " INV")?;
            }
            if !mux.visible {
                write!(o, " HIDDEN")?;
            }
            if mux.config {
                write!(o, " CONFIG")?;
            }
            writeln!(o)?;
        }
        Ok(())
    }
}

impl Database {
    pub fn print(&self, o: &mut dyn std::io::Write) -> std::io::Result<()> {
        writeln!(o, "CHIP {k}", k = self.chip.kind)?;
        for (kind, pins) in &self.pins {
            writeln!(o, "PRIMITIVE {kind}")?;
            for pin in pins {
                writeln!(
                    o,
                    "\tPIN {n:20} {d:6} {w}{a}",
                    n = pin.name,
                    d = pin.dir.to_string(),
                    w = pin.wire_type,
                    a = if pin.alias { " ALIAS" } else { "" }
                )?;
            }
        }
        for (tt, cat) in &self.tiles {
            cat.print(tt, o)?;
        }
        for (id, die) in &self.chip.dies {
            writeln!(
                o,
                "DIE {i} {n} ({x},{y}): {d} drivers, {c} connections",
                i = id.to_idx(),
                n = die.name,
                x = die.die_x,
                y = die.die_y,
                d = die.num_drivers(),
                c = die.num_connections()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::TileCatalog;
    use crate::grid::get_tile_type_set;

    #[test]
    fn print_pll_tile() {
        let tt = get_tile_type_set(33, 131);
        let mut out = vec![];
        TileCatalog::new(&tt).print(&tt, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("TILE TES_PLL\n"));
        assert!(out.contains("\tPRIM PLL1 PLL Z=5\n"));
        assert!(out.contains("GLBOUT.CLK_FB1 ALIAS\n"));
        assert!(out.contains(" CONFIG\n"));
        assert!(out.contains("\tGROUP TES TES\n"));
    }
}
