use clap::{Arg, ArgAction, Command, value_parser};
use jzon::JsonValue;
use prjcombine_gatemate::chip::{Chip, ChipKind};
use prjcombine_gatemate::db::{Database, TileCatalog};
use prjcombine_gatemate::grid::{TileType, get_tile_type_list};
use simple_error::bail;
use std::{error::Error, path::PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    let m = Command::new("gmprint")
        .arg(Arg::new("chip").required(true))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tile-types")
                .short('l')
                .long("tile-types")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("tile").short('t').long("tile"))
        .arg(Arg::new("die").short('d').long("die").default_value("1A"))
        .arg(
            Arg::new("wire")
                .short('w')
                .long("wire")
                .num_args(3)
                .value_names(["X", "Y", "WIRE"]),
        )
        .arg(
            Arg::new("reverse")
                .short('r')
                .long("reverse")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();
    let kind: ChipKind = m.get_one::<String>("chip").unwrap().parse()?;
    let flag_tile_types = m.get_flag("tile-types");
    let flag_reverse = m.get_flag("reverse");

    let level = if m.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    logger.init();

    if flag_tile_types {
        for tt in get_tile_type_list() {
            println!("{tt}");
        }
    }
    if let Some(tile) = m.get_one::<String>("tile") {
        let tt: TileType = tile.parse()?;
        if !get_tile_type_list().contains(&tt) {
            bail!("tile type {tt} does not occur on the die", tt = tt);
        }
        TileCatalog::new(&tt).print(&tt, &mut std::io::stdout())?;
    }
    if let Some(mut args) = m.get_many::<String>("wire") {
        let (Some(x), Some(y), Some(wire)) = (args.next(), args.next(), args.next()) else {
            bail!("--wire takes X Y WIRE");
        };
        let x: i32 = x.parse()?;
        let y: i32 = y.parse()?;
        let chip = Chip::new(kind);
        let die_name = m.get_one::<String>("die").unwrap();
        let Some(die) = chip.die_by_name(die_name) else {
            bail!(
                "no die {die_name} in {kind}",
                die_name = die_name,
                kind = kind
            );
        };
        let die = &chip.dies[die];
        let conns = if flag_reverse {
            die.get_connections_to(x, y, wire)
        } else {
            die.get_connections_for(x, y, wire)
        };
        if let Some((first, rest)) = conns.split_first() {
            println!("{c}", c = die.display_conn(first));
            for conn in rest {
                println!("\t{c}", c = die.display_conn(conn));
            }
        } else {
            println!("({x},{y}) {wire}: no connections");
        }
    }
    let arg_json = m.get_one::<PathBuf>("json");
    let arg_output = m.get_one::<PathBuf>("output");
    if arg_json.is_some() || arg_output.is_some() {
        let db = Database::new(kind);
        if let Some(path) = arg_json {
            std::fs::write(path, JsonValue::from(&db).to_string())?;
        }
        if let Some(path) = arg_output {
            db.to_file(path)?;
        }
        if !flag_tile_types {
            db.print(&mut std::io::stdout())?;
        }
    }
    Ok(())
}
