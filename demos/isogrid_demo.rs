//! Render a random isometric map to PNG and resolve pointer positions.
//!
//! Run: cargo run --bin isogrid-demo -- --click 480,200 300,150 520,260

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use isogrid_core::DrawOrder;
use isogrid_demos::Demo;

/// A pointer position given as `x,y`.
#[derive(Clone, Copy, Debug)]
struct Pointer {
    x: f64,
    y: f64,
}

impl FromStr for Pointer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad coordinate {v:?}: {e}"))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    Column,
    Row,
    Diagonal,
}

impl From<Order> for DrawOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::Column => DrawOrder::ColumnMajor,
            Order::Row => DrawOrder::RowMajor,
            Order::Diagonal => DrawOrder::Diagonal,
        }
    }
}

/// Render a random isometric map and pick tiles under pointer positions.
#[derive(Parser, Debug)]
#[command(name = "isogrid-demo", version)]
struct Cli {
    #[arg(long, default_value_t = 12)]
    columns: i32,

    #[arg(long, default_value_t = 12)]
    rows: i32,

    /// Diamond height in pixels; the width is twice this.
    #[arg(long, default_value_t = 40.0)]
    tile_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Order::Column)]
    order: Order,

    /// Select the tile under this position.
    #[arg(long)]
    click: Option<Pointer>,

    /// Output image.
    #[arg(short, long, default_value = "isogrid.png")]
    out: PathBuf,

    /// Pointer moves, as x,y. The last one stays hovered.
    moves: Vec<Pointer>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut demo = Demo::new(cli.columns, cli.rows, cli.tile_size, cli.seed)?;

    for p in &cli.moves {
        match demo.hover(p.x, p.y) {
            Some(tile) => println!("move ({}, {}) -> tile {tile}", p.x, p.y),
            None => println!("move ({}, {}) -> no tile", p.x, p.y),
        }
    }
    if let Some(p) = cli.click {
        match demo.select(p.x, p.y) {
            Some(tile) => println!("click ({}, {}) -> selected {tile}", p.x, p.y),
            None => println!("click ({}, {}) -> nothing selected", p.x, p.y),
        }
    }

    let img = demo.render(cli.order.into())?;
    img.save(&cli.out)?;
    log::info!("wrote {}x{} image to {}", img.width(), img.height(), cli.out.display());
    Ok(())
}
