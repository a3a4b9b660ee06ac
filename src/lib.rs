use clap::{Parser, ValueEnum};
use miette::*;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

pub mod analyze;
pub mod deriv;
pub mod expr;
pub mod roots;
pub mod sample;
pub mod target;

pub use analyze::{analyze, Analysis, Mode, Point, Request};
pub use deriv::{differentiate, numeric_derivative};
pub use expr::{compile, Compiled};
pub use roots::find_roots;
pub use sample::{polyline, sample};
pub use target::find_near;

/// Row labels for the points table.
const LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// CLI function analysis tool.
/// Plot a function and its derivative, locate roots and target crossings.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct App {
    /// The function expression, e.g. "3*x^2 + 2*x + 1" or "f(x) = sin(2*x)".
    pub expr: String,

    /// Left edge of the x range.
    #[arg(short = 'a', long, default_value_t = -10.0, allow_negative_numbers = true)]
    pub xmin: f64,

    /// Right edge of the x range.
    #[arg(short = 'b', long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub xmax: f64,

    /// Number of grid steps used for curves and point search.
    #[arg(short = 'n', long, default_value_t = 800)]
    pub samples: usize,

    /// What to look for.
    #[arg(short, long, default_value_t, value_enum)]
    pub mode: Mode,

    /// Sought f(x) value (target mode only).
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub target: f64,

    /// The output format to write to stdout.
    #[arg(short, long, default_value_t, value_enum)]
    pub out: Output,

    /// Also write the sampled grid as CSV (columns x, f(x), f'(x)).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Do not output the summary lines along with the points.
    #[arg(long)]
    pub no_stats: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, Default)]
pub enum Output {
    /// Rich table view.
    #[default]
    Table,

    /// Plain, space separated rows.
    Plain,

    /// The full analysis as JSON.
    Json,
}

impl App {
    pub fn run(self) -> Result<()> {
        let App {
            expr,
            xmin,
            xmax,
            samples,
            mode,
            target,
            out,
            export,
            no_stats,
        } = self;

        let req = Request {
            expr,
            xmin,
            xmax,
            samples,
            mode,
            target,
        };
        let analysis = analyze::analyze(&req)?;

        if let Some(path) = &export {
            export_csv(&analysis, path)
                .wrap_err_with(|| format!("failed to write samples to '{}'", path.display()))?;
        }

        match out {
            Output::Table => write_table(&analysis, !no_stats).into_diagnostic(),
            Output::Plain => write_plain(&analysis, !no_stats).into_diagnostic(),
            Output::Json => write_json(&analysis),
        }
    }
}

fn write_table(x: &Analysis, write_stats: bool) -> io::Result<()> {
    use comfy_table::{Cell, CellAlignment as CA, Row, Table};

    let w = &mut io::stdout();

    let mut nfmtr = "[~4]".parse::<numfmt::Formatter>().expect("just fine");

    let mut table = Table::new();

    table.set_header(["Point", "x", "f(x)", "f'(x)"]);

    for (label, p) in LABELS.chars().zip(&x.points) {
        let mut row = Row::new();
        row.add_cell(Cell::new(label))
            .add_cell(Cell::new(nfmtr.fmt(p.x)).set_alignment(CA::Right))
            .add_cell(Cell::new(nfmtr.fmt(p.y)).set_alignment(CA::Right))
            .add_cell(Cell::new(nfmtr.fmt(p.dy)).set_alignment(CA::Right));
        table.add_row(row);
    }

    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);

    writeln!(w, "{table}")?;

    if write_stats {
        write_summary(w, x)?;
    }

    Ok(())
}

fn write_plain(x: &Analysis, write_stats: bool) -> io::Result<()> {
    let w = &mut io::stdout();

    for (label, p) in LABELS.chars().zip(&x.points) {
        writeln!(w, "{label} {} {} {}", p.x, p.y, p.dy)?;
    }

    if write_stats {
        write_summary(w, x)?;
    }

    Ok(())
}

fn write_summary(w: &mut impl Write, x: &Analysis) -> io::Result<()> {
    match &x.symbolic {
        Some(d) => writeln!(w, "  Symbolic derivative: f'(x) = {d}")?,
        None => writeln!(w, "  Symbolic derivative: none (numeric fallback)")?,
    }
    writeln!(w, "  {}", x.status)
}

fn write_json(x: &Analysis) -> Result<()> {
    let mut w = io::stdout();
    serde_json::to_writer(&mut w, x).into_diagnostic()?;
    writeln!(w).into_diagnostic()
}

fn export_csv(x: &Analysis, path: &Path) -> Result<()> {
    let file = fs::File::create(path).into_diagnostic()?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["x", "f(x)", "f'(x)"]).into_diagnostic()?;
    for &(gx, fx, dfx) in &x.grid {
        wtr.serialize((gx, fx, dfx)).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()
}
