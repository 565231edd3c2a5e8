use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use ppcap::aggregate::ChartTable;
use ppcap::normalize::title_case;
use ppcap::ranges::YearBounds;
use ppcap::source::{self, Client};
use ppcap::{
    CapacityWindow, Dataset, DashboardView, Engine, GeographyKey, RangePolicy, ViewMode,
    YearWindow, storage, viz,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "ppcap",
    version,
    about = "Filter, aggregate & chart global power-generation capacity"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List statuses, technology types, and the year range of a table.
    Options(InputArgs),
    /// Run the filter/aggregate pipeline once (and optionally save and render).
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// CSV file, or an http(s) URL serving CSV
    #[arg(short, long)]
    input: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Geography {
    Country,
    Region,
}

impl From<Geography> for GeographyKey {
    fn from(g: Geography) -> Self {
        match g {
            Geography::Country => GeographyKey::Country,
            Geography::Region => GeographyKey::Region,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum View {
    Absolute,
    Percentage,
}

impl From<View> for ViewMode {
    fn from(v: View) -> Self {
        match v {
            View::Absolute => ViewMode::Absolute,
            View::Percentage => ViewMode::Percentage,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Statuses separated by comma or semicolon (default: Operating)
    #[arg(short, long)]
    status: Option<String>,
    /// Technology types separated by comma or semicolon (default: all)
    #[arg(short = 't', long = "type")]
    types: Option<String>,
    /// Year window YYYY:YYYY (default: full range of the table)
    #[arg(short, long)]
    years: Option<String>,
    /// Capacity window on per-geography totals, LO:HI in MW (default: 0 to bound)
    #[arg(short, long)]
    capacity: Option<String>,
    #[arg(short, long, value_enum, default_value_t = Geography::Country)]
    geography: Geography,
    #[arg(short, long, value_enum, default_value_t = View::Absolute)]
    view: View,
    /// Start from the dashboard's opening capacity window (100,000 to 2,500,000 MW)
    /// instead of 0 to bound. Ignored when --capacity is given.
    #[arg(long, default_value_t = false)]
    dashboard_window: bool,
    /// Clamp an explicit capacity window to the recomputed bound.
    #[arg(long, default_value_t = false)]
    clamp_range: bool,
    /// Save chart rows (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Save map points (format inferred by --format or extension).
    #[arg(long)]
    map_out: Option<PathBuf>,
    /// Save per-geography totals (format inferred by --format or extension).
    #[arg(long)]
    totals_out: Option<PathBuf>,
    /// Output format for saved tables (csv or json).
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Render the bar chart to the given path (.svg or .png).
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Render the plant map to the given path (.svg or .png).
    #[arg(long)]
    map: Option<PathBuf>,
    /// Width of rendered images (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of rendered images (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(title_case)
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_years(s: &str) -> Option<YearWindow> {
    let (a, b) = s.split_once(':')?;
    Some(YearWindow::new(a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_capacity(s: &str) -> Option<CapacityWindow> {
    let (a, b) = s.split_once(':')?;
    Some(CapacityWindow::new(a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn fmt_mw(v: f64) -> String {
    (v.max(0.0).round() as u64).to_formatted_string(&Locale::en)
}

fn load(input: &str) -> Result<Dataset> {
    let dataset = if input.starts_with("http://") || input.starts_with("https://") {
        Client::new()?.fetch_csv(input)?
    } else {
        source::load_csv(input).with_context(|| format!("load {input}"))?
    };
    Ok(dataset)
}

/// `csv` or `json`, from `--format` or the file extension.
fn out_format(format: Option<&OutFormat>, path: &Path) -> String {
    match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Options(args) => cmd_options(args),
        Command::View(args) => cmd_view(args),
    }
}

fn cmd_options(args: InputArgs) -> Result<()> {
    let dataset = load(&args.input)?;
    println!("rows: {}", dataset.len());
    println!("statuses: {}", dataset.statuses().join(", "));
    println!("types: {}", dataset.types().join(", "));
    match YearBounds::derive(&dataset) {
        Some(b) => println!("years: {}:{}", b.min, b.max),
        None => println!("years: NA"),
    }
    Ok(())
}

fn cmd_view(args: ViewArgs) -> Result<()> {
    let dataset = load(&args.input.input)?;
    let policy = if args.clamp_range {
        RangePolicy::ClampToBound
    } else {
        RangePolicy::KeepPrevious
    };
    let engine = Engine::new(Arc::new(dataset)).with_policy(policy);

    let mut criteria = if args.dashboard_window {
        engine.dashboard_criteria()
    } else {
        engine.default_criteria()
    };
    if let Some(s) = &args.status {
        criteria.statuses = parse_list(s);
    }
    if let Some(t) = &args.types {
        criteria.types = parse_list(t);
    }
    if let Some(y) = &args.years {
        criteria.years =
            parse_years(y).ok_or_else(|| anyhow::anyhow!("invalid --years, expected YYYY:YYYY"))?;
    }
    if let Some(c) = &args.capacity {
        let window = parse_capacity(c)
            .ok_or_else(|| anyhow::anyhow!("invalid --capacity, expected LO:HI"))?;
        criteria.capacity = Some(window);
    }
    criteria.geography = args.geography.into();
    criteria.view = args.view.into();

    let view = engine.run(&criteria);
    print_view(&view);
    save_outputs(&args, &view)?;

    if let Some(path) = args.chart.as_ref() {
        viz::render_chart(&view.chart, path, args.width, args.height)?;
        eprintln!("Wrote chart to {}", path.display());
    }
    if let Some(path) = args.map.as_ref() {
        viz::render_map(&view.map, path, args.width, args.height)?;
        eprintln!("Wrote map to {}", path.display());
    }
    Ok(())
}

fn print_view(view: &DashboardView) {
    let c = &view.control;
    println!(
        "capacity control: 0..{} MW, window [{}, {}]",
        fmt_mw(c.max),
        fmt_mw(c.value.min),
        fmt_mw(c.value.max)
    );
    let marks: Vec<&str> = c.marks.iter().map(|m| m.label.as_str()).collect();
    println!("marks: {}", marks.join(" "));

    match view.chart_table() {
        None => println!("{}", ppcap::empty::NO_DATA_TITLE),
        Some(table) => {
            println!("{} ({})", table.title, table.axis_title);
            for r in &table.rows {
                println!("{}  •  {}  {}", r.geography, r.plant_type, r.label);
            }
            for t in &view.totals {
                println!("total {}  {} MW", t.geography, fmt_mw(t.capacity_mw));
            }
        }
    }
}

fn save_outputs(args: &ViewArgs, view: &DashboardView) -> Result<()> {
    if let Some(path) = args.out.as_ref() {
        match out_format(args.format.as_ref(), path).as_str() {
            "csv" => match view.chart_table() {
                Some(table) => storage::save_chart_csv(table, path)?,
                // header only
                None => storage::save_chart_csv(
                    &ChartTable::from_rows(&[], args.geography.into(), args.view.into()),
                    path,
                )?,
            },
            "json" => match view.chart_table() {
                Some(table) => storage::save_json(table, path)?,
                None => storage::save_json(&view.chart, path)?,
            },
            other => bail!("unsupported format: {}", other),
        }
        let rows = view.chart_table().map_or(0, |t| t.rows.len());
        eprintln!("Saved {} chart rows to {}", rows, path.display());
    }
    if let Some(path) = args.map_out.as_ref() {
        match out_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_map_csv(view.map_points(), path)?,
            "json" => storage::save_json(&view.map, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} map points to {}", view.map_points().len(), path.display());
    }
    if let Some(path) = args.totals_out.as_ref() {
        match out_format(args.format.as_ref(), path).as_str() {
            "csv" => storage::save_totals_csv(&view.totals, path)?,
            "json" => storage::save_json(&view.totals, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} totals to {}", view.totals.len(), path.display());
    }
    Ok(())
}
