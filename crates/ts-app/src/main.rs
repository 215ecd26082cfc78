//! `shuttle`: command-line front end for the OS time shuttle

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ts_core::Category;
use ts_data::{load_settings, open_dataset, DatasetSource, SampleSource};
use ts_render::{HighlightLevel, RecordingRenderer};
use ts_views::TimelineView;

mod report;

/// Explore the lineage of operating systems
#[derive(Parser, Debug)]
#[command(name = "shuttle")]
#[command(version)]
#[command(about = "Temporal graph explorer for operating system history", long_about = None)]
struct Args {
    /// Dataset file (.json, or .csv with an optional <stem>_relationships.csv
    /// next to it). Uses the built-in sample when omitted.
    dataset: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// First year to show
    #[arg(long)]
    from: Option<i32>,

    /// Last year to show
    #[arg(long)]
    to: Option<i32>,

    /// Categories to show, comma separated
    #[arg(short, long, value_delimiter = ',')]
    category: Vec<String>,

    /// Select an entity and report its lineage
    #[arg(long)]
    select: Option<String>,

    /// Shortest influence path between two entities
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    path: Option<Vec<String>>,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(args.settings.as_deref()).context("Failed to read settings")?;

    let source: Box<dyn DatasetSource> = match &args.dataset {
        Some(path) => open_dataset(path)?,
        None => Box::new(SampleSource),
    };
    info!("Loading dataset from {}", source.name());
    let dataset = source
        .load()
        .with_context(|| format!("Failed to read {}", source.name()))?;

    let mut view = TimelineView::new(RecordingRenderer::new(), settings);
    view.load(dataset.entities, dataset.relationships)
        .context("Dataset failed validation")?;

    apply_filters(&mut view, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(view.stats())?);
    } else {
        print!("{}", report::StatsReport(view.stats()));
    }

    if let Some(id) = &args.select {
        if !view.select(Some(id.as_str())) {
            bail!("Unknown entity: {id}");
        }
        let related = view.renderer().entities_at(HighlightLevel::Related).len();
        let analytics = view.analytics();
        if let Some(entity) = view.selected_entity() {
            println!();
            print!(
                "{}",
                report::EntityReport {
                    entity,
                    analytics: &analytics,
                }
            );
            println!("  Neighbours:  {related}");
        }
    }

    if let Some([from, to]) = args.path.as_deref() {
        let path = view.analytics().shortest_influence_path(from, to);
        println!();
        println!("{}", report::path(from, to, &path));
    }

    Ok(())
}

/// Queue the requested filters and run frames until they are applied
fn apply_filters(view: &mut TimelineView<RecordingRenderer>, args: &Args) -> Result<()> {
    if args.from.is_some() || args.to.is_some() {
        let layout = view.layout();
        let start = args.from.unwrap_or(layout.min_year);
        let end = args.to.unwrap_or(layout.max_year);
        view.set_time_range(start, end);
    }

    if !args.category.is_empty() {
        let mut categories = Vec::with_capacity(args.category.len());
        for tag in &args.category {
            match Category::parse(&tag.to_ascii_lowercase()) {
                Some(category) => categories.push(category),
                None => bail!("Unknown category: {tag}"),
            }
        }
        view.set_categories(categories);
    }

    let mut frame = 0u32;
    while view.pending_mutations() > 0 {
        view.tick(frame as f32 / 60.0);
        frame += 1;
    }
    Ok(())
}
