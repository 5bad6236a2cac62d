//! Marker clustering tool
//!
//! Reads geographic points from a CSV file, places them as markers on a
//! simulated map viewport, clusters them and writes one row per cluster.

use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io;
use std::path::PathBuf;

use marker_clusterer::{
    ClusterOptions, Error, InMemoryMap, IndexRule, LatLng, LatLngBounds, MapProvider,
    MarkerClusterer, Result, Viewport,
};


#[derive(Parser)]
#[command(name = "marker_clusterer")]
#[command(about = "Grid-based map marker clustering tool", long_about = None)]
struct Args {
    /// Input CSV file with latitude,longitude columns
    #[arg(short, long, default_value = "points.csv")]
    input: PathBuf,

    /// Output CSV file with clusters (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Viewport centre latitude (default: centre of the points)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Viewport centre longitude (default: centre of the points)
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Viewport zoom level
    #[arg(short, long, default_value_t = 10.0)]
    zoom: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Grid size in pixels
    #[arg(short, long, default_value_t = 100.0)]
    grid_size: f64,

    /// Minimum number of markers shown as one cluster marker
    #[arg(short = 'm', long, default_value_t = 2)]
    min_cluster_size: usize,

    /// Zoom from which cluster members are always shown
    #[arg(long, default_value_t = 13.0)]
    max_zoom: f64,

    /// Place cluster markers at the mean position of their members
    #[arg(short, long)]
    average_center: bool,

    /// Member counts at which the next icon is used
    #[arg(long, value_delimiter = ',', default_value = "10,100,200,500,1000")]
    thresholds: Vec<usize>,

    /// Icon names, smallest cluster first
    #[arg(long, value_delimiter = ',')]
    icons: Vec<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
struct ClusterRow {
    cluster: usize,
    position: LatLng,
    count: usize,
    aggregated: bool,
    icon: Option<String>,
}

fn main() {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let points = read_points(&args.input)?;
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    log::info!("Read {} points from {:?}", points.len(), args.input);

    let viewport = build_viewport(args, &points)?;
    log::debug!(
        "Viewport centre ({:.6}, {:.6}) zoom {} size {}x{}",
        viewport.center.lat,
        viewport.center.lng,
        viewport.zoom,
        viewport.width,
        viewport.height
    );

    let mut map: InMemoryMap = InMemoryMap::new(viewport);
    let markers = points.iter().map(|&p| map.add_marker(p)).collect();

    let options = ClusterOptions::<InMemoryMap>::default()
        .with_markers(markers)
        .with_grid_size(args.grid_size)
        .with_min_cluster_size(args.min_cluster_size)
        .with_max_zoom(args.max_zoom)
        .with_average_center(args.average_center)
        .with_index_rule(IndexRule::Thresholds(args.thresholds.clone()))
        .with_icons(args.icons.clone())
        .with_disable_click_zoom(true);
    let clusterer = MarkerClusterer::with_map(map, options);

    let rows = cluster_rows(&clusterer);
    log::info!(
        "Found {} clusters, {} shown as cluster markers",
        rows.len(),
        rows.iter().filter(|r| r.aggregated).count()
    );

    match &args.output {
        None => write_clusters(io::stdout().lock(), &rows)?,
        Some(output_file) => {
            write_clusters(File::create(output_file)?, &rows)?;
            log::info!("Clusters written to {:?}", output_file);
        }
    }

    Ok(())
}

/// Reads points from a file
///
/// Expected format: `latitude,longitude` (header row is optional, extra
/// columns are ignored, unparsable rows are skipped)
fn read_points(filename: &PathBuf) -> Result<Vec<LatLng>> {
    let file = File::open(filename)?;
    read_points_from(file)
}

fn read_points_from<R: io::Read>(reader: R) -> Result<Vec<LatLng>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut points = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            continue;
        }

        let lat = record[0].trim().parse::<f64>();
        let lon = record[1].trim().parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) => points.push(LatLng::new(lat, lon)),
            // First row is a header
            _ if i == 0 => continue,
            _ => log::debug!("Skipping row {}: {:?}", i + 1, record),
        }
    }

    Ok(points)
}

/// Smallest bounds covering every point, `None` for no points
fn extent(points: &[LatLng]) -> Option<LatLngBounds> {
    let first = *points.first()?;
    let mut bounds = LatLngBounds::from_point(first);

    for p in &points[1..] {
        bounds.sw.lat = bounds.sw.lat.min(p.lat);
        bounds.sw.lng = bounds.sw.lng.min(p.lng);
        bounds.ne.lat = bounds.ne.lat.max(p.lat);
        bounds.ne.lng = bounds.ne.lng.max(p.lng);
    }

    Some(bounds)
}

fn build_viewport(args: &Args, points: &[LatLng]) -> Result<Viewport> {
    if !(args.width > 0.0 && args.height > 0.0) {
        return Err(Error::InvalidViewport(format!(
            "size must be positive, got {}x{}",
            args.width, args.height
        )));
    }
    if !args.zoom.is_finite() || args.zoom < 0.0 {
        return Err(Error::InvalidViewport(format!(
            "zoom must be a non-negative number, got {}",
            args.zoom
        )));
    }

    let center = extent(points).map(|b| b.center()).ok_or(Error::EmptyInput)?;
    let center = LatLng::new(args.lat.unwrap_or(center.lat), args.lng.unwrap_or(center.lng));

    Ok(Viewport::new(center, args.zoom, args.width, args.height))
}

/// Describes every cluster as its representative marker sits on the map
fn cluster_rows(clusterer: &MarkerClusterer<InMemoryMap>) -> Vec<ClusterRow> {
    let Some(map) = clusterer.map() else {
        return Vec::new();
    };

    clusterer
        .clusters()
        .iter()
        .enumerate()
        .filter_map(|(i, cluster)| {
            let representative = cluster.representative()?;
            Some(ClusterRow {
                cluster: i,
                position: map.marker_position(representative)?,
                count: cluster.count(),
                aggregated: map.is_marker_attached(representative),
                icon: map.marker_icon(representative).cloned(),
            })
        })
        .collect()
}

/// Writes clusters as CSV
///
/// Format: `cluster,latitude,longitude,count,shown,icon` where `shown` is
/// `aggregate` or `members`
fn write_clusters<W: io::Write>(out: W, rows: &[ClusterRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["cluster", "latitude", "longitude", "count", "shown", "icon"])?;

    for row in rows {
        writer.write_record([
            row.cluster.to_string(),
            row.position.lat.to_string(),
            row.position.lng.to_string(),
            row.count.to_string(),
            if row.aggregated { "aggregate" } else { "members" }.to_string(),
            row.icon.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
