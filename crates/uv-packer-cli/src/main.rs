use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use image::{ImageReader, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;
use tracing::{info, warn};
use uv_packer_core::similarity::{detect_mirror, is_duplicate, similarity};
use uv_packer_core::{
    Algorithm, FrameGrid, PackOptions, PackRect, compose_texture, pack, to_json, to_json_hash,
};

mod manifest;

use manifest::Manifest;

#[derive(Parser, Debug)]
#[command(
    name = "uv-packer",
    about = "Repack the UV faces of a model into an optimized power-of-two texture",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the faces of a manifest and write the optimized texture(s)
    Pack(PackArgs),
    /// Compare two images: similarity percentage and mirror axis
    Compare(CompareArgs),
    /// Time the strategies on random rectangle sets
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Face manifest (JSON or YAML)
    #[arg(help_heading = "Input/Output")]
    manifest: PathBuf,
    /// Texture(s) to repack; the first one provides the pixels used for duplicate detection
    #[arg(short, long, help_heading = "Input/Output")]
    texture: Vec<PathBuf>,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name of the written result/manifest JSON
    #[arg(short, long, default_value = "packed", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides the options below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Algorithm: shelf | maxrects | skyline
    #[arg(long, value_parser = ["shelf", "maxrects", "skyline"], default_value = "skyline", help_heading = "Layout")]
    algorithm: String,
    /// Maximum texture size (power of two, both axes)
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_size: u32,
    /// Padding kept right of and below every face
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    padding: u32,
    /// Sort faces before packing
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Layout")]
    sort: bool,

    // Similarity
    /// Fold duplicate and mirrored faces onto a shared slot
    #[arg(long, default_value_t = false, help_heading = "Similarity")]
    similar_check: bool,
    /// Percentage of matching pixels for two faces to count as equal (0..=100)
    #[arg(long, default_value_t = 90.0, help_heading = "Similarity")]
    similarity_threshold: f32,
    /// Search duplicates in parallel (requires feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Similarity")]
    parallel: bool,

    // Export
    /// Metadata format: json-array | json-hash
    #[arg(long, default_value = "json-array", value_parser = ["json-array", "json-hash"], help_heading = "Export")]
    metadata: String,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute placements and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct CompareArgs {
    a: PathBuf,
    b: PathBuf,
    /// Percentage of matching pixels required (0..=100)
    #[arg(long, default_value_t = 90.0)]
    threshold: f32,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Algorithm: shelf | maxrects | skyline | all
    #[arg(long, value_parser = ["shelf", "maxrects", "skyline", "all"], default_value = "all")]
    algorithm: String,
    /// Rectangles per set
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// Largest rectangle side
    #[arg(long, default_value_t = 32)]
    max_side: u32,
    /// Maximum texture size
    #[arg(long, default_value_t = 2048)]
    max_size: u32,
    /// Runs per algorithm
    #[arg(long, default_value_t = 10)]
    runs: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Compare(args) => run_compare(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = PackOptions {
        algorithm: parse_algorithm(&cli.algorithm)?,
        max_size: cli.max_size,
        padding: cli.padding,
        sort: cli.sort,
        similar_check: cli.similar_check,
        similarity_threshold: cli.similarity_threshold,
        parallel: cli.parallel,
    };
    let options = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.into_pack_options(base)?
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&options)?),
            _ => println!("{}", serde_json::to_string_pretty(&options)?),
        }
        return Ok(());
    }
    options.validate()?;

    let manifest = Manifest::load(&cli.manifest)?;
    let textures = load_textures(&cli.texture)?;
    info!(
        faces = manifest.face_count(),
        textures = textures.len(),
        "loaded manifest"
    );

    let regions = manifest.regions();
    let pixels = match textures.first() {
        Some((_, tex)) => manifest::face_pixels(&regions, tex),
        None => {
            if options.similar_check {
                warn!("no texture given; duplicate detection has no pixels to compare");
            }
            vec![None; regions.len()]
        }
    };
    let rects: Vec<PackRect<'_, _>> = manifest::pack_rects(&regions, &pixels);

    let start = Instant::now();
    let result = pack(&rects, &options)?;
    let stats = result.stats();
    info!(
        algorithm = ?options.algorithm,
        time = %fmt_dur(start.elapsed()),
        "{}",
        stats.summary()
    );

    if cli.dry_run {
        println!(
            "{}x{} placed={} duplicates={} empty={} occupancy={:.2}%",
            result.width,
            result.height,
            stats.num_placed,
            stats.num_duplicates,
            stats.num_empty,
            stats.occupancy * 100.0
        );
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    let json = match cli.metadata.as_str() {
        "json-hash" => to_json_hash(&result),
        _ => to_json(&result),
    };
    let json_path = cli.out_dir.join(format!("{}.json", cli.name));
    fs::write(&json_path, serde_json::to_vec_pretty(&json)?)
        .with_context(|| format!("write {}", json_path.display()))?;

    let manifest_path = cli.out_dir.join(format!("{}_manifest.json", cli.name));
    fs::write(
        &manifest_path,
        serde_json::to_vec_pretty(&manifest.rewritten(&result))?,
    )
    .with_context(|| format!("write {}", manifest_path.display()))?;

    let bar = progress_bar(textures.len(), show_progress)?;
    for (path, tex) in &textures {
        if let Some(b) = &bar {
            b.set_message(path.display().to_string());
        }
        let frame = manifest
            .texture_size
            .map_or(tex.dimensions(), |[w, h]| (w, h));
        let grid = FrameGrid::from_sizes(tex.dimensions(), frame);
        let out = compose_texture(&result, tex, grid);
        let png_path = cli.out_dir.join(optimized_name(path));
        out.save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(
            path = %png_path.display(),
            frames = grid.count(),
            width = out.width(),
            height = out.height(),
            "wrote texture"
        );
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(())
}

fn run_compare(c: &CompareArgs) -> anyhow::Result<()> {
    let a = load_rgba(&c.a)?;
    let b = load_rgba(&c.b)?;
    let Some(pct) = similarity(&a, &b) else {
        println!(
            "size mismatch: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        );
        return Ok(());
    };
    println!(
        "similarity={:.2}% duplicate={} mirror={}",
        pct,
        is_duplicate(&a, &b, c.threshold),
        detect_mirror(&a, &b, c.threshold)
    );
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let algorithms: Vec<Algorithm> = match b.algorithm.as_str() {
        "all" => vec![Algorithm::Shelf, Algorithm::MaxRects, Algorithm::Skyline],
        other => vec![parse_algorithm(other)?],
    };
    let mut rng = StdRng::seed_from_u64(b.seed);
    let sizes: Vec<(u32, u32)> = (0..b.count)
        .map(|_| {
            (
                rng.gen_range(1..=b.max_side.max(1)),
                rng.gen_range(1..=b.max_side.max(1)),
            )
        })
        .collect();
    let rects: Vec<PackRect<'_, usize>> = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| PackRect::sized(i, w, h))
        .collect();

    for algorithm in algorithms {
        let options = PackOptions::builder()
            .algorithm(algorithm)
            .max_size(b.max_size)
            .build();
        let mut total = Duration::ZERO;
        let mut last = None;
        for _ in 0..b.runs.max(1) {
            let start = Instant::now();
            let out = pack(&rects, &options);
            total += start.elapsed();
            last = Some(out);
        }
        let avg = total / b.runs.max(1) as u32;
        match last {
            Some(Ok(out)) => {
                let s = out.stats();
                println!(
                    "{:?}: {}x{} occupancy={:.2}% time={}",
                    algorithm,
                    s.width,
                    s.height,
                    s.occupancy * 100.0,
                    fmt_dur(avg)
                );
            }
            Some(Err(e)) => println!("{:?}: {} time={}", algorithm, e, fmt_dur(avg)),
            None => {}
        }
    }
    Ok(())
}

fn parse_algorithm(s: &str) -> anyhow::Result<Algorithm> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown algorithm: {}", s))
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

/// `<stem>_optimized.<ext>`, keeping the texture's extension (png when absent).
fn optimized_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("texture");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    format!("{stem}_optimized.{ext}")
}

fn progress_bar(len: usize, show: bool) -> anyhow::Result<Option<indicatif::ProgressBar>> {
    use indicatif::{ProgressBar, ProgressStyle};
    if !show || len == 0 {
        return Ok(None);
    }
    let b = ProgressBar::new(len as u64);
    b.set_style(ProgressStyle::with_template(
        "{spinner:.green} composing {pos}/{len} [{elapsed_precise}] {wide_msg}",
    )?);
    Ok(Some(b))
}

fn load_textures(paths: &[PathBuf]) -> anyhow::Result<Vec<(PathBuf, RgbaImage)>> {
    paths
        .iter()
        .map(|p| Ok((p.clone(), load_rgba(p)?)))
        .collect()
}

fn load_rgba(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img.to_rgba8())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    algorithm: Option<String>,
    max_size: Option<u32>,
    padding: Option<u32>,
    sort: Option<bool>,
    similar_check: Option<bool>,
    similarity_threshold: Option<f32>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_pack_options(self, mut opts: PackOptions) -> anyhow::Result<PackOptions> {
        if let Some(v) = self.algorithm {
            opts.algorithm = parse_algorithm(&v)?;
        }
        if let Some(v) = self.max_size {
            opts.max_size = v;
        }
        if let Some(v) = self.padding {
            opts.padding = v;
        }
        if let Some(v) = self.sort {
            opts.sort = v;
        }
        if let Some(v) = self.similar_check {
            opts.similar_check = v;
        }
        if let Some(v) = self.similarity_threshold {
            opts.similarity_threshold = v;
        }
        if let Some(v) = self.parallel {
            opts.parallel = v;
        }
        Ok(opts)
    }
}
