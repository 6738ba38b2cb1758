//! `roofkit` takeoff tool.
//!
//! Loads a saved annotation snapshot, applies the scale reference given on
//! the command line and prints the resulting totals as JSON. With
//! `--upload` the snapshot is also saved to the measurement API (falling
//! back to the local store), and `--report` asks the API for a report.

use std::path::PathBuf;

use anyhow::{bail, Context};
use roofkit::{
    editor_config, init_logging, save_workflow, Config, EditorState, ScaleReference, Snapshot,
    BUILD_DATE, VERSION,
};

const USAGE: &str = "Usage: roofkit <snapshot.json> [--gsd <m/px>] [--total-sqft <ft2>] \
[--image <path>] [--config <path>] [--upload <measurement-id> [--report]]";

#[derive(Debug, Default)]
struct Args {
    snapshot: PathBuf,
    gsd: Option<f64>,
    total_sq_ft: Option<f64>,
    image: Option<PathBuf>,
    config: Option<PathBuf>,
    upload: Option<String>,
    report: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut snapshot = None;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{} requires a value", name))
        };
        match arg.as_str() {
            "--gsd" => parsed.gsd = Some(value("--gsd")?.parse().context("Invalid --gsd")?),
            "--total-sqft" => {
                parsed.total_sq_ft =
                    Some(value("--total-sqft")?.parse().context("Invalid --total-sqft")?)
            }
            "--image" => parsed.image = Some(PathBuf::from(value("--image")?)),
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--upload" => parsed.upload = Some(value("--upload")?),
            "--report" => parsed.report = true,
            "-h" | "--help" => bail!("{}", USAGE),
            "-V" | "--version" => bail!("roofkit {} ({})", VERSION, BUILD_DATE),
            other if other.starts_with('-') => bail!("Unknown option {}\n{}", other, USAGE),
            other => {
                if snapshot.replace(PathBuf::from(other)).is_some() {
                    bail!("Only one snapshot file may be given\n{}", USAGE);
                }
            }
        }
    }

    parsed.snapshot = snapshot.with_context(|| USAGE.to_string())?;
    if parsed.report && parsed.upload.is_none() {
        bail!("--report requires --upload\n{}", USAGE);
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = parse_args(std::env::args().skip(1))?;

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?;

    let snapshot = Snapshot::load_from_file(&args.snapshot)?;
    tracing::info!(
        planes = snapshot.planes.len(),
        layers = snapshot.layers.len(),
        "Loaded {}",
        args.snapshot.display()
    );

    let mut editor = EditorState::new(editor_config(&config));
    editor.restore(snapshot);

    if let Some(image) = &args.image {
        let (width, height) = image::image_dimensions(image)
            .with_context(|| format!("Failed to read image {}", image.display()))?;
        editor.set_image(width as f64, height as f64, width as f64, height as f64)?;
    }

    editor.set_scale(ScaleReference {
        gsd_m_per_px: args.gsd,
        reference_total_sq_ft: args.total_sq_ft,
    });

    if let Some(measurement_id) = &args.upload {
        let workflow = save_workflow(&config.sync, measurement_id)?;
        let outcome = workflow.save_editor(&mut editor).await;
        for message in &outcome.messages {
            tracing::info!("{}", message);
        }

        if args.report {
            let report = workflow
                .generate_report(&editor.to_snapshot(), editor.totals().clone(), None)
                .await?;
            for message in &report.messages {
                tracing::info!("{}", message);
            }
            if let Some(link) = report
                .report
                .and_then(|r| r.link(&config.sync.endpoint))
            {
                eprintln!("Report: {}", link);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(editor.totals())?);
    Ok(())
}
