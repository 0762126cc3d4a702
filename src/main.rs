mod app;
mod dataset;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::EngineOptions;

/// Interactive force-directed explorer for knowledge graphs.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph JSON with `nodes` and `links` (or `relationships`). Uses the
    /// bundled sample when omitted.
    dataset: Option<PathBuf>,

    /// JSON file with engine options (`nodeRadius`, `linkDistance`, ...)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    node_radius: Option<f32>,

    #[arg(long)]
    link_distance: Option<f32>,

    #[arg(long, allow_hyphen_values = true)]
    charge_strength: Option<f32>,

    /// Keep dragged nodes pinned where they are dropped
    #[arg(long)]
    fix_nodes_after_drag: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn engine_options(&self) -> Result<EngineOptions> {
        let mut options = match &self.config {
            Some(path) => EngineOptions::from_json_file(path)?,
            None => EngineOptions::default(),
        };

        if let Some(node_radius) = self.node_radius {
            options.node_radius = node_radius;
        }
        if let Some(link_distance) = self.link_distance {
            options.link_distance = link_distance;
        }
        if let Some(charge_strength) = self.charge_strength {
            options.charge_strength = charge_strength;
        }
        if self.fix_nodes_after_drag {
            options.fix_nodes_after_drag = true;
        }
        Ok(options)
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug,eframe=info,egui_glow=info"
    } else {
        "kgraph_explorer=info,warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet);

    let engine_options = args.engine_options()?;
    debug!(?engine_options, "engine options");
    info!(dataset = ?args.dataset, "starting explorer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Knowledge Graph Explorer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::GraphExplorerApp::new(
                cc,
                args.dataset.clone(),
                engine_options.clone(),
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the explorer window: {error}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{ "nodeRadius": 20, "linkDistance": 80 }"#).expect("write");

        let args = Args::try_parse_from([
            "kgraph-explorer",
            "graph.json",
            "--config",
            config.to_str().expect("utf-8 path"),
            "--link-distance",
            "200",
            "--charge-strength",
            "-250",
            "--fix-nodes-after-drag",
        ])
        .expect("args");

        let options = args.engine_options().expect("options");
        assert_eq!(args.dataset, Some(PathBuf::from("graph.json")));
        assert_eq!(options.node_radius, 20.0);
        assert_eq!(options.link_distance, 200.0);
        assert_eq!(options.charge_strength, -250.0);
        assert!(options.fix_nodes_after_drag);
    }

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["kgraph-explorer"]).expect("args");
        assert_eq!(args.engine_options().expect("options"), EngineOptions::default());
        assert!(args.dataset.is_none());
    }

    #[test]
    fn missing_config_is_an_error() {
        let args = Args::try_parse_from(["kgraph-explorer", "--config", "/nonexistent/options.json"])
            .expect("args");
        let err = args.engine_options().expect_err("missing config");
        assert!(format!("{err:#}").contains("/nonexistent/options.json"));
    }
}
