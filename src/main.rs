use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use subspace_plots::catalog::get_function;
use subspace_plots::cli::Args;
use subspace_plots::config::PlotConfig;
use subspace_plots::logging::init_logging;
use subspace_plots::render::render_surface;
use subspace_plots::store::ResultStore;
use subspace_plots::ComparisonDriver;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = PlotConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(path) = &args.results_path {
        config.results_path.clone_from(path);
    }
    let driver = ComparisonDriver::from_config(&config).context("invalid configuration")?;

    let store = ResultStore::for_model(&config.results_path, &args.model);
    let folders: Vec<PathBuf> = config
        .experiment_names(args.degree, args.max_points)
        .iter()
        .map(|name| store.experiment_dir(name))
        .collect();
    info!(
        model = %args.model,
        root = %store.root().display(),
        folders = folders.len(),
        "comparing experiments"
    );

    let output_dir = (!args.no_save).then(|| store.root());
    for requested in args.requested_qois() {
        let qoi = match requested {
            Ok(qoi) => qoi,
            Err(err) => {
                warn!(error = %err, "no chart produced");
                continue;
            }
        };
        match driver.run(&folders, qoi, output_dir) {
            Ok((_, report)) => info!(
                %qoi,
                series = report.series.len(),
                skipped = report.skipped.len(),
                "chart done"
            ),
            Err(err) => warn!(%qoi, error = %err, "no chart produced"),
        }
    }

    if args.surf_2d {
        let result = get_function(&args.surface_model).and_then(|function| {
            let path = config.results_path.join(format!(
                "surf2D_{}.{}",
                args.surface_model,
                config.figure.format.extension()
            ));
            render_surface(
                function.as_ref(),
                config.figure.surface_resolution,
                &path,
                config.figure.size(),
            )
            .map(|()| path)
        });
        match result {
            Ok(path) => info!(path = %path.display(), "saved surface"),
            Err(err) => warn!(model = %args.surface_model, error = %err, "no surface produced"),
        }
    }
    Ok(())
}
