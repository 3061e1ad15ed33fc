use anyhow::{Context, Result};
use log::{info, warn};
use std::{
    io::{stderr, stdout},
    process,
};
use structopt::StructOpt;

use backends::DockerBackend;
use config::Config;
use controller::Controller;
use frontends::FlexpartFrontend;
use vcs::GitRepository;

mod backends;
mod config;
mod controller;
mod errors;
mod frontends;
mod hasher;
mod interrupt;
mod models;
mod report;
mod resolver;
mod services;
mod vcs;
mod verifier;

/// Takes no options. `NUMPF` sets the number of precipitation fields
/// (default 3), `FLEXPART_IMAGES_ROOT` and `FLEXPART_IMAGES_DOCKER` override
/// the repository root and the build engine, `LOG` enables diagnostics.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "flexpart-images",
    about = "Builds the FLEXPART and flex_extract (convert2) docker images."
)]
struct Opt {}

fn main() {
    pretty_env_logger::init_custom_env("LOG");

    let _opt = Opt::from_args();

    if let Err(err) = run() {
        let message = format!("{:#}", err);
        if report::error(&mut stderr(), &message).is_err() {
            eprintln!("ERROR: {}", message);
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    interrupt::install().context("cannot forward interrupts to the build engine")?;

    let config = Config::from_env().context("invalid configuration")?;
    info!("repository root {:?}", config.root);
    info!("build engine {:?}", config.docker);

    let mut controller = Controller::init(
        config.root.as_path(),
        FlexpartFrontend::new(),
        DockerBackend::new(config.docker),
        GitRepository::new(config.root.as_path()),
        config.numpf,
    );
    let outcome = controller.run(&mut stdout());

    if controller.stage().is_terminal() {
        info!("stopped in stage {:?}", controller.stage());
    } else {
        warn!("output failed in stage {:?}", controller.stage());
    }
    for result in controller.results() {
        info!(
            "{} succeeded={} exit_code={}",
            result.target.image, result.succeeded, result.exit_code
        );
    }

    outcome?;
    Ok(())
}
