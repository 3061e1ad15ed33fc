use log::{info, warn};
use std::{io::Write, path::PathBuf};

use crate::{
    errors::{BuildError, Result},
    models::{BuildResult, BuildTarget, Stage},
    report, resolver,
    services::{BuildFrontend, ImageBackend, VersionControl},
    verifier,
};

/// Verifies assets, resolves build arguments and builds every target in
/// order, stopping at the first failure.
pub struct Controller {
    root: PathBuf,
    frontend: Box<dyn BuildFrontend>,
    backend: Box<dyn ImageBackend>,
    vcs: Box<dyn VersionControl>,
    numpf: Option<String>,
    stage: Stage,
    results: Vec<BuildResult>,
}

impl Controller {
    pub fn init<P, F, B, V>(
        root: P,
        frontend: F,
        backend: B,
        vcs: V,
        numpf: Option<String>,
    ) -> Controller
    where
        P: Into<PathBuf>,
        F: 'static + BuildFrontend,
        B: 'static + ImageBackend,
        V: 'static + VersionControl,
    {
        Controller {
            root: root.into(),
            frontend: Box::new(frontend),
            backend: Box::new(backend),
            vcs: Box::new(vcs),
            numpf,
            stage: Stage::Init,
            results: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn results(&self) -> &[BuildResult] {
        &self.results
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.stage = Stage::Verifying;
        let assets = self.frontend.required_assets();
        if let Err(err) = verifier::verify_assets(&self.root, &assets) {
            self.stage = Stage::FailMissingAsset;
            return Err(err);
        }

        self.stage = Stage::Resolving;
        let args = match resolver::resolve(self.vcs.as_ref(), self.numpf.as_deref()) {
            Ok(args) => args,
            Err(err) => {
                self.stage = Stage::FailConfig;
                return Err(err);
            }
        };
        report::resolved(stdout, &args)?;

        let targets = match self.frontend.targets(&self.root, &args) {
            Ok(targets) => targets,
            Err(err) => {
                self.stage = Stage::FailMissingAsset;
                return Err(err);
            }
        };

        let total = targets.len();
        for (index, target) in targets.into_iter().enumerate() {
            self.stage = Stage::Building(index);
            report::building(stdout, index, total, &target)?;

            let exit_code = match self.backend.build_image(&target) {
                Ok(exit_code) => exit_code,
                Err(err) => {
                    self.stage = Stage::FailBuild(index);
                    return Err(err);
                }
            };

            if exit_code != 0 {
                warn!("{} failed with exit code {}", target.image, exit_code);
                self.stage = Stage::FailBuild(index);
                report::failed(stdout, &target)?;
                let image = target.image.to_string();
                self.record(target, exit_code);
                return Err(BuildError::BuildEngine { image, exit_code });
            }

            info!("built {}", target.image);
            report::built(stdout, &target)?;
            self.record(target, exit_code);
        }

        self.stage = Stage::Done;

        for result in self.results.iter() {
            let lines = self.frontend.usage(self.backend.program(), &result.target);
            report::usage(stdout, &result.target, &lines)?;
        }

        Ok(())
    }

    fn record(&mut self, target: BuildTarget, exit_code: i32) {
        self.results.push(BuildResult {
            target,
            succeeded: exit_code == 0,
            exit_code,
        });
    }
}
