use log::{debug, info};
use std::{
    ffi::OsString,
    process::{Command, ExitStatus},
};

use crate::{
    errors::{BuildError, Result},
    interrupt,
    models::BuildTarget,
    services::ImageBackend,
};

/// Builds images by running `<program> build` with inherited stdio.
///
/// On unix the engine gets its own process group so interrupts can be
/// forwarded to it as a whole.
pub struct DockerBackend {
    program: String,
}

impl DockerBackend {
    pub fn new<P: Into<String>>(program: P) -> DockerBackend {
        DockerBackend {
            program: program.into(),
        }
    }

    /// Arguments passed to the engine, without the program name.
    pub fn build_args(target: &BuildTarget) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "build".into(),
            "-t".into(),
            target.image.to_string().into(),
            "-f".into(),
            target.dockerfile.clone().into(),
        ];

        for (key, value) in target.build_args.iter() {
            args.push("--build-arg".into());
            args.push(format!("{}={}", key, value).into());
        }

        for (key, value) in target.labels.iter() {
            args.push("--label".into());
            args.push(format!("{}={}", key, value).into());
        }

        args.push(target.context.clone().into());
        args
    }
}

impl ImageBackend for DockerBackend {
    fn program(&self) -> &str {
        &self.program
    }

    fn build_image(&mut self, target: &BuildTarget) -> Result<i32> {
        let image = target.image.to_string();
        if let Some(signal) = interrupt::received() {
            return Err(BuildError::Interrupted { image, signal });
        }

        let args = DockerBackend::build_args(target);

        let command_line = args
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        info!("$ {} {}", self.program, command_line);

        let mut command = Command::new(&self.program);
        command.args(&args);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|source| BuildError::EngineUnavailable {
                program: self.program.clone(),
                source,
            })?;
        let status = {
            let _engine = interrupt::track(child.id());
            child.wait()?
        };
        debug!("{} exited with {:?}", self.program, status);

        if let Some(signal) = interrupt::received() {
            return Err(BuildError::Interrupted { image, signal });
        }

        Ok(exit_code(status))
    }
}

/// Exit code of the engine; signals map to `128 + signal` like a shell does.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
