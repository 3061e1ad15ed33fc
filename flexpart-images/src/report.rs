use crossterm::{
    style::{self, Colorize, Styler},
    QueueableCommand,
};
use std::{fmt::Display, io::Write};

use crate::{
    frontends::LABEL_FINGERPRINT,
    models::{BuildArgs, BuildTarget},
};

pub fn resolved(stdout: &mut impl Write, args: &BuildArgs) -> crossterm::Result<()> {
    stdout
        .queue(style::PrintStyledContent("INFO: ".cyan().bold()))?
        .queue(style::Print(format!(
            "branch {}, commit {}, NUMPF={} ({})\n",
            args.branch,
            args.commit,
            args.numpf,
            args.numpf.description()
        )))?
        .flush()?;

    Ok(())
}

pub fn building(
    stdout: &mut impl Write,
    index: usize,
    total: usize,
    target: &BuildTarget,
) -> crossterm::Result<()> {
    let fingerprint = target
        .labels
        .get(LABEL_FINGERPRINT)
        .map(String::as_str)
        .unwrap_or("-");

    stdout
        .queue(style::PrintStyledContent("INFO: ".cyan().bold()))?
        .queue(style::Print(format!(
            "[{}/{}] building {} from {} (fingerprint {})\n",
            index + 1,
            total,
            target.image,
            target.dockerfile.display(),
            fingerprint
        )))?
        .flush()?;

    Ok(())
}

pub fn built(stdout: &mut impl Write, target: &BuildTarget) -> crossterm::Result<()> {
    stdout
        .queue(style::Print(format!("{} ... ", target.image)))?
        .queue(style::PrintStyledContent("done".green().bold()))?
        .queue(style::Print("\n"))?
        .flush()?;

    Ok(())
}

pub fn failed(stdout: &mut impl Write, target: &BuildTarget) -> crossterm::Result<()> {
    stdout
        .queue(style::Print(format!("{} ... ", target.image)))?
        .queue(style::PrintStyledContent("failed".red().bold()))?
        .queue(style::Print("\n"))?
        .flush()?;

    Ok(())
}

pub fn usage(
    stdout: &mut impl Write,
    target: &BuildTarget,
    lines: &[String],
) -> crossterm::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }

    stdout.queue(style::Print(format!("\nRun {} with:\n", target.image)))?;
    for line in lines {
        stdout.queue(style::Print(format!("  {}\n", line)))?;
    }
    stdout.flush()?;

    Ok(())
}

pub fn error(stderr: &mut impl Write, message: &dyn Display) -> crossterm::Result<()> {
    stderr
        .queue(style::PrintStyledContent("ERROR: ".red().bold()))?
        .queue(style::Print(format!("{}\n", message)))?
        .flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageRef;
    use std::{collections::BTreeMap as Map, path::PathBuf};

    fn target() -> BuildTarget {
        BuildTarget {
            image: ImageRef::new("convert2", "latest"),
            dockerfile: PathBuf::from("/repo/docker/Dockerfile.convert2"),
            context: PathBuf::from("/repo/docker"),
            build_args: Map::new(),
            labels: Map::new(),
        }
    }

    #[test]
    fn usage_lists_commands_under_the_image() {
        let mut stdout: Vec<u8> = Vec::new();
        let lines = vec!["docker run --rm convert2:latest".to_owned()];

        usage(&mut stdout, &target(), &lines).unwrap();

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "\nRun convert2:latest with:\n  docker run --rm convert2:latest\n"
        );
    }

    #[test]
    fn usage_without_commands_prints_nothing() {
        let mut stdout: Vec<u8> = Vec::new();

        usage(&mut stdout, &target(), &[]).unwrap();

        assert!(stdout.is_empty());
    }

    #[test]
    fn building_without_fingerprint_shows_placeholder() {
        let mut stdout: Vec<u8> = Vec::new();

        building(&mut stdout, 1, 2, &target()).unwrap();

        let stdout = String::from_utf8(stdout).unwrap();
        assert!(stdout.contains("[2/2] building convert2:latest"));
        assert!(stdout.ends_with("(fingerprint -)\n"));
    }
}
