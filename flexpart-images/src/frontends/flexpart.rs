use log::debug;
use std::{
    collections::BTreeMap as Map,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{BuildError, Result},
    hasher::DigestHasher,
    models::{BuildArgs, BuildTarget, ImageRef},
    services::BuildFrontend,
};

pub const FLEXPART_DOCKERFILE: &str = "docker/Dockerfile.arm64";
pub const CONVERT2_DOCKERFILE: &str = "docker/Dockerfile.convert2";
const BUILD_CONTEXT: &str = "docker";

pub const FLEXPART_IMAGE: &str = "flexpart-v10.4-arm64";
pub const CONVERT2_IMAGE: &str = "convert2";
const TAG: &str = "latest";

const LABEL_REVISION: &str = "org.opencontainers.image.revision";
const LABEL_BRANCH: &str = "io.flexpart.images.branch";
pub const LABEL_FINGERPRINT: &str = "io.flexpart.images.fingerprint";

/// Files FLEXPART copies out of its image before a run.
const STATIC_OPTION_FILES: [&str; 3] = ["IGBP_int1.dat", "sfcdata.t", "sfcdepo.t"];

/// The FLEXPART model image followed by the flex_extract `convert2` image.
pub struct FlexpartFrontend;

impl FlexpartFrontend {
    pub fn new() -> FlexpartFrontend {
        FlexpartFrontend
    }
}

impl BuildFrontend for FlexpartFrontend {
    fn required_assets(&self) -> Vec<PathBuf> {
        vec![FLEXPART_DOCKERFILE.into(), CONVERT2_DOCKERFILE.into()]
    }

    fn targets(&self, root: &Path, args: &BuildArgs) -> Result<Vec<BuildTarget>> {
        let mut convert2_args = Map::new();
        convert2_args.insert("COMMIT".to_owned(), args.commit.clone());
        convert2_args.insert("BRANCH".to_owned(), args.branch.clone());

        // NUMPF only matters to the FLEXPART compile.
        let mut flexpart_args = convert2_args.clone();
        flexpart_args.insert("NUMPF".to_owned(), args.numpf.to_string());

        Ok(vec![
            build_target(
                root,
                ImageRef::new(FLEXPART_IMAGE, TAG),
                FLEXPART_DOCKERFILE,
                flexpart_args,
                args,
            )?,
            build_target(
                root,
                ImageRef::new(CONVERT2_IMAGE, TAG),
                CONVERT2_DOCKERFILE,
                convert2_args,
                args,
            )?,
        ])
    }

    fn usage(&self, program: &str, target: &BuildTarget) -> Vec<String> {
        let image = target.image.to_string();

        match target.image.name.as_str() {
            FLEXPART_IMAGE => {
                let mut lines = STATIC_OPTION_FILES
                    .iter()
                    .map(|file| {
                        format!(
                            "{} run --rm --entrypoint /bin/cat {} /options/{} > workspace/{}",
                            program, image, file, file
                        )
                    })
                    .collect::<Vec<_>>();

                lines.push(format!(
                    "{} run --rm \
                     -v \"$PWD/workspace:/options:rw\" \
                     -v \"$PWD/workspace/output:/output:rw\" \
                     -v \"$PWD/workspace/meteo:/inputs:rw\" \
                     -v \"$PWD/workspace/pathnames:/pathnames:ro\" \
                     {}",
                    program, image
                ));
                lines
            }
            CONVERT2_IMAGE => vec![format!(
                "{} run --rm \
                 -v \"$PWD/workspace/meteo/flex_extract_workspace/input:/workspace/input:rw\" \
                 -v \"$PWD/workspace/meteo/preprocessed:/workspace/output:rw\" \
                 -v \"$HOME/.cdsapirc:/keys/cdsapirc:ro\" \
                 -e FLEXEXTRACT_CDSAPI_PATH=/keys/cdsapirc \
                 {} \
                 --start-date=YYYYMMDD --end-date=YYYYMMDD --area=N/W/S/E --grid=0.5 \
                 --levelist=1/to/137 --basetime=0 --dtime=1 --prefix=EC \
                 --input-dir=/workspace/input --output-dir=/workspace/output \
                 --request=0 --rrint=1 --date-chunk=3",
                program, image
            )],
            _ => Vec::new(),
        }
    }
}

fn build_target(
    root: &Path,
    image: ImageRef,
    dockerfile: &str,
    build_args: Map<String, String>,
    args: &BuildArgs,
) -> Result<BuildTarget> {
    let dockerfile = root.join(dockerfile);
    let contents = fs::read(&dockerfile).map_err(|_| BuildError::MissingAsset {
        path: dockerfile.clone(),
    })?;

    let mut hasher = blake3::Hasher::new();
    hasher.input(&image);
    hasher.input(&build_args);
    hasher.update(&contents);
    let fingerprint = hasher.finalize().to_hex().to_string();
    debug!("{} fingerprint {}", image, fingerprint);

    let mut labels = Map::new();
    labels.insert(LABEL_REVISION.to_owned(), args.commit.clone());
    labels.insert(LABEL_BRANCH.to_owned(), args.branch.clone());
    labels.insert(LABEL_FINGERPRINT.to_owned(), fingerprint);

    Ok(BuildTarget {
        image,
        dockerfile,
        context: root.join(BUILD_CONTEXT),
        build_args,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Numpf;
    use std::num::NonZeroU32;
    use tempfile::{tempdir, TempDir};

    fn repo() -> TempDir {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("docker")).unwrap();
        fs::write(root.path().join(FLEXPART_DOCKERFILE), "FROM debian\nARG NUMPF\n").unwrap();
        fs::write(root.path().join(CONVERT2_DOCKERFILE), "FROM python\n").unwrap();
        root
    }

    fn args(numpf: u32) -> BuildArgs {
        BuildArgs {
            commit: "abc1234".into(),
            branch: "main".into(),
            numpf: Numpf(NonZeroU32::new(numpf).unwrap()),
        }
    }

    #[test]
    fn flexpart_is_built_before_convert2() {
        let root = repo();

        let targets = FlexpartFrontend::new().targets(root.path(), &args(3)).unwrap();

        let images = targets
            .iter()
            .map(|target| target.image.to_string())
            .collect::<Vec<_>>();
        assert_eq!(images, vec!["flexpart-v10.4-arm64:latest", "convert2:latest"]);
        assert_eq!(targets[0].dockerfile, root.path().join(FLEXPART_DOCKERFILE));
        assert_eq!(targets[1].context, root.path().join("docker"));
    }

    #[test]
    fn only_flexpart_receives_numpf() {
        let root = repo();

        let targets = FlexpartFrontend::new().targets(root.path(), &args(1)).unwrap();

        assert_eq!(targets[0].build_args.get("NUMPF").map(String::as_str), Some("1"));
        assert_eq!(targets[0].build_args.get("COMMIT").map(String::as_str), Some("abc1234"));
        assert_eq!(targets[0].build_args.get("BRANCH").map(String::as_str), Some("main"));
        assert_eq!(targets[1].build_args.get("NUMPF"), None);
        assert_eq!(targets[1].build_args.get("COMMIT").map(String::as_str), Some("abc1234"));
    }

    #[test]
    fn fingerprint_follows_numpf_and_dockerfile() {
        let root = repo();
        let frontend = FlexpartFrontend::new();
        let fingerprint = |targets: &[BuildTarget]| targets[0].labels[LABEL_FINGERPRINT].clone();

        let first = fingerprint(&frontend.targets(root.path(), &args(3)).unwrap());
        let again = fingerprint(&frontend.targets(root.path(), &args(3)).unwrap());
        let other_numpf = fingerprint(&frontend.targets(root.path(), &args(1)).unwrap());
        fs::write(root.path().join(FLEXPART_DOCKERFILE), "FROM alpine\n").unwrap();
        let other_file = fingerprint(&frontend.targets(root.path(), &args(3)).unwrap());

        assert_eq!(first, again);
        assert_ne!(first, other_numpf);
        assert_ne!(first, other_file);
    }

    #[test]
    fn labels_carry_revision_and_branch() {
        let root = repo();

        let targets = FlexpartFrontend::new().targets(root.path(), &args(3)).unwrap();

        for target in targets {
            assert_eq!(target.labels[LABEL_REVISION], "abc1234");
            assert_eq!(target.labels[LABEL_BRANCH], "main");
        }
    }

    #[test]
    fn usage_uses_the_engine_program() {
        let root = repo();
        let frontend = FlexpartFrontend::new();
        let targets = frontend.targets(root.path(), &args(3)).unwrap();

        let flexpart = frontend.usage("podman", &targets[0]);
        let convert2 = frontend.usage("podman", &targets[1]);

        assert_eq!(flexpart.len(), STATIC_OPTION_FILES.len() + 1);
        assert!(flexpart.iter().all(|line| line.starts_with("podman run --rm")));
        assert!(flexpart[3].ends_with("flexpart-v10.4-arm64:latest"));
        assert!(convert2[0].contains("convert2:latest --start-date=YYYYMMDD"));
    }
}
