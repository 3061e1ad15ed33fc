use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    errors::{BuildError, Result},
    resolver::NUMPF_VAR,
};

pub const ROOT_VAR: &str = "FLEXPART_IMAGES_ROOT";
pub const DOCKER_VAR: &str = "FLEXPART_IMAGES_DOCKER";
const DEFAULT_DOCKER: &str = "docker";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub docker: String,
    pub numpf: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_vars(|name| env::var_os(name))
    }

    fn from_vars<F>(var: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let root = var(ROOT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_root);
        let docker = unicode_var(&var, DOCKER_VAR)?.unwrap_or_else(|| DEFAULT_DOCKER.into());
        let numpf = unicode_var(&var, NUMPF_VAR)?;

        Ok(Config {
            root,
            docker,
            numpf,
        })
    }
}

fn unicode_var<F>(var: &F, name: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<OsString>,
{
    match var(name) {
        Some(value) => value
            .into_string()
            .map(Some)
            .map_err(|value| BuildError::InvalidConfig {
                name: name.into(),
                value: value.to_string_lossy().into_owned(),
                reason: "not valid unicode".into(),
            }),
        None => Ok(None),
    }
}

/// The workspace this binary was built from, independent of the caller's
/// working directory.
fn default_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars = vars
            .iter()
            .map(|(name, value)| (name.to_string(), OsString::from(value)))
            .collect::<HashMap<_, _>>();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.docker, "docker");
        assert_eq!(config.numpf, None);
        assert!(config.root.join("flexpart-images").join("Cargo.toml").is_file());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            (ROOT_VAR, "/srv/flexpart"),
            (DOCKER_VAR, "podman"),
            (NUMPF_VAR, "1"),
        ])
        .unwrap();

        assert_eq!(
            config,
            Config {
                root: PathBuf::from("/srv/flexpart"),
                docker: "podman".into(),
                numpf: Some("1".into()),
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_numpf_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let err = Config::from_vars(|name| {
            if name == NUMPF_VAR {
                Some(OsString::from_vec(vec![0x66, 0x6f, 0x80]))
            } else {
                None
            }
        })
        .unwrap_err();

        assert!(matches!(err, BuildError::InvalidConfig { ref name, .. } if name == NUMPF_VAR));
    }
}
