use log::{debug, info};
use std::num::NonZeroU32;

use crate::{
    errors::{BuildError, Result},
    models::{BuildArgs, HeadInfo, Numpf},
    services::VersionControl,
};

pub const NUMPF_VAR: &str = "NUMPF";

/// Parses the `NUMPF` override, falling back to the default when unset.
pub fn parse_numpf(value: Option<&str>) -> Result<Numpf> {
    let value = match value {
        Some(value) => value,
        None => return Ok(Numpf::default()),
    };

    let invalid = |reason: &str| BuildError::InvalidConfig {
        name: NUMPF_VAR.into(),
        value: value.into(),
        reason: reason.into(),
    };

    let numpf = value
        .parse::<u32>()
        .map_err(|_| invalid("expected a positive integer"))?;
    let numpf = NonZeroU32::new(numpf).ok_or_else(|| invalid("must be greater than 0"))?;

    Ok(Numpf(numpf))
}

pub fn resolve(vcs: &dyn VersionControl, numpf: Option<&str>) -> Result<BuildArgs> {
    let numpf = parse_numpf(numpf)?;
    let HeadInfo { branch, commit } = vcs.head_info()?;
    info!("resolved branch {:?} at commit {:?}", branch, commit);
    debug!("resolved NUMPF={}", numpf);

    Ok(BuildArgs {
        commit,
        branch,
        numpf,
    })
}
