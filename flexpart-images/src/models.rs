use std::{
    collections::BTreeMap as Map,
    fmt,
    num::NonZeroU32,
    path::PathBuf,
};

#[derive(Clone, Debug, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, tag: T) -> ImageRef {
        ImageRef {
            name: name.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct BuildTarget {
    pub image: ImageRef,
    pub dockerfile: PathBuf,
    pub context: PathBuf,
    pub build_args: Map<String, String>,
    pub labels: Map<String, String>,
}

/// Number of precipitation fields compiled into FLEXPART.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct Numpf(pub NonZeroU32);

impl Numpf {
    pub const STANDARD: u32 = 1;
    pub const ERA5: u32 = 3;

    /// ERA5 input produced by flex_extract is the common case.
    pub const DEFAULT: Numpf = match NonZeroU32::new(Numpf::ERA5) {
        Some(numpf) => Numpf(numpf),
        None => panic!("NUMPF must be positive"),
    };

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn description(self) -> &'static str {
        match self.get() {
            Numpf::STANDARD => "standard meteorological fields",
            Numpf::ERA5 => "ERA5 extended precipitation fields",
            _ => "custom",
        }
    }
}

impl Default for Numpf {
    fn default() -> Numpf {
        Numpf::DEFAULT
    }
}

impl fmt::Display for Numpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where `HEAD` of the source repository points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadInfo {
    /// Branch name, `HEAD` when detached.
    pub branch: String,
    /// Abbreviated commit id.
    pub commit: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildArgs {
    pub commit: String,
    pub branch: String,
    pub numpf: Numpf,
}

#[derive(Clone, Debug)]
pub struct BuildResult {
    pub target: BuildTarget,
    pub succeeded: bool,
    pub exit_code: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Init,
    Verifying,
    Resolving,
    Building(usize),
    Done,
    FailMissingAsset,
    FailConfig,
    FailBuild(usize),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        match self {
            Stage::Done | Stage::FailMissingAsset | Stage::FailConfig | Stage::FailBuild(_) => true,
            Stage::Init | Stage::Verifying | Stage::Resolving | Stage::Building(_) => false,
        }
    }
}
