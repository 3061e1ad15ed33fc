use git2::{ErrorCode, Repository};
use log::info;
use std::path::PathBuf;

use crate::{
    errors::{BuildError, Result},
    models::HeadInfo,
    services::VersionControl,
};

/// Reads branch and commit of the git repository containing `root`.
///
/// The repository is only opened once metadata is asked for, so a missing
/// repository surfaces after the asset checks.
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    pub fn new<P: Into<PathBuf>>(root: P) -> GitRepository {
        GitRepository { root: root.into() }
    }

    fn open(&self) -> Result<Repository> {
        let repo = Repository::discover(&self.root).map_err(|err| self.metadata_error(&err))?;
        info!("opened git repository {:?}", repo.path());

        Ok(repo)
    }

    fn metadata_error(&self, err: &git2::Error) -> BuildError {
        let reason = match err.code() {
            ErrorCode::UnbornBranch => "the repository has no commits yet".to_owned(),
            ErrorCode::NotFound if err.class() == git2::ErrorClass::Repository => {
                "not a git repository".to_owned()
            }
            _ => err.message().to_owned(),
        };

        BuildError::VcsMetadata {
            root: self.root.clone(),
            reason,
        }
    }

    fn invalid_utf8(&self, what: &str) -> BuildError {
        BuildError::VcsMetadata {
            root: self.root.clone(),
            reason: format!("{} is not valid utf-8", what),
        }
    }
}

impl VersionControl for GitRepository {
    fn head_info(&self) -> Result<HeadInfo> {
        let repo = self.open()?;
        let head = repo.head().map_err(|err| self.metadata_error(&err))?;

        // Same answer as `git rev-parse --abbrev-ref HEAD`.
        let branch = if head.is_branch() {
            head.shorthand()
                .map(str::to_owned)
                .ok_or_else(|| self.invalid_utf8("branch name"))?
        } else {
            "HEAD".to_owned()
        };

        let commit = head
            .peel_to_commit()
            .map_err(|err| self.metadata_error(&err))?;
        let short_id = commit
            .as_object()
            .short_id()
            .map_err(|err| self.metadata_error(&err))?;
        let commit = short_id
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.invalid_utf8("abbreviated commit id"))?;

        Ok(HeadInfo { branch, commit })
    }
}
