//! Category folder layout and file placement.

use crate::category::Category;
use crate::config::DuplicatePolicy;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while filing a document.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Creating the folder layout failed.
    #[error("Failed to prepare folder {path}: {source}")]
    Prepare {
        /// Folder that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The source path has no file name component.
    #[error("Source path {0} has no file name")]
    InvalidSource(PathBuf),
    /// The category is not one this agent manages.
    #[error("No folder configured for category {0}")]
    UnknownCategory(Category),
    /// A file with the same name already exists and the policy forbids replacing it.
    #[error("Destination {0} already exists")]
    Duplicate(PathBuf),
    /// Renaming or copying the file failed.
    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        /// Original location.
        from: PathBuf,
        /// Intended destination.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Keeps one folder per category under a base folder and moves files into them.
#[derive(Debug, Clone)]
pub struct OrganizationAgent {
    base_folder: PathBuf,
    categories: Vec<Category>,
    duplicate_policy: DuplicatePolicy,
}

impl OrganizationAgent {
    /// Create the base folder and every category folder. Safe to call on an existing layout.
    pub fn new(
        base_folder: impl Into<PathBuf>,
        categories: Vec<Category>,
        duplicate_policy: DuplicatePolicy,
    ) -> Result<Self, OrganizeError> {
        let agent = Self {
            base_folder: base_folder.into(),
            categories,
            duplicate_policy,
        };
        agent.prepare_folders()?;
        Ok(agent)
    }

    fn prepare_folders(&self) -> Result<(), OrganizeError> {
        create_dir(&self.base_folder)?;
        for category in &self.categories {
            create_dir(&self.category_folder(*category))?;
        }
        tracing::debug!(
            base = %self.base_folder.display(),
            categories = self.categories.len(),
            "Category folders ready"
        );
        Ok(())
    }

    /// Root under which category folders live.
    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    /// Folder that holds documents of `category`.
    pub fn category_folder(&self, category: Category) -> PathBuf {
        self.base_folder.join(category.label())
    }

    /// Move `source` into the folder for `category`, returning the new path.
    pub async fn move_file(
        &self,
        source: &Path,
        category: Category,
    ) -> Result<PathBuf, OrganizeError> {
        if !self.categories.contains(&category) {
            return Err(OrganizeError::UnknownCategory(category));
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| OrganizeError::InvalidSource(source.to_path_buf()))?;
        let destination = self.category_folder(category).join(file_name);

        if self.duplicate_policy == DuplicatePolicy::Reject
            && tokio::fs::try_exists(&destination).await.unwrap_or(false)
        {
            return Err(OrganizeError::Duplicate(destination));
        }

        move_path(source, &destination)
            .await
            .map_err(|source_error| OrganizeError::Move {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: source_error,
            })?;

        tracing::debug!(
            from = %source.display(),
            to = %destination.display(),
            "Moved document"
        );
        Ok(destination)
    }
}

pub(crate) fn create_dir(path: &Path) -> Result<(), OrganizeError> {
    std::fs::create_dir_all(path).map_err(|source| OrganizeError::Prepare {
        path: path.to_path_buf(),
        source,
    })
}

/// Rename, falling back to copy-and-delete when the folders sit on different filesystems.
async fn move_path(from: &Path, to: &Path) -> io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            tokio::fs::copy(from, to).await?;
            tokio::fs::remove_file(from).await
        }
        Err(error) => Err(error),
    }
}
