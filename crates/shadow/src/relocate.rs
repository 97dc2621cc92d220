use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::preload::preload_references;
use crate::unit::UnitHost;

/// Name of the subdirectory holding the files the running process is bound to.
pub const SHADOW_DIR_NAME: &str = "_shadow";

/// Files to relocate out of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationPlan {
    original_directory: PathBuf,
    shadow_directory: PathBuf,
    files: Vec<PathBuf>,
}

impl RelocationPlan {
    /// Plan relocation of the directory containing `program`.
    pub fn for_program(program: &Path) -> io::Result<Self> {
        let directory = program.parent().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' has no parent directory", program.display()),
            )
        })?;
        Self::for_directory(directory)
    }

    /// Plan relocation of the files directly inside `directory`.
    ///
    /// Symlinks to files are listed; dangling links and subdirectories,
    /// including an existing shadow directory, are not.
    pub fn for_directory(directory: &Path) -> io::Result<Self> {
        let original_directory = fs::canonicalize(directory)?;
        let shadow_directory = original_directory.join(SHADOW_DIR_NAME);

        let mut files = Vec::new();
        for entry in fs::read_dir(&original_directory)? {
            let entry = entry?;
            if entry.path().is_file() {
                files.push(PathBuf::from(entry.file_name()));
            }
        }
        files.sort();

        Ok(Self {
            original_directory,
            shadow_directory,
            files,
        })
    }

    pub fn original_directory(&self) -> &Path {
        &self.original_directory
    }

    pub fn shadow_directory(&self) -> &Path {
        &self.shadow_directory
    }

    /// File names, relative to both directories.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Clear the shadow directory, move every planned file into it, then copy
    /// each one back.
    ///
    /// There is no rollback: a failure part way leaves some files moved and
    /// the error is returned as-is.
    pub fn execute(&self) -> io::Result<()> {
        if self.shadow_directory.exists() {
            tracing::debug!(
                path = %self.shadow_directory.display(),
                "removing stale shadow directory"
            );
            fs::remove_dir_all(&self.shadow_directory)?;
        }
        fs::create_dir(&self.shadow_directory)?;

        for name in &self.files {
            fs::rename(
                self.original_directory.join(name),
                self.shadow_directory.join(name),
            )?;
        }

        for name in &self.files {
            fs::copy(
                self.shadow_directory.join(name),
                self.original_directory.join(name),
            )?;
        }

        tracing::info!(
            directory = %self.original_directory.display(),
            files = self.files.len(),
            "relocated binaries to shadow directory"
        );
        Ok(())
    }
}

/// Preload the program's code units, then relocate its own directory.
///
/// Only one instance of a program may relocate at a time; concurrent runs
/// race on the shadow directory.
pub fn relocate<H>(host: &mut H) -> anyhow::Result<()>
where
    H: UnitHost + ?Sized,
{
    let program = host.program_path()?;
    preload_references(host)?;
    RelocationPlan::for_program(&program)?.execute()?;
    Ok(())
}

/// Preload the program's code units, then relocate `directory` instead of
/// the program's own directory.
pub fn relocate_directory<H>(host: &mut H, directory: &Path) -> anyhow::Result<()>
where
    H: UnitHost + ?Sized,
{
    preload_references(host)?;
    RelocationPlan::for_directory(directory)?.execute()?;
    Ok(())
}
