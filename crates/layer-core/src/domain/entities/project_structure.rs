use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{error::DomainError, value_objects::Bucket};

/// Rendered service tree ready for materialization.
///
/// Entries are relative to `root` and are written in insertion order, so
/// directories must be added before the files they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    pub root: PathBuf,
    pub entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String, origin: FileOrigin) {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content,
            origin,
        }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: String, origin: FileOrigin) -> Self {
        self.add_file(path, content, origin);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::EmptyStructure {
                root: self.root.display().to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();

            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.display().to_string(),
                });
            }

            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.display().to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            FsEntry::Directory(d) => Some(d),
            _ => None,
        })
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&FileToWrite> {
        let path = path.as_ref();
        self.files().find(|f| f.path == path)
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

/// Where a file came from, for error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Bucket(Bucket),
    Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
    pub origin: FileOrigin,
}

impl FileToWrite {
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Bucket name for generated sources; `None` for manifests.
    pub fn bucket(&self) -> Option<Bucket> {
        match self.origin {
            FileOrigin::Bucket(b) => Some(b),
            FileOrigin::Manifest => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_counts_entries() {
        let structure = ProjectStructure::new("/tmp/out/auth-service")
            .with_directory("routes")
            .with_file(
                "routes/routes.go",
                "package routes\n".into(),
                FileOrigin::Bucket(Bucket::Routes),
            )
            .with_file("go.mod", "module auth-service\n".into(), FileOrigin::Manifest);

        assert_eq!(structure.entry_count(), 3);
        assert_eq!(structure.file_count(), 2);
        assert_eq!(structure.directories().count(), 1);
        assert_eq!(
            structure.file("routes/routes.go").and_then(FileToWrite::bucket),
            Some(Bucket::Routes)
        );
    }

    #[test]
    fn rejects_duplicate_paths() {
        let structure = ProjectStructure::new("/tmp/out")
            .with_file("main.go", String::new(), FileOrigin::Bucket(Bucket::Main))
            .with_file("main.go", String::new(), FileOrigin::Bucket(Bucket::Main));

        assert!(matches!(
            structure.validate(),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn rejects_absolute_and_empty() {
        assert!(ProjectStructure::new("/tmp/out").validate().is_err());

        let absolute = ProjectStructure::new("/tmp/out").with_directory("/etc");
        assert!(matches!(
            absolute.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }
}
