use crate::domain::{syntax::SourceFile, value_objects::Bucket};

/// One generated Go file: output name plus its syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub source: SourceFile,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, source: SourceFile) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// The files one bucket produced for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub bucket: Bucket,
    pub files: Vec<GeneratedFile>,
}

impl Package {
    pub fn new(bucket: Bucket) -> Self {
        Self {
            bucket,
            files: Vec::new(),
        }
    }

    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }
}
