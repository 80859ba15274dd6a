use std::collections::BTreeSet;

/// What the indexer's context cache knows about one file.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub imports: BTreeSet<String>,
    /// Dominant frameworks, most dominant first.
    pub frameworks: Vec<String>,
    pub language: Option<String>,
    /// Functions/classes defined in the file.
    pub functions: Vec<String>,
}

/// Read access to the indexer's per-file context cache.
///
/// Lookups are expected to be cheap and synchronous; the cache is
/// populated out of band by the corpus indexer.
pub trait FileContextSource: Send + Sync {
    fn context_for(&self, file_path: &str) -> Option<FileContext>;
}

/// Map-backed context source. Useful in tests and for embedders that
/// preload context instead of sharing the indexer's cache.
#[derive(Debug, Default)]
pub struct MemoryContextSource {
    files: std::collections::HashMap<String, FileContext>,
}

impl MemoryContextSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_path: impl Into<String>, context: FileContext) {
        self.files.insert(file_path.into(), context);
    }
}

impl FileContextSource for MemoryContextSource {
    fn context_for(&self, file_path: &str) -> Option<FileContext> {
        self.files.get(file_path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_inserted_context() {
        let mut source = MemoryContextSource::new();
        source.insert(
            "app/models.py",
            FileContext {
                imports: BTreeSet::from(["django.db".to_string()]),
                frameworks: vec!["django".to_string()],
                language: Some("python".to_string()),
                functions: vec![],
            },
        );

        let context = source.context_for("app/models.py").unwrap();
        assert!(context.imports.contains("django.db"));
        assert!(source.context_for("other.py").is_none());
    }
}
