//! Resource discovery.
//!
//! A [`Resolver`] maps a glob-like pattern to the set of matching resource keys, each paired with a
//! [`Loader`] that fetches the raw bytes on demand. The pipeline never learns where bytes come
//! from: the demo database compiled into the binary, a directory on disk, or a test fixture.

use std::collections::BTreeMap;
use std::rc::Rc;

use futures_util::future::{self, FutureExt, LocalBoxFuture};
use glob::{MatchOptions, Pattern};
use rust_embed::RustEmbed;

use super::error::{PipelineError, PipelineResult};

/// Deferred read of one resource. Cheap to clone; each call starts a fresh read.
pub type Loader = Rc<dyn Fn() -> LocalBoxFuture<'static, PipelineResult<Vec<u8>>>>;

pub trait Resolver {
    /// Every key matching `pattern`, in sorted order.
    fn resolve(&self, pattern: &str) -> BTreeMap<String, Loader>;
}

/// Wildcards never cross a `/`, so `retrieval/*.json` stays out of nested folders.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compile a key pattern. An invalid pattern matches nothing.
pub fn key_pattern(pattern: &str) -> Option<Pattern> {
    Pattern::new(pattern)
        .map_err(|err| tracing::warn!(pattern, %err, "invalid resource pattern"))
        .ok()
}

/// Whether `key` matches `pattern` (`*`, `?` and `[...]` classes, per path segment).
pub fn key_matches(pattern: &Pattern, key: &str) -> bool {
    pattern.matches_with(key, MATCH_OPTIONS)
}

#[derive(RustEmbed)]
#[folder = "database"]
struct DemoDatabase;

/// The demo case database bundled with the crate (`ui/database/`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResolver;

impl Resolver for EmbeddedResolver {
    fn resolve(&self, pattern: &str) -> BTreeMap<String, Loader> {
        let Some(pattern) = key_pattern(pattern) else {
            return BTreeMap::new();
        };
        DemoDatabase::iter()
            .filter(|key| key_matches(&pattern, key))
            .map(|key| {
                let owned = key.into_owned();
                let name = owned.clone();
                let loader: Loader = Rc::new(move || {
                    let result = DemoDatabase::get(&name)
                        .map(|file| file.data.into_owned())
                        .ok_or_else(|| PipelineError::MissingResource(name.clone()));
                    future::ready(result).boxed_local()
                });
                (owned, loader)
            })
            .collect()
    }
}

/// In-memory resources. Mostly used by tests and by callers that already hold the bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    entries: BTreeMap<String, Rc<[u8]>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), bytes.into().into());
    }

    pub fn with(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(key, bytes);
        self
    }
}

impl Resolver for MemoryResolver {
    fn resolve(&self, pattern: &str) -> BTreeMap<String, Loader> {
        let Some(pattern) = key_pattern(pattern) else {
            return BTreeMap::new();
        };
        self.entries
            .iter()
            .filter(|(key, _)| key_matches(&pattern, key))
            .map(|(key, bytes)| {
                let bytes = bytes.clone();
                let loader: Loader =
                    Rc::new(move || future::ready(Ok(bytes.to_vec())).boxed_local());
                (key.clone(), loader)
            })
            .collect()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use directory::DirectoryResolver;

#[cfg(not(target_arch = "wasm32"))]
mod directory {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use futures_util::future::FutureExt;
    use glob::Pattern;

    use super::{Loader, Resolver, MATCH_OPTIONS};
    use crate::core::error::PipelineError;

    /// A case database laid out on disk. Keys are paths relative to `root` with `/` separators.
    #[derive(Debug, Clone)]
    pub struct DirectoryResolver {
        root: PathBuf,
    }

    impl DirectoryResolver {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        /// Files under `root` matching `pattern`, keyed by their `/`-joined relative path.
        fn matching_files(&self, pattern: &str) -> Vec<(String, PathBuf)> {
            let root = Pattern::escape(&self.root.to_string_lossy());
            let full = format!("{}/{}", root.trim_end_matches('/'), pattern);
            let paths = match glob::glob_with(&full, MATCH_OPTIONS) {
                Ok(paths) => paths,
                Err(err) => {
                    tracing::warn!(pattern, %err, "invalid resource pattern");
                    return Vec::new();
                }
            };
            paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(err) => {
                        tracing::warn!(%err, "unable to read data directory entry");
                        None
                    }
                })
                .filter(|path| path.is_file())
                .filter_map(|path| {
                    let key = path
                        .strip_prefix(&self.root)
                        .ok()?
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    Some((key, path))
                })
                .collect()
        }
    }

    impl Resolver for DirectoryResolver {
        fn resolve(&self, pattern: &str) -> BTreeMap<String, Loader> {
            self.matching_files(pattern)
                .into_iter()
                .map(|(key, path)| {
                    let name = key.clone();
                    let loader: Loader = Rc::new(move || {
                        let path = path.clone();
                        let name = name.clone();
                        async move {
                            tokio::fs::read(&path)
                                .await
                                .map_err(|source| PipelineError::Read { key: name, source })
                        }
                        .boxed_local()
                    });
                    (key, loader)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    #[cfg(not(target_arch = "wasm32"))]
    use tempfile::TempDir;

    fn matches(pattern: &str, key: &str) -> bool {
        key_matches(&key_pattern(pattern).unwrap(), key)
    }

    #[test]
    fn key_wildcards_stay_within_a_segment() {
        assert!(matches("manifest*.json", "manifest.json"));
        assert!(matches("manifest*.json", "manifest_v2.json"));
        assert!(!matches("manifest*.json", "retrieval/manifest.json"));
        assert!(matches("retrieval/*.json", "retrieval/PT-001.json"));
        assert!(!matches("retrieval/*.json", "retrieval/PT-001.json.bak"));
        assert!(!matches("retrieval/*.json", "retrieval/old/PT-001.json"));
        assert!(matches("details/?.json", "details/a.json"));
        assert!(!matches("details/?.json", "details/ab.json"));
    }

    #[test]
    fn invalid_pattern_resolves_nothing() {
        assert!(key_pattern("details/[.json").is_none());
        let resolver = MemoryResolver::new().with("details/a.json", b"{}".to_vec());
        assert!(resolver.resolve("details/[.json").is_empty());
    }

    #[test]
    fn memory_resolver_filters_and_loads() {
        let resolver = MemoryResolver::new()
            .with("details/a.json", b"{}".to_vec())
            .with("details/b.json", b"[]".to_vec())
            .with("manifest.json", b"[]".to_vec());
        let matched = resolver.resolve("details/*.json");
        let keys: Vec<_> = matched.keys().cloned().collect();
        assert_eq!(keys, vec!["details/a.json", "details/b.json"]);

        let bytes = block_on((matched["details/b.json"])()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn embedded_database_ships_a_manifest() {
        let manifests = EmbeddedResolver.resolve("manifest*.json");
        assert_eq!(manifests.len(), 1);
        let (_, loader) = manifests.into_iter().next().unwrap();
        let bytes = block_on(loader()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn directory_resolver_walks_subdirectories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let details = root.join("details");
        std::fs::create_dir_all(details.join("archive")).unwrap();
        std::fs::write(root.join("manifest.json"), b"[]").unwrap();
        std::fs::write(details.join("c1.json"), br#"{"leads":{}}"#).unwrap();
        std::fs::write(details.join("archive").join("c0.json"), b"{}").unwrap();

        let resolver = DirectoryResolver::new(root);
        let matched = resolver.resolve("details/*.json");
        assert_eq!(matched.keys().collect::<Vec<_>>(), vec!["details/c1.json"]);
        let bytes = (matched["details/c1.json"])().await.unwrap();
        assert_eq!(bytes, br#"{"leads":{}}"#);

        let nested = resolver.resolve("details/*/*.json");
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["details/archive/c0.json"]);

        std::fs::remove_file(root.join("manifest.json")).unwrap();
        assert!(resolver.resolve("manifest*.json").is_empty());
    }
}
