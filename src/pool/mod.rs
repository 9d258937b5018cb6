//! Fixed in-memory pool of promotable ads
//!
//! The pool is built once at startup and never mutated afterwards. Each
//! entry is a distinct *slot*: two entries with identical content are still
//! sampled independently.
//!
//! A pool can come from the built-in catalog or from a catalog file:
//!
//! - `*.json` - a JSON array of ads in wire format
//! - `*.toml` - `[[ads]]` tables using the same keys

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::models::Ad;

/// Errors that can occur while loading a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON
    #[error("Invalid JSON catalog {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Catalog file is not valid TOML
    #[error("Invalid TOML catalog {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Extension is neither json nor toml
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    ads: Vec<Ad>,
}

/// Ordered, read-only collection of ads
#[derive(Debug, Clone, Default)]
pub struct AdPool {
    ads: Arc<[Ad]>,
}

impl AdPool {
    /// Create a pool from an ordered list of ads
    pub fn new(ads: Vec<Ad>) -> Self {
        Self { ads: ads.into() }
    }

    /// The catalog shipped with the marketing site
    pub fn builtin() -> Self {
        Self::new(vec![
            Ad::new(
                "ChatGPT活用講座",
                "初心者からはじめる 2時間のオンラインセミナー",
                "学ぶか学ばないかで圧倒的な差がつきます！",
                "参加無料",
                "#4ECDC4",
            )
            .with_instructor("講師: 七星恵一"),
            Ad::new(
                "WEBデザイン5",
                "日間無料チャレンジ",
                "5日間を通してWebデザインの基礎・基本・デザイン制作を習得",
                "開く",
                "#FF6B6B",
            )
            .with_company("デジハリ・オンライン塾"),
            Ad::new(
                "プログラミング学習",
                "Laravel・Python・大人専用サービス",
                "プログラミング教育で転職・就職・副業・在宅ワーク！",
                "詳細",
                "#4ECDC4",
            )
            .with_company("ポテパンキャンプ"),
            Ad::new(
                "AI・機械学習講座",
                "未経験から始めるAIエンジニア",
                "Pythonで学ぶ機械学習とディープラーニング",
                "無料体験",
                "#95E1D3",
            )
            .with_company("テックアカデミー"),
        ])
    }

    /// Load a pool from a JSON or TOML catalog file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path_str.clone(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let ads = match extension.as_str() {
            "json" => serde_json::from_str::<Vec<Ad>>(&content).map_err(|source| {
                CatalogError::Json {
                    path: path_str.clone(),
                    source,
                }
            })?,
            "toml" => {
                toml::from_str::<TomlCatalog>(&content)
                    .map_err(|source| CatalogError::Toml {
                        path: path_str.clone(),
                        source,
                    })?
                    .ads
            }
            _ => return Err(CatalogError::UnsupportedFormat(path_str)),
        };

        tracing::info!(path = %path_str, ads = ads.len(), "Loaded ad catalog");
        Ok(Self::new(ads))
    }

    /// Number of slots in the pool
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    /// Whether the pool has no slots
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    /// Ad stored in a given slot
    pub fn get(&self, slot: usize) -> Option<&Ad> {
        self.ads.get(slot)
    }

    /// Iterate ads in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Ad> {
        self.ads.iter()
    }

    /// Borrow the slots as a slice
    pub fn as_slice(&self) -> &[Ad] {
        &self.ads
    }
}

impl From<Vec<Ad>> for AdPool {
    fn from(ads: Vec<Ad>) -> Self {
        Self::new(ads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let pool = AdPool::builtin();

        assert_eq!(pool.len(), 4);
        assert!(pool.get(0).unwrap().instructor.is_some());
        assert!(pool.iter().skip(1).all(|ad| ad.company.is_some()));
    }

    #[test]
    fn test_empty_pool() {
        let pool = AdPool::default();
        assert!(pool.is_empty());
        assert!(pool.get(0).is_none());
    }

    #[test]
    fn test_duplicate_content_keeps_separate_slots() {
        let ad = Ad::new("Same", "s", "d", "b", "#fff");
        let pool = AdPool::new(vec![ad.clone(), ad]);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0), pool.get(1));
    }

    #[test]
    fn test_load_json_catalog() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r##"[{{"title":"A","subtitle":"s","description":"d","buttonText":"b","bgColor":"#111"}}]"##
        )
        .unwrap();

        let pool = AdPool::from_file(file.path()).unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(0).unwrap().title, "A");
    }

    #[test]
    fn test_load_toml_catalog() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r##"
[[ads]]
title = "A"
subtitle = "s"
description = "d"
company = "Acme"
buttonText = "b"
bgColor = "#111"

[[ads]]
title = "B"
subtitle = "s"
description = "d"
buttonText = "b"
bgColor = "#222"
"##
        )
        .unwrap();

        let pool = AdPool::from_file(file.path()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap().company.as_deref(), Some("Acme"));
        assert_eq!(pool.get(1).unwrap().title, "B");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = AdPool::from_file(file.path());
        assert!(matches!(result, Err(CatalogError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AdPool::from_file(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_load_error_names_the_file() {
        let result = AdPool::from_file(Path::new("/nonexistent/catalog.toml"));
        match result {
            Err(CatalogError::Io { path, .. }) => assert_eq!(path, "/nonexistent/catalog.toml"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = AdPool::from_file(file.path());
        assert!(matches!(result, Err(CatalogError::Json { .. })));
    }
}
