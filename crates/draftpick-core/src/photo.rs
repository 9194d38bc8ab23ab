// Player photo lookup.
//
// Photos are decoration: every failure path ends in the configured
// placeholder URL and is logged, never propagated to the draft.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::names::normalize_name;
use crate::config::PhotoConfig;

/// TheSportsDB's shared key for the free tier.
pub const PUBLIC_TEST_KEY: &str = "3";

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("photo request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no photo listed for {0}")]
    NotFound(String),
}

/// Maps a normalized player name to an image URL.
#[async_trait]
pub trait PhotoDirectory: Send + Sync {
    async fn lookup(&self, normalized_name: &str) -> Result<String, PhotoError>;
}

// ---------------------------------------------------------------------------
// TheSportsDB-style search endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    player: Option<Vec<SearchPlayer>>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct SearchPlayer {
    #[serde(default)]
    strCutout: Option<String>,
    #[serde(default)]
    strThumb: Option<String>,
}

/// First listed player's cutout, falling back to the thumbnail.
fn pick_image(response: SearchResponse) -> Option<String> {
    let first = response.player?.into_iter().next()?;
    let usable = |s: Option<String>| s.filter(|u| !u.trim().is_empty());
    usable(first.strCutout).or_else(|| usable(first.strThumb))
}

pub struct SportsDbDirectory {
    http: reqwest::Client,
    search_url: String,
}

impl SportsDbDirectory {
    pub fn new(config: &PhotoConfig, api_key: Option<&str>) -> Result<Self, PhotoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let key = api_key.unwrap_or(PUBLIC_TEST_KEY);
        Ok(SportsDbDirectory {
            http,
            search_url: config.base_url.replace("{key}", key),
        })
    }
}

#[async_trait]
impl PhotoDirectory for SportsDbDirectory {
    async fn lookup(&self, normalized_name: &str) -> Result<String, PhotoError> {
        let response: SearchResponse = self
            .http
            .get(&self.search_url)
            .query(&[("p", normalized_name)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        pick_image(response).ok_or_else(|| PhotoError::NotFound(normalized_name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Outcome of one resolver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoLookup {
    pub url: String,
    /// The URL is a fallback after a transport error; a later call may succeed.
    pub retry: bool,
}

/// Caching front for a `PhotoDirectory` that always yields a URL.
pub struct PhotoResolver {
    directory: Option<Arc<dyn PhotoDirectory>>,
    placeholder: String,
    cache: Mutex<HashMap<String, String>>,
}

impl PhotoResolver {
    pub fn new(directory: Arc<dyn PhotoDirectory>, placeholder: impl Into<String>) -> Self {
        PhotoResolver {
            directory: Some(directory),
            placeholder: placeholder.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A resolver that never makes a request.
    pub fn disabled(placeholder: impl Into<String>) -> Self {
        PhotoResolver {
            directory: None,
            placeholder: placeholder.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Build from config: disabled, or backed by the search endpoint.
    pub fn from_config(config: &PhotoConfig, api_key: Option<&str>) -> Self {
        if !config.enabled {
            return Self::disabled(config.placeholder.clone());
        }
        match SportsDbDirectory::new(config, api_key) {
            Ok(dir) => Self::new(Arc::new(dir), config.placeholder.clone()),
            Err(e) => {
                warn!("Photo lookup disabled: {e}");
                Self::disabled(config.placeholder.clone())
            }
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Image URL for a player, or the placeholder.
    pub async fn resolve(&self, player_name: &str) -> String {
        self.lookup(player_name).await.url
    }

    /// Like `resolve`, but also reports whether asking again could help.
    ///
    /// Hits and definite misses are cached; transport errors are not, so
    /// they come back with `retry` set.
    pub async fn lookup(&self, player_name: &str) -> PhotoLookup {
        let Some(directory) = &self.directory else {
            return self.settled_placeholder();
        };
        let key = normalize_name(player_name);
        if key.is_empty() {
            return self.settled_placeholder();
        }

        if let Some(url) = self.cache.lock().await.get(&key) {
            return PhotoLookup {
                url: url.clone(),
                retry: false,
            };
        }

        let url = match directory.lookup(&key).await {
            Ok(url) => {
                debug!("Photo for {}: {}", key, url);
                url
            }
            Err(PhotoError::NotFound(_)) => {
                debug!("No photo for {}", key);
                self.placeholder.clone()
            }
            Err(e) => {
                warn!("Photo lookup for {} failed: {}", key, e);
                return PhotoLookup {
                    url: self.placeholder.clone(),
                    retry: true,
                };
            }
        };

        self.cache.lock().await.insert(key, url.clone());
        PhotoLookup { url, retry: false }
    }

    fn settled_placeholder(&self) -> PhotoLookup {
        PhotoLookup {
            url: self.placeholder.clone(),
            retry: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PLACEHOLDER: &str = "https://img.test/placeholder.png";

    /// Answers from a fixed table; "Broken Player" simulates a timeout.
    struct MockDirectory {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PhotoDirectory for MockDirectory {
        async fn lookup(&self, normalized_name: &str) -> Result<String, PhotoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match normalized_name {
                "Patrick Mahomes" => Ok("https://img.test/mahomes.png".into()),
                "Broken Player" => {
                    // An error reqwest produces without touching the network
                    let err = reqwest::Client::new()
                        .get("not a url")
                        .build()
                        .unwrap_err();
                    Err(PhotoError::Http(err))
                }
                other => Err(PhotoError::NotFound(other.into())),
            }
        }
    }

    fn resolver() -> (PhotoResolver, Arc<MockDirectory>) {
        let mock = Arc::new(MockDirectory {
            calls: AtomicUsize::new(0),
        });
        let dir: Arc<dyn PhotoDirectory> = mock.clone();
        (PhotoResolver::new(dir, PLACEHOLDER), mock)
    }

    #[tokio::test]
    async fn resolves_normalized_name() {
        let (r, _) = resolver();
        let url = r.resolve("  Patrick   Mahomes II ").await;
        assert_eq!(url, "https://img.test/mahomes.png");
    }

    #[tokio::test]
    async fn hits_and_misses_are_cached() {
        let (r, mock) = resolver();
        r.resolve("Patrick Mahomes").await;
        r.resolve("Patrick Mahomes").await;
        assert_eq!(r.resolve("Unknown Guy").await, PLACEHOLDER);
        assert_eq!(r.resolve("Unknown Guy").await, PLACEHOLDER);
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn transport_errors_fall_back_and_retry() {
        let (r, mock) = resolver();
        assert_eq!(r.resolve("Broken Player").await, PLACEHOLDER);
        assert_eq!(r.resolve("Broken Player").await, PLACEHOLDER);
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn lookup_flags_only_transport_errors_for_retry() {
        let (r, _) = resolver();
        assert!(r.lookup("Broken Player").await.retry);
        assert!(!r.lookup("Unknown Guy").await.retry);
        let hit = r.lookup("Patrick Mahomes").await;
        assert_eq!(hit.url, "https://img.test/mahomes.png");
        assert!(!hit.retry);
        assert!(!PhotoResolver::disabled(PLACEHOLDER).lookup("X").await.retry);
    }

    #[tokio::test]
    async fn disabled_resolver_never_looks_up() {
        let r = PhotoResolver::disabled(PLACEHOLDER);
        assert_eq!(r.resolve("Patrick Mahomes").await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn blank_name_is_placeholder() {
        let (r, mock) = resolver();
        assert_eq!(r.resolve("  ").await, PLACEHOLDER);
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pick_image_prefers_cutout() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"player":[{"strCutout":"c.png","strThumb":"t.png"},{"strCutout":"other.png"}]}"#,
        )
        .unwrap();
        assert_eq!(pick_image(resp).as_deref(), Some("c.png"));
    }

    #[test]
    fn pick_image_falls_back_to_thumb() {
        let resp: SearchResponse =
            serde_json::from_str(r#"{"player":[{"strCutout":null,"strThumb":"t.png"}]}"#).unwrap();
        assert_eq!(pick_image(resp).as_deref(), Some("t.png"));
        let resp: SearchResponse =
            serde_json::from_str(r#"{"player":[{"strCutout":"","strThumb":"t.png"}]}"#).unwrap();
        assert_eq!(pick_image(resp).as_deref(), Some("t.png"));
    }

    #[test]
    fn pick_image_handles_null_player_list() {
        let resp: SearchResponse = serde_json::from_str(r#"{"player":null}"#).unwrap();
        assert!(pick_image(resp).is_none());
        let resp: SearchResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(pick_image(resp).is_none());
    }

    #[test]
    fn directory_substitutes_key() {
        let config = PhotoConfig {
            enabled: true,
            base_url: "https://api.test/{key}/search".into(),
            placeholder: PLACEHOLDER.into(),
            timeout_secs: 1,
        };
        let dir = SportsDbDirectory::new(&config, None).unwrap();
        assert_eq!(dir.search_url, "https://api.test/3/search");
        let dir = SportsDbDirectory::new(&config, Some("k9")).unwrap();
        assert_eq!(dir.search_url, "https://api.test/k9/search");
    }
}
