use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

use super::LyricsProvider;
use crate::core::extract::LyricsExtractor;
use crate::core::fetch::DocumentFetcher;
use crate::core::host::LockedTrack;
use crate::core::text::{drop_bracketed_suffix, url_key};
use crate::error::FetchError;

pub const DEFAULT_LYRICS_SITE: &str = "https://www.azlyrics.com";

/// Scrapes `<site>/lyrics/<artist>/<title>.html`.
///
/// When a page is missing, bracketed suffixes such as "(Remastered)" are
/// dropped from the title one at a time and the lookup is repeated.
pub struct WebProvider {
    site: Url,
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Box<dyn LyricsExtractor>,
}

impl WebProvider {
    pub fn new(
        site: &str,
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: Box<dyn LyricsExtractor>,
    ) -> Result<Self, FetchError> {
        let site = Url::parse(site).map_err(|e| FetchError::InvalidUrl {
            url: site.to_string(),
            reason: e.to_string(),
        })?;
        if site.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: site.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self {
            site,
            fetcher,
            extractor,
        })
    }

    /// Page URL for already-normalized `artist` and `title` keys.
    pub fn page_url(&self, artist: &str, title: &str) -> String {
        let page = format!("{}.html", title);
        let mut url = self.site.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["lyrics", artist, page.as_str()]);
        }
        url.to_string()
    }

    /// Fetches the first page found for the title or one of its shortened
    /// forms.
    pub async fn find_page(&self, artist: &str, title: &str) -> Result<Option<String>, FetchError> {
        let artist = url_key(artist);
        if artist.is_empty() {
            debug!("Artist has no usable characters for a lyrics URL");
            return Ok(None);
        }

        let mut title = title.to_lowercase();
        let mut last_key: Option<String> = None;

        loop {
            let key = url_key(&title);
            if !key.is_empty() && last_key.as_deref() != Some(key.as_str()) {
                let url = self.page_url(&artist, &key);
                if let Some(doc) = self.fetcher.fetch(&url).await? {
                    return Ok(Some(doc));
                }
                debug!("No page at {}", url);
                last_key = Some(key);
            }

            if !drop_bracketed_suffix(&mut title) {
                return Ok(None);
            }
        }
    }
}

#[async_trait]
impl LyricsProvider for WebProvider {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn resolve(&self, track: &LockedTrack<'_>) -> Option<String> {
        let Some((artist, title)) = track.artist_title() else {
            warn!("Track has no artist or title, skipping web lookup");
            return None;
        };

        let doc = match self.find_page(&artist, &title).await {
            Ok(Some(doc)) => doc,
            Ok(None) => return None,
            Err(e) if e.is_fatal() => {
                error!("Giving up on {} - {}: {}", artist, title, e);
                return None;
            }
            Err(e) => {
                warn!("Lyrics page lookup failed for {} - {}: {}", artist, title, e);
                return None;
            }
        };

        let lyrics = self.extractor.extract(&doc);
        if lyrics.is_none() {
            warn!("Could not find lyrics block in page for {} - {}", artist, title);
        }
        lyrics
    }
}
