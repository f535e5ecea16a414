//! Fallback lyrics providers
//!
//! Each provider turns a track into lyrics or nothing. Failures stay inside
//! the provider: they are logged there and surface as `None`, so the chain
//! simply moves on to the next entry.

pub mod script;
pub mod web;

use async_trait::async_trait;
use tracing::debug;

use crate::core::host::LockedTrack;

pub use script::ScriptProvider;
pub use web::WebProvider;

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, track: &LockedTrack<'_>) -> Option<String>;
}

/// Providers tried strictly in order, never concurrently.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn LyricsProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl LyricsProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn LyricsProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// First non-empty result, with the name of the provider that produced it.
    pub async fn resolve(&self, track: &LockedTrack<'_>) -> Option<(&'static str, String)> {
        for provider in &self.providers {
            match provider.resolve(track).await {
                Some(lyrics) if !lyrics.is_empty() => {
                    debug!("Lyrics found by {} provider", provider.name());
                    return Some((provider.name(), lyrics));
                }
                _ => debug!("No lyrics from {} provider", provider.name()),
            }
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a fixed answer and counts how often it was asked.
    pub struct StubProvider {
        pub name: &'static str,
        pub answer: Option<String>,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        pub fn new(name: &'static str, answer: Option<&str>) -> Self {
            Self {
                name,
                answer: answer.map(str::to_string),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl LyricsProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn resolve(&self, _track: &LockedTrack<'_>) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }
}
