//! Resolving an intent tag to a reply.

use log::warn;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::catalog::IntentCatalog;

/// Reply used when the predicted tag has no catalog entry.
pub const FALLBACK_RESPONSE: &str = "I'm sorry, I didn't understand that. Can you please rephrase?";

/// Reply used when the pipeline cannot run at all.
pub const UNAVAILABLE_RESPONSE: &str = "Sorry, the chatbot is not available right now.";

/// Picks one response for a tag, uniformly at random.
///
/// The generator is the only mutable state and sits behind a mutex, so a
/// resolver can be shared between threads.
pub struct ResponseResolver<R = StdRng> {
    rng: Mutex<R>,
    fallback: String,
}

impl ResponseResolver<StdRng> {
    /// A resolver seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A resolver with a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ResponseResolver<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for ResponseResolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl<R: Rng> ResponseResolver<R> {
    /// A resolver drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            fallback: FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Replace the fallback reply.
    pub fn with_fallback<S: Into<String>>(mut self, fallback: S) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// The fallback reply.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Draw one response for `tag`, or `None` when the catalog has no entry.
    pub fn choose<'a>(&self, tag: &str, catalog: &'a IntentCatalog) -> Option<&'a str> {
        let entry = catalog.get(tag)?;
        let mut rng = self.rng.lock();
        entry.responses().choose(&mut *rng).map(String::as_str)
    }

    /// Resolve `tag` to a reply, falling back when it is unknown.
    pub fn resolve(&self, tag: &str, catalog: &IntentCatalog) -> String {
        match self.choose(tag, catalog) {
            Some(response) => response.to_string(),
            None => {
                warn!("No catalog entry for intent {tag:?}");
                self.fallback.clone()
            }
        }
    }
}
