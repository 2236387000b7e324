//! Logical UI control: a default selector plus ordered fallback selectors.

use std::sync::{Arc, Mutex};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::selector::{Selector, SelectorStrategy};

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("an element needs at least one selector candidate")]
    NoCandidates,
}

#[derive(Debug, Default)]
struct HealingState {
    suggested: bool,
    selector: Option<Selector>,
}

#[derive(Debug)]
struct ElementInner {
    default: Selector,
    fallbacks: Vec<Selector>,
    healing: Mutex<HealingState>,
}

/// A logical UI control described by one default [`Selector`] and an ordered
/// list of fallback selectors.
///
/// `Element` is a cheap-to-clone handle: every clone shares the same
/// self-healing state, so a fallback discovered during one keyword call is
/// reused by every later call targeting the same control.
#[derive(Debug, Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

impl Element {
    pub fn new(default: Selector, fallbacks: Vec<Selector>) -> Self {
        Element {
            inner: Arc::new(ElementInner {
                default,
                fallbacks,
                healing: Mutex::new(HealingState::default()),
            }),
        }
    }

    /// Builds an element from an ordered candidate list, the way page objects
    /// declare controls: the first candidate whose strategy matches
    /// `preferred` becomes the default and the candidates of other strategies
    /// become the fallbacks; when no candidate matches, the first candidate is
    /// the default and the rest are the fallbacks.
    pub fn from_candidates(
        candidates: Vec<Selector>,
        preferred: SelectorStrategy,
    ) -> Result<Self, ElementError> {
        if candidates.is_empty() {
            return Err(ElementError::NoCandidates);
        }

        let default = candidates
            .iter()
            .find(|selector| selector.strategy() == preferred)
            .cloned();

        Ok(match default {
            Some(default) => {
                let fallbacks = candidates
                    .into_iter()
                    .filter(|selector| selector.strategy() != preferred)
                    .collect();
                Element::new(default, fallbacks)
            }
            None => {
                let mut candidates = candidates.into_iter();
                let default = candidates.next().expect("checked non-empty");
                Element::new(default, candidates.collect())
            }
        })
    }

    pub fn default_selector(&self) -> &Selector {
        &self.inner.default
    }

    pub fn fallback_selectors(&self) -> &[Selector] {
        &self.inner.fallbacks
    }

    pub fn has_healing_suggestion(&self) -> bool {
        self.inner.healing.lock().expect("healing lock").suggested
    }

    pub fn healing_selector(&self) -> Option<Selector> {
        self.inner
            .healing
            .lock()
            .expect("healing lock")
            .selector
            .clone()
    }

    /// The selector resolution should try first: the remembered healing
    /// substitute when one exists, the default otherwise.
    pub fn preferred_selector(&self) -> Selector {
        self.healing_selector()
            .unwrap_or_else(|| self.inner.default.clone())
    }

    /// Remembers `selector` as the working substitute for the default.
    /// The stored selector is always one of the declared selectors; anything
    /// else is ignored.
    pub fn record_healing(&self, selector: Selector) {
        if selector != self.inner.default && !self.inner.fallbacks.contains(&selector) {
            return;
        }
        let mut healing = self.inner.healing.lock().expect("healing lock");
        healing.suggested = true;
        healing.selector = Some(selector);
    }

    /// Whether two handles describe the same underlying control.
    pub fn same_control(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let healing = self.inner.healing.lock().expect("healing lock");
        let mut state = serializer.serialize_struct("Element", 4)?;
        state.serialize_field("default_selector", &self.inner.default)?;
        state.serialize_field("fallback_selectors", &self.inner.fallbacks)?;
        state.serialize_field("self_healing_suggestion", &healing.suggested)?;
        state.serialize_field("self_healing_selector", &healing.selector)?;
        state.end()
    }
}
