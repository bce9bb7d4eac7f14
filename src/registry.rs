//! The resolved set of links for the current text.
//!
//! The registry is rebuilt from scratch whenever the text or the detector
//! list changes. Records keep detector order, then match order, and ranges
//! from different detectors may overlap; lookups always return the first
//! containing record.

use tracing::debug;

use crate::detector::LinkDetector;
use crate::link::Link;

#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    links: Vec<Link>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by running every detector over `text`.
    pub fn build<D: LinkDetector>(text: &str, detectors: &[D]) -> Self {
        let mut registry = Self::new();
        registry.rebuild(text, detectors);
        registry
    }

    /// Replace the current records with the links `detectors` find in `text`.
    pub fn rebuild<D: LinkDetector>(&mut self, text: &str, detectors: &[D]) {
        self.links.clear();
        for detector in detectors {
            let callback = detector.callback();
            self.links.extend(
                detector
                    .detect_links(text)
                    .into_iter()
                    .filter(|range| range.start < range.end)
                    .map(|range| Link::new(range, callback.cloned())),
            );
        }
        debug!(
            detectors = detectors.len(),
            links = self.links.len(),
            "rebuilt link registry"
        );
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// First record whose range contains `index`, ignoring geometry.
    pub fn link_containing(&self, index: usize) -> Option<&Link> {
        self.links.iter().find(|link| link.contains(index))
    }
}

impl<'a> IntoIterator for &'a LinkRegistry {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
