use super::Section;

/// Something that knows which section is currently in view.
///
/// This isolates the window-level state, like the URL fragment or the
/// scroll position, from the navigation state.
pub trait SectionObserver {
    /// Returns the section in view, or `None` if it can't be told.
    fn current_section(&self) -> Option<Section>;
}

/// Reads the section from a URL fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HashObserver {
    hash: String,
}

impl HashObserver {
    /// Creates an observer for `hash`.
    #[inline]
    pub fn new<S: Into<String>>(hash: S) -> Self {
        Self { hash: hash.into() }
    }

    /// Updates the fragment, e.g. after a `hashchange`.
    #[inline]
    pub fn set_hash<S: Into<String>>(&mut self, hash: S) {
        self.hash = hash.into();
    }
}

impl SectionObserver for HashObserver {
    #[inline]
    fn current_section(&self) -> Option<Section> {
        Section::from_hash(&self.hash)
    }
}

/// Tells the section in view from the page layout and scroll position.
///
/// A section is in view once its top edge has scrolled past the probe
/// line, which sits `probe_offset` pixels below the top of the viewport.
/// The last such section wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollSpy {
    tops: Vec<(Section, f64)>,
    probe_offset: f64,
    scroll_y: f64,
}

impl ScrollSpy {
    /// Creates a spy for sections whose top edges are at the given
    /// document offsets.
    pub fn with_layout(tops: impl IntoIterator<Item = (Section, f64)>) -> Self {
        let mut tops: Vec<_> = tops.into_iter().collect();
        tops.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self {
            tops,
            probe_offset: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Moves the probe line `offset` pixels below the top of the viewport.
    #[inline]
    pub fn with_probe_offset(mut self, offset: f64) -> Self {
        self.probe_offset = offset;
        self
    }

    /// Returns the spy with the viewport scrolled to `scroll_y`.
    #[inline]
    pub fn scrolled_to(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    /// Updates the scroll position.
    #[inline]
    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }
}

impl SectionObserver for ScrollSpy {
    fn current_section(&self) -> Option<Section> {
        let probe = self.scroll_y + self.probe_offset;
        self.tops
            .iter()
            .take_while(|(_, top)| *top <= probe)
            .last()
            .map(|(section, _)| *section)
    }
}
