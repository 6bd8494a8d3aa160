//! Tracks which page section is active for the navigation bar.

mod observer;

use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reducer::Reducer;
pub use observer::{HashObserver, ScrollSpy, SectionObserver};

/// Vertical offset applied when scrolling to a section, so that its
/// heading isn't glued to the top edge.
pub const SCROLL_OFFSET: i32 = -20;

/// A section of the page, in page order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// What the tool is about.
    #[default]
    About,
    /// The chat widget.
    Chat,
    /// The translator widget.
    Translator,
    /// The caption widget.
    Caption,
}

impl Section {
    /// All sections in page order.
    pub const ALL: [Section; 4] = [
        Section::About,
        Section::Chat,
        Section::Translator,
        Section::Caption,
    ];

    /// Returns the element id of the section.
    #[inline]
    pub fn id(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Chat => "chat",
            Section::Translator => "translator",
            Section::Caption => "caption",
        }
    }

    /// Returns the link target, e.g. `#chat`.
    #[inline]
    pub fn href(self) -> String {
        format!("#{}", self.id())
    }

    /// Returns the link label.
    #[inline]
    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Chat => "Goofy Ahh Friend",
            Section::Translator => "Brainrot Translator",
            Section::Caption => "Captions",
        }
    }

    /// Parses a URL fragment such as `#chat`. The leading `#` is optional.
    pub fn from_hash(hash: &str) -> Option<Self> {
        let id = hash.trim().trim_start_matches('#');
        Section::ALL
            .into_iter()
            .find(|section| section.id().eq_ignore_ascii_case(id))
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// An error returned when parsing an unknown section name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSectionError(String);

impl Display for UnknownSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section: {:?}", self.0)
    }
}

impl Error for UnknownSectionError {}

impl FromStr for Section {
    type Err = UnknownSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::from_hash(s).ok_or_else(|| UnknownSectionError(s.to_owned()))
    }
}

/// Events of the navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// An observer reports that `Section` is the one in view.
    Observed(Section),
    /// The user clicked the link of a section.
    LinkClicked(Section),
    /// The pointer entered the link of a section.
    HoverEnter(Section),
    /// The pointer left the links.
    HoverLeave,
    /// The user toggled the menu on narrow viewports.
    ToggleMenu,
}

/// Effects of the navigation bar, carried out by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEffect {
    /// Replaces the URL fragment without scrolling or adding a history
    /// entry.
    ReplaceHash(String),
    /// Sets the URL fragment and smoothly scrolls to the section, `offset`
    /// pixels away from its top.
    ScrollTo {
        /// The target section.
        section: Section,
        /// Offset from the top of the section.
        offset: i32,
    },
}

/// State of the navigation bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavState {
    active: Section,
    hovered: Option<Section>,
    menu_open: bool,
}

impl NavState {
    /// Creates a state whose active section comes from the URL fragment,
    /// falling back to the first section.
    #[inline]
    pub fn from_hash(hash: &str) -> Self {
        Self {
            active: Section::from_hash(hash).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Returns the active section.
    #[inline]
    pub fn active(&self) -> Section {
        self.active
    }

    /// Returns the section under the pointer, if any.
    #[inline]
    pub fn hovered(&self) -> Option<Section> {
        self.hovered
    }

    /// Returns the section the highlight sits under: the hovered one if
    /// any, otherwise the active one.
    #[inline]
    pub fn highlighted(&self) -> Section {
        self.hovered.unwrap_or(self.active)
    }

    /// Returns `true` if the menu is expanded on narrow viewports.
    #[inline]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Asks `observer` for the section in view and applies it.
    pub fn sync_with<O: SectionObserver + ?Sized>(
        self,
        observer: &O,
    ) -> (Self, Option<NavEffect>) {
        match observer.current_section() {
            Some(section) => self.apply(NavEvent::Observed(section)),
            None => (self, None),
        }
    }

    fn apply(mut self, event: NavEvent) -> (Self, Option<NavEffect>) {
        let effect = match event {
            NavEvent::Observed(section) => {
                if section == self.active {
                    None
                } else {
                    self.active = section;
                    Some(NavEffect::ReplaceHash(section.href()))
                }
            }
            NavEvent::LinkClicked(section) => {
                self.active = section;
                self.menu_open = false;
                Some(NavEffect::ScrollTo {
                    section,
                    offset: SCROLL_OFFSET,
                })
            }
            NavEvent::HoverEnter(section) => {
                self.hovered = Some(section);
                None
            }
            NavEvent::HoverLeave => {
                self.hovered = None;
                None
            }
            NavEvent::ToggleMenu => {
                self.menu_open = !self.menu_open;
                None
            }
        };
        (self, effect)
    }
}

impl Reducer for NavState {
    type Event = NavEvent;
    type Effect = NavEffect;

    #[inline]
    fn reduce(
        self,
        event: NavEvent,
        _now: DateTime<Utc>,
    ) -> (Self, Option<NavEffect>) {
        self.apply(event)
    }
}
