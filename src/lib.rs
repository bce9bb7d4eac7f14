//! Tappable links inside label text.
//!
//! Detectors find mentions, hashtags, URLs or custom patterns in a string;
//! the registry resolves them into ordered link records; hit-testing maps a
//! pointer location to the record under it; the interaction state tracks
//! the pressed link and fires callbacks on tap; the styling bridge turns all
//! of that into attributed text for a renderer.
//!
//! Ranges are always counted in extended grapheme clusters.

pub mod detector;
pub mod error;
pub mod grapheme;
pub mod hit_test;
pub mod interaction;
pub mod label;
pub mod layout;
pub mod link;
pub mod logging;
pub mod registry;
pub mod style;
pub mod theme;

pub use detector::{LinkDetector, PatternDetector, PatternOptions, RangeDetector, SubstringDetector};
pub use error::{LinkLabelError, Result};
pub use hit_test::link_at;
pub use interaction::LinkInteraction;
pub use label::{LinkLabel, PointerEvent};
pub use layout::{GridLayout, TextLayout};
pub use link::{Link, LinkCallback, link_callback};
pub use registry::LinkRegistry;
pub use style::{AttributedText, StyledRun, restyle};
pub use theme::LinkTheme;
