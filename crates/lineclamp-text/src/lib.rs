#![forbid(unsafe_code)]

//! Text primitives for line-clamped rich content.
//!
//! - [`Node`] - a text run, an atomic element, or a structural marker
//! - [`Atom`] - an indivisible inline element (link, image, control)
//! - [`Content`] - the ordered node sequence a fit truncates
//! - [`WidthCache`] - LRU cache for cell width measurements
//!
//! # Example
//! ```
//! use lineclamp_text::{Atom, Content, grapheme_prefix};
//!
//! let content = Content::new()
//!     .with_text("hello world")
//!     .with_atom(Atom::new("a", "more"));
//!
//! assert_eq!(content.plain_text(), "hello worldmore");
//! assert_eq!(grapheme_prefix("hello world", 5), "hello");
//! ```

pub mod node;
pub mod width;
pub mod width_cache;

pub use node::{Atom, Content, Node};
pub use width::{
    display_width, grapheme_count, grapheme_prefix, grapheme_suffix, grapheme_width, graphemes,
};
pub use width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, WidthCache};
