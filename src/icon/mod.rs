//! Icon class parsing, selector resolution and lookup.
//!
//! ```text
//! class="fa-regular fa-user"
//!        │
//!        ▼  parse
//! IconMetadata { style: regular, family: classic, iconName: user }
//!        │
//!        ▼  resolve
//! CanonicalSelector "far:user"
//!        │
//!        ▼  IconLookup
//! ResolvedIcon { reference_key: "far-fa-user", markup: "<svg ...>" }
//! ```

pub mod catalogue;
pub mod error;
pub mod parse;
pub mod prefix;
pub mod selector;
pub mod symbol;

pub use catalogue::{Catalogue, IconLookup, ResolvedIcon};
pub use error::{IconError, LookupError};
pub use parse::IconMetadata;
pub use selector::CanonicalSelector;
