//! Configuration section definitions.
//!
//! Each module corresponds to a section in `tola-icons.toml`:
//!
//! | Module      | TOML Section   | Purpose                               |
//! |-------------|----------------|---------------------------------------|
//! | `icons`     | `[icons]`      | Matching, bundle, shortcode, failures |
//! | `catalogue` | `[catalogue]`  | Icon definition files                 |
//! | `build`     | `[build]`      | Page input/output directories         |

mod build;
mod catalogue;
mod icons;

pub use build::BuildConfig;
pub use catalogue::CatalogueConfig;
pub use icons::IconOptions;
