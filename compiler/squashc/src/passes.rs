//! Built-in document processors.
//!
//! | name           | stage       | runs after           | active from          |
//! |----------------|-------------|----------------------|----------------------|
//! | `conditionals` | preprocess  |                      | always               |
//! | `regions`      | postprocess |                      | always               |
//! | `protect`      | postprocess | `regions`            | always               |
//! | `macros`       | postprocess | `regions`            | always               |
//! | `trim`         | postprocess | `protect`, `macros`  | `trim-dead-code`     |
//! | `compact`      | postprocess | `trim`               | `strip-comments`     |

mod compact;
mod conditionals;
mod macros;
mod protect;
mod regions;
mod trim;

pub use compact::CompactProcessor;
pub use conditionals::ConditionalCompilation;
pub use macros::{expand_placeholders, MacroSubstitution};
pub use protect::{protect, ProtectionAnnotator};
pub use regions::{annotate_regions, RegionAnnotator};
pub use trim::TrimProcessor;

#[cfg(test)]
mod tests;
