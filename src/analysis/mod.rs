//! Structure inference from typography.
//!
//! The stages run strictly in order: [`FeatureExtractor`] turns spans into
//! line features, [`HeadingScorer`] picks heading candidates, and
//! [`OutlineBuilder`] levels them and assembles the outline.

mod features;
pub mod lexicon;
mod options;
pub mod outline;
mod scorer;

pub use features::{weighted_font_size, FeatureExtractor, FontStatistics};
pub use lexicon::{heading_key, normalize_text, Lexicon, DEFAULT_DOMAIN_KEYWORDS};
pub use options::{ExtractOptions, OutlineOptions};
pub use outline::{OutlineBuild, OutlineBuilder};
pub use scorer::{HeadingScorer, ScoringWeights};
