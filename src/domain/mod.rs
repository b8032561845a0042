//! Domain layer: entities and the bookmark pipeline
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod classifier;
pub mod entities;
pub mod error;
pub mod extract;
pub mod filter;
pub mod freemind;
pub mod hierarchy;
pub mod stats;

pub use classifier::{domain_of, CategoryRule, Classifier, RecordBatch, RuleTable};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use extract::extract_links;
pub use filter::{filter_tree, FLATTENED_LABEL};
pub use hierarchy::{folder_name, HierarchyBuilder, SubGroup, MISC_LABEL, OTHER_LABEL, ROOT_LABEL};
