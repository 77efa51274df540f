// Inference service for binding semantic roles to sheet columns
//
// Pure functions over a RawGrid: no I/O, no shared state. The pipeline and
// the inspect command both call into it.

pub mod core;
pub mod models;
pub mod predicates;
pub mod resolver;

// Re-export commonly used types
pub use self::core::{column_scores, score, score_excluding};
pub use models::{
    BindingMethod, ColumnBinding, ColumnRoleMap, DEFAULT_SAMPLE_SIZE, Role, RoleOverride,
    RoleProfile, RoleSpec,
};
pub use predicates::{CellKind, Classifier};
pub use resolver::{header_matches, resolve};

use crate::ingest::RawGrid;

/// Per-role content score table, used for diagnostics
#[derive(Debug, Clone)]
pub struct RoleScores {
    pub role: Role,
    pub scores: Vec<usize>,
}

/// Score every content-classified role of `profile` over `grid`
///
/// Unlike [`resolve`], this ignores collisions and header text; it shows what
/// the content classifiers alone see.
pub fn score_table(grid: &RawGrid, profile: &RoleProfile) -> Vec<RoleScores> {
    profile
        .roles
        .iter()
        .filter_map(|spec| {
            let kind = spec.content?;
            Some(RoleScores {
                role: spec.role,
                scores: column_scores(
                    grid,
                    |cell| profile.classifier.matches(kind, cell),
                    profile.sample_size,
                ),
            })
        })
        .collect()
}
