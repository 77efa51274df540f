//! Typed records built from a resolved sheet
//!
//! A builder owns the [`RoleProfile`] it needs and turns a grid plus its
//! [`ColumnRoleMap`] into records. Builders never fail: unresolved roles and
//! unparseable cells become empty strings and zeros.

pub mod lead;
pub mod metrics;
pub mod parse;

pub use lead::{LEAD_SOURCE, Lead, LeadBuilder, LeadStatus};
pub use metrics::{FollowerMetric, MetricsBuilder, MetricsReport, MetricsSummary, PerformanceMetric};

use crate::ingest::RawGrid;
use crate::services::inference::{ColumnRoleMap, RoleProfile, resolve};

/// Maps resolved columns of a grid into one kind of output
pub trait RecordBuilder: Send + Sync {
    /// What one ingestion pass produces; `Default` is the empty result
    type Output: Default + Send + Sync + 'static;

    /// Roles this builder needs, in resolution order
    fn profile(&self) -> &RoleProfile;

    /// Build records from already resolved columns
    fn build(&self, grid: &RawGrid, roles: &ColumnRoleMap) -> Self::Output;

    /// Resolve columns and build in one step
    ///
    /// A grid with no data rows (empty or header only) is "nothing to
    /// ingest" and yields the empty output.
    fn ingest(&self, grid: &RawGrid) -> Self::Output {
        if grid.data_rows().is_empty() {
            log::debug!("[{}] no data rows, nothing to ingest", self.profile().name);
            return Self::Output::default();
        }
        let roles = resolve(grid, self.profile());
        self.build(grid, &roles)
    }
}
