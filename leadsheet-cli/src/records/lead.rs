//! Lead records

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::RecordBuilder;
use crate::ingest::{RawGrid, cell_at};
use crate::services::inference::{ColumnRoleMap, Role, RoleProfile};

/// Source tag stamped on every lead from this channel
pub const LEAD_SOURCE: &str = "google_sheets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
        }
    }
}

/// A sales lead read from one sheet row
///
/// `is_temporary` marks a lead that exists only in memory until someone is
/// assigned to it; the consumer creates it on assignment instead of updating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub product: String,
    pub source: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub assigned_to: Option<String>,
    pub is_temporary: bool,
}

/// Builds leads; rows without a name are dropped
#[derive(Debug, Clone)]
pub struct LeadBuilder {
    profile: RoleProfile,
    created_at: Option<DateTime<Utc>>,
}

impl LeadBuilder {
    pub fn new(profile: RoleProfile) -> Self {
        Self {
            profile,
            created_at: None,
        }
    }

    /// Pin the creation timestamp instead of using the ingestion moment
    pub fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

impl Default for LeadBuilder {
    fn default() -> Self {
        Self::new(RoleProfile::leads())
    }
}

impl RecordBuilder for LeadBuilder {
    type Output = Vec<Lead>;

    fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    fn build(&self, grid: &RawGrid, roles: &ColumnRoleMap) -> Vec<Lead> {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let name_column = roles.get(Role::Name);
        let email_column = roles.get(Role::Email);
        let phone_column = roles.get(Role::Phone);
        let product_column = roles.get(Role::Product);

        let leads: Vec<Lead> = grid
            .data_rows()
            .iter()
            .filter(|row| !cell_at(row, name_column).is_empty())
            .map(|row| Lead {
                id: Uuid::new_v4(),
                name: cell_at(row, name_column).to_string(),
                email: cell_at(row, email_column).to_string(),
                phone: cell_at(row, phone_column).to_string(),
                product: cell_at(row, product_column).to_string(),
                source: LEAD_SOURCE.to_string(),
                status: LeadStatus::New,
                created_at,
                assigned_to: None,
                is_temporary: true,
            })
            .collect();

        let skipped = grid.data_rows().len() - leads.len();
        if skipped > 0 {
            log::debug!("Skipped {} rows without a name", skipped);
        }
        log::info!("Built {} leads from {} data rows", leads.len(), grid.data_rows().len());

        leads
    }
}
