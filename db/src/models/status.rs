use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle flag shared by users and timetable entries.
///
/// Only `Active` rows take part in authentication and conflict detection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lifecycle_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LifecycleStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "inactive")]
    Inactive,

    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl Default for LifecycleStatus {
    fn default() -> Self {
        Self::Active
    }
}
