//! Trip entity.
//!
//! A trip is an administrator-run traversal of the stops resolved from one
//! poll's votes, in one direction. At most one trip per (poll, trip_type).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::student::University;

/// Direction of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[sea_orm(string_value = "outbound")]
    Outbound,
    #[sea_orm(string_value = "return")]
    Return,
}

impl TripType {
    /// Wire name, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Return => "return",
        }
    }
}

/// Trip lifecycle state. Transitions are strictly forward:
/// pending -> in_progress -> completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TripStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub poll_id: String,

    pub trip_type: TripType,

    pub status: TripStatus,

    /// Current stop of an in-progress outbound trip; null otherwise.
    #[sea_orm(nullable)]
    pub current_boarding_point_id: Option<String>,

    /// Current stop of an in-progress return trip; null otherwise.
    #[sea_orm(nullable)]
    pub current_university: Option<University>,

    #[sea_orm(nullable)]
    pub started_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poll::Entity",
        from = "Column::PollId",
        to = "super::poll::Column::Id",
        on_delete = "Cascade"
    )]
    Poll,

    #[sea_orm(
        belongs_to = "super::boarding_point::Entity",
        from = "Column::CurrentBoardingPointId",
        to = "super::boarding_point::Column::Id",
        on_delete = "SetNull"
    )]
    CurrentBoardingPoint,
}

impl Related<super::poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Poll.def()
    }
}

impl Related<super::boarding_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentBoardingPoint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
