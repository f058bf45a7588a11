//! Student entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Class shift the student attends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ClassShift {
    #[sea_orm(string_value = "morning")]
    Morning,
    #[sea_orm(string_value = "afternoon")]
    Afternoon,
    #[sea_orm(string_value = "evening")]
    Evening,
}

/// University a student attends.
///
/// The set is closed; return trips visit universities in the fixed
/// priority order below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum University {
    #[sea_orm(string_value = "UESPI")]
    Uespi,
    #[sea_orm(string_value = "CHRISFAPI")]
    Chrisfapi,
    #[sea_orm(string_value = "IFPI")]
    Ifpi,
    #[sea_orm(string_value = "ETC")]
    Etc,
}

impl University {
    /// Wire code, as stored in the database.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Uespi => "UESPI",
            Self::Chrisfapi => "CHRISFAPI",
            Self::Ifpi => "IFPI",
            Self::Etc => "ETC",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Uespi => "Universidade Estadual do Piauí",
            Self::Chrisfapi => "Christus Faculdade do Piauí",
            Self::Ifpi => "Instituto Federal do Piauí",
            Self::Etc => "Outro",
        }
    }

    /// Position in the return-trip visiting order. Lower visits first.
    #[must_use]
    pub const fn return_priority(&self) -> u8 {
        match self {
            Self::Ifpi => 0,
            Self::Chrisfapi => 1,
            Self::Uespi => 2,
            Self::Etc => 3,
        }
    }

    /// Parse a wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "UESPI" => Some(Self::Uespi),
            "CHRISFAPI" => Some(Self::Chrisfapi),
            "IFPI" => Some(Self::Ifpi),
            "ETC" => Some(Self::Etc),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub user_id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub class_shift: ClassShift,

    pub university: University,

    /// Where the student boards the outbound shuttle. Students without a
    /// boarding point never appear in outbound stop lists.
    #[sea_orm(nullable)]
    pub boarding_point_id: Option<String>,

    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::boarding_point::Entity",
        from = "Column::BoardingPointId",
        to = "super::boarding_point::Column::Id",
        on_delete = "SetNull"
    )]
    BoardingPoint,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::boarding_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoardingPoint.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_priority_order() {
        assert!(University::Ifpi.return_priority() < University::Chrisfapi.return_priority());
        assert!(University::Chrisfapi.return_priority() < University::Uespi.return_priority());
        assert!(University::Uespi.return_priority() < University::Etc.return_priority());
    }

    #[test]
    fn test_code_round_trip() {
        for u in [
            University::Uespi,
            University::Chrisfapi,
            University::Ifpi,
            University::Etc,
        ] {
            assert_eq!(University::from_code(u.code()), Some(u));
        }
        assert_eq!(University::from_code("UFPI"), None);
    }
}
