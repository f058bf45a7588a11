//! Boarding point entity.
//!
//! Points form a dense total order starting at 0: `route_order` is the
//! position the shuttle visits the point at. Renumbering on insert/delete
//! is handled by the repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boarding_point")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Ex: "Em frente à farmácia"
    #[sea_orm(nullable)]
    pub address_reference: Option<String>,

    /// Position in the outbound route (0, 1, 2, ...).
    pub route_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
