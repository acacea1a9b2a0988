use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

/// Seats given to a course created without an explicit capacity.
pub const DEFAULT_CAPACITY: i32 = 30;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub capacity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
}

pub fn validate_capacity(capacity: i32) -> Result<i32, ModelError> {
    if capacity < 1 {
        return Err(ModelError::Validation("capacity must be at least 1".into()));
    }
    Ok(capacity)
}

pub async fn create(db: &DatabaseConnection, input: NewCourse) -> Result<Model, ModelError> {
    let name = errors::require("name", &input.name, 200)?;
    let capacity = validate_capacity(input.capacity.unwrap_or(DEFAULT_CAPACITY))?;
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name),
        description: Set(input.description),
        capacity: Set(capacity),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn update(db: &DatabaseConnection, id: i32, patch: CoursePatch) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("course".into()))?
        .into();
    if let Some(v) = patch.name { am.name = Set(errors::require("name", &v, 200)?); }
    if let Some(v) = patch.description { am.description = Set(Some(v)); }
    if let Some(v) = patch.capacity { am.capacity = Set(validate_capacity(v)?); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(ModelError::from)
}
