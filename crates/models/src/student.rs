use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const STATUSES: [&str; 2] = ["Active", "Inactive"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub enrollment_date: Option<Date>,
    pub status: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted on create.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<Date>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub enrollment_date: Option<Date>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub enrollment_date: Option<Date>,
    pub status: Option<String>,
}

pub fn validate_name(field: &str, name: &str) -> Result<String, ModelError> {
    errors::require(field, name, 100)
}

pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email.to_ascii_lowercase())
        }
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_gender(gender: &str) -> Result<(), ModelError> {
    if !GENDERS.contains(&gender) {
        return Err(ModelError::Validation(format!("gender must be one of {}", GENDERS.join(", "))));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), ModelError> {
    if !STATUSES.contains(&status) {
        return Err(ModelError::Validation(format!("status must be one of {}", STATUSES.join(", "))));
    }
    Ok(())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn create(db: &DatabaseConnection, input: NewStudent) -> Result<Model, ModelError> {
    let first_name = validate_name("firstName", &input.first_name)?;
    let last_name = validate_name("lastName", &input.last_name)?;
    let email = validate_email(&input.email)?;
    if let Some(g) = &input.gender { validate_gender(g)?; }
    if let Some(s) = &input.status { validate_status(s)?; }

    let now = Utc::now().into();
    let am = ActiveModel {
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email),
        phone: Set(optional(input.phone)),
        address: Set(optional(input.address)),
        date_of_birth: Set(input.date_of_birth),
        gender: Set(input.gender),
        enrollment_date: Set(input.enrollment_date),
        status: Set(input.status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::on_duplicate(e, "email already registered"))
}

pub async fn update(db: &DatabaseConnection, id: i32, patch: StudentPatch) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("student".into()))?
        .into();
    if let Some(v) = patch.first_name { am.first_name = Set(validate_name("firstName", &v)?); }
    if let Some(v) = patch.last_name { am.last_name = Set(validate_name("lastName", &v)?); }
    if let Some(v) = patch.email { am.email = Set(validate_email(&v)?); }
    if let Some(v) = patch.phone { am.phone = Set(optional(Some(v))); }
    if let Some(v) = patch.address { am.address = Set(optional(Some(v))); }
    if let Some(v) = patch.date_of_birth { am.date_of_birth = Set(Some(v)); }
    if let Some(v) = patch.gender { validate_gender(&v)?; am.gender = Set(Some(v)); }
    if let Some(v) = patch.enrollment_date { am.enrollment_date = Set(Some(v)); }
    if let Some(v) = patch.status { validate_status(&v)?; am.status = Set(Some(v)); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::on_duplicate(e, "email already registered"))
}
