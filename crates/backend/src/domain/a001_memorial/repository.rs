use chrono::Utc;
use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialId};
use contracts::domain::a001_memorial::banner::{BannerSelection, DEFAULT_BANNER_COLOR};
use contracts::domain::a001_memorial::edit::FieldId;
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder, Set, Value};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_memorial")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub date_of_death: Option<chrono::NaiveDate>,
    pub quote: Option<String>,
    pub biography: Option<String>,
    pub banner_type: String,
    pub banner_value: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Memorial {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let banner = BannerSelection::from_parts(&m.banner_type, &m.banner_value)
            .unwrap_or_else(|e| {
                tracing::warn!("Memorial {} has an unusable banner ({}), using default", m.id, e);
                BannerSelection::color(DEFAULT_BANNER_COLOR)
            });

        Memorial {
            id: MemorialId(uuid),
            first_name: m.first_name,
            middle_name: m.middle_name,
            last_name: m.last_name,
            date_of_birth: m.date_of_birth,
            date_of_death: m.date_of_death,
            quote: m.quote,
            biography: m.biography,
            banner,
            metadata,
        }
    }
}

fn active_model(aggregate: &Memorial) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        first_name: Set(aggregate.first_name.clone()),
        middle_name: Set(aggregate.middle_name.clone()),
        last_name: Set(aggregate.last_name.clone()),
        date_of_birth: Set(aggregate.date_of_birth),
        date_of_death: Set(aggregate.date_of_death),
        quote: Set(aggregate.quote.clone()),
        biography: Set(aggregate.biography.clone()),
        banner_type: Set(aggregate.banner.kind.as_str().to_string()),
        banner_value: Set(aggregate.banner.value.clone()),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        version: Set(aggregate.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Memorial>> {
    let items: Vec<Memorial> = Entity::find()
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .all(get_connection()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Memorial>> {
    let result = Entity::find_by_id(id.to_string())
        .one(get_connection()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Memorial) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    active_model(aggregate).insert(get_connection()?).await?;
    Ok(uuid)
}

/// Columns owned by one inline editor, with their new values
pub fn field_values(aggregate: &Memorial, field: FieldId) -> Vec<(Column, Value)> {
    match field {
        FieldId::Name => vec![
            (Column::FirstName, aggregate.first_name.clone().into()),
            (Column::MiddleName, aggregate.middle_name.clone().into()),
            (Column::LastName, aggregate.last_name.clone().into()),
        ],
        FieldId::Dates => vec![
            (Column::DateOfBirth, aggregate.date_of_birth.into()),
            (Column::DateOfDeath, aggregate.date_of_death.into()),
        ],
        FieldId::Quote => vec![(Column::Quote, aggregate.quote.clone().into())],
        FieldId::Biography => vec![(Column::Biography, aggregate.biography.clone().into())],
        FieldId::Banner => vec![
            (Column::BannerType, aggregate.banner.kind.as_str().into()),
            (Column::BannerValue, aggregate.banner.value.clone().into()),
        ],
    }
}

/// Writes only the columns of `field`; edits of other fields made in the
/// meantime are kept. Returns false when the row is gone.
pub async fn update_field(aggregate: &Memorial, field: FieldId) -> anyhow::Result<bool> {
    let mut query = Entity::update_many()
        .col_expr(Column::UpdatedAt, Expr::value(aggregate.metadata.updated_at))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1));
    for (column, value) in field_values(aggregate, field) {
        query = query.col_expr(column, Expr::value(value));
    }
    let result = query
        .filter(Column::Id.eq(aggregate.id.value().to_string()))
        .exec(get_connection()?)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_memorial::aggregate::MemorialDto;
    use sea_orm::IdenStatic;

    #[test]
    fn each_field_owns_disjoint_columns() {
        let memorial = Memorial::new_for_insert(&MemorialDto {
            first_name: "Jane".into(),
            middle_name: None,
            last_name: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1950, 1, 2).unwrap(),
            date_of_death: None,
            quote: None,
            biography: None,
        });
        let fields = [
            FieldId::Banner,
            FieldId::Name,
            FieldId::Dates,
            FieldId::Quote,
            FieldId::Biography,
        ];

        let mut seen: Vec<String> = Vec::new();
        for field in fields {
            for (column, _) in field_values(&memorial, field) {
                let name = column.as_str().to_string();
                assert!(!seen.contains(&name), "{} written by two editors", name);
                seen.push(name);
            }
        }
        assert!(!seen.iter().any(|c| c == Column::Version.as_str()));
        assert!(!seen.iter().any(|c| c == Column::CreatedAt.as_str()));
    }
}
