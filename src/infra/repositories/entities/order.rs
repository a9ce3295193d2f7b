//! SeaORM entity for the `orders` table.
//!
//! The status column stores the lowercase vocabulary value; conversion
//! into [`OrderStatus`] happens at the domain boundary. A row with an
//! out-of-vocabulary status (hand-edited data) maps to `pending` rather
//! than failing the whole query.

use sea_orm::entity::prelude::*;

use crate::domain::{Order, OrderStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_name: String,
    pub image_url: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_name: model.product_name,
            image_url: model.image_url,
            status: OrderStatus::parse(&model.status).unwrap_or(OrderStatus::Pending),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
