use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "detalhes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "normas_da_casa", column_type = "Text")]
    pub house_rules: String,
    #[sea_orm(column_name = "politica_de_cancelamento", column_type = "Text")]
    pub cancellation_policy: String,
    #[sea_orm(column_name = "saude_e_seguranca", column_type = "Text")]
    pub health_and_safety: String,
    #[sea_orm(column_name = "produto_id")]
    pub product_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Details {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            house_rules: model.house_rules,
            cancellation_policy: model.cancellation_policy,
            health_and_safety: model.health_and_safety,
        }
    }
}
