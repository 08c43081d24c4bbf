use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categorias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "qualificacao")]
    pub qualification: String,
    #[sea_orm(column_name = "descricao", column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "url_imagem")]
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            qualification: model.qualification,
            description: model.description,
            image_url: model.image_url,
        }
    }
}
