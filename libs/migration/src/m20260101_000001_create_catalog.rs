use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk_bigint(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn fk_bigint(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

/// Adds the `produto_id` cascade FK to a child table.
///
/// One-to-one children get a unique `produto_id`; one-to-many children get
/// `index` instead.
async fn create_child_table<T, C>(
    manager: &SchemaManager<'_>,
    mut table: TableCreateStatement,
    table_iden: T,
    product_col: C,
    index: Option<&str>,
) -> Result<(), DbErr>
where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
{
    let mut product_fk = fk_bigint(product_col);
    if index.is_none() {
        product_fk.unique_key();
    }

    manager
        .create_table(
            table
                .col(product_fk)
                .foreign_key(
                    ForeignKey::create()
                        .from(table_iden, product_col)
                        .to(Produtos::Table, Produtos::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    if let Some(index) = index {
        manager
            .create_index(
                Index::create()
                    .name(index)
                    .table(table_iden)
                    .col(product_col)
                    .to_owned(),
            )
            .await?;
    }

    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cidades::Table)
                    .if_not_exists()
                    .col(pk_bigint(Cidades::Id))
                    .col(string(Cidades::Nome))
                    .col(string(Cidades::Pais))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cidades_nome")
                    .table(Cidades::Table)
                    .col(Cidades::Nome)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categorias::Table)
                    .if_not_exists()
                    .col(pk_bigint(Categorias::Id))
                    .col(string(Categorias::Qualificacao))
                    .col(text(Categorias::Descricao).default(""))
                    .col(string(Categorias::UrlImagem).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categorias_qualificacao")
                    .table(Categorias::Table)
                    .col(Categorias::Qualificacao)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Produtos::Table)
                    .if_not_exists()
                    .col(pk_bigint(Produtos::Id))
                    .col(string(Produtos::Nome))
                    .col(boolean(Produtos::Disponivel).default(true))
                    .col(ColumnDef::new(Produtos::Avaliacao).float().not_null().default(0.0))
                    .col(ColumnDef::new(Produtos::Estrelas).float().not_null().default(0.0))
                    .col(fk_bigint(Produtos::CidadeId))
                    .col(fk_bigint(Produtos::CategoriaId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_produtos_cidade")
                            .from(Produtos::Table, Produtos::CidadeId)
                            .to(Cidades::Table, Cidades::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_produtos_categoria")
                            .from(Produtos::Table, Produtos::CategoriaId)
                            .to(Categorias::Table, Categorias::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_produtos_cidade_id")
                    .table(Produtos::Table)
                    .col(Produtos::CidadeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_produtos_categoria_id")
                    .table(Produtos::Table)
                    .col(Produtos::CategoriaId)
                    .to_owned(),
            )
            .await?;

        create_child_table(
            manager,
            Table::create()
                .table(Descricoes::Table)
                .if_not_exists()
                .col(pk_bigint(Descricoes::Id))
                .col(string(Descricoes::Titulo))
                .col(text(Descricoes::Texto))
                .to_owned(),
            Descricoes::Table,
            Descricoes::ProdutoId,
            None,
        )
        .await?;

        create_child_table(
            manager,
            Table::create()
                .table(Detalhes::Table)
                .if_not_exists()
                .col(pk_bigint(Detalhes::Id))
                .col(text(Detalhes::NormasDaCasa))
                .col(text(Detalhes::PoliticaDeCancelamento))
                .col(text(Detalhes::SaudeESeguranca))
                .to_owned(),
            Detalhes::Table,
            Detalhes::ProdutoId,
            None,
        )
        .await?;

        create_child_table(
            manager,
            Table::create()
                .table(Localizacoes::Table)
                .if_not_exists()
                .col(pk_bigint(Localizacoes::Id))
                .col(string(Localizacoes::Endereco))
                .to_owned(),
            Localizacoes::Table,
            Localizacoes::ProdutoId,
            None,
        )
        .await?;

        create_child_table(
            manager,
            Table::create()
                .table(Imagens::Table)
                .if_not_exists()
                .col(pk_bigint(Imagens::Id))
                .col(string(Imagens::Titulo))
                .col(string(Imagens::Url))
                .to_owned(),
            Imagens::Table,
            Imagens::ProdutoId,
            Some("idx_imagens_produto_id"),
        )
        .await?;

        create_child_table(
            manager,
            Table::create()
                .table(Caracteristicas::Table)
                .if_not_exists()
                .col(pk_bigint(Caracteristicas::Id))
                .col(string(Caracteristicas::Nome))
                .col(string_null(Caracteristicas::Icone))
                .to_owned(),
            Caracteristicas::Table,
            Caracteristicas::ProdutoId,
            Some("idx_caracteristicas_produto_id"),
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Caracteristicas::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Imagens::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Localizacoes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Detalhes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Descricoes::Table).if_exists().to_owned())
            .await?;
        // Children first: produtos holds RESTRICT FKs to cidades and categorias
        manager
            .drop_table(Table::drop().table(Produtos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categorias::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cidades::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Cidades {
    Table,
    Id,
    Nome,
    Pais,
}

#[derive(DeriveIden, Clone, Copy)]
enum Categorias {
    Table,
    Id,
    Qualificacao,
    Descricao,
    UrlImagem,
}

#[derive(DeriveIden, Clone, Copy)]
enum Produtos {
    Table,
    Id,
    Nome,
    Disponivel,
    Avaliacao,
    Estrelas,
    CidadeId,
    CategoriaId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Descricoes {
    Table,
    Id,
    Titulo,
    Texto,
    ProdutoId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Detalhes {
    Table,
    Id,
    NormasDaCasa,
    PoliticaDeCancelamento,
    SaudeESeguranca,
    ProdutoId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Localizacoes {
    Table,
    Id,
    Endereco,
    ProdutoId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Imagens {
    Table,
    Id,
    Titulo,
    Url,
    ProdutoId,
}

#[derive(DeriveIden, Clone, Copy)]
enum Caracteristicas {
    Table,
    Id,
    Nome,
    Icone,
    ProdutoId,
}
