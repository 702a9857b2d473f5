use sqlx::PgConnection;

use crate::{
    error::Result,
    models::{NewProduct, Product},
};

pub async fn insert_product(conn: &mut PgConnection, product: &NewProduct) -> Result<()> {
    sqlx::query(
        "INSERT INTO produtos (nome, descricao, preco, imagem_url)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.image_url.as_deref())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn list_products(conn: &mut PgConnection) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT nome, descricao, preco, imagem_url FROM produtos",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(products)
}
