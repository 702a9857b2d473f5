use minijinja::{Environment, context};
use serde::Serialize;

use crate::{
    error::Result,
    models::{Notices, Product},
    views::card_grid::{Card, card_rows},
};

pub const PAGE_TITLE: &str = "Cadastro de Produtos";
pub const EMPTY_CATALOG: &str = "Nenhum produto cadastrado.";

const PAGE_TEMPLATE: &str = r#"{% macro listing(rows, notices) %}
  {% for row in rows %}
  <div class="row">
    {% for card in row %}
    <div class="card">
      <h3>{{ card.name }}</h3>
      <p><strong>Descrição:</strong> {{ card.description }}</p>
      <p><strong>Preço:</strong> {{ card.price }}</p>
      {% if card.image_url %}
      <figure>
        <img src="{{ card.image_url }}" width="200" alt="{{ card.name }}">
        <figcaption>{{ card.name }}</figcaption>
      </figure>
      {% endif %}
      <hr>
    </div>
    {% endfor %}
  </div>
  {% endfor %}
  {% for notice in notices %}
  <div class="notice {{ notice.level }}">{{ notice.message }}</div>
  {% endfor %}
{% endmacro %}
<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <style>
    body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; }
    form.product label { display: block; margin-top: .75rem; }
    .notice { padding: .5rem .75rem; margin: .5rem 0; border-radius: 4px; }
    .success { background: #e6f4ea; } .info { background: #e8f0fe; }
    .warning { background: #fef7e0; } .error { background: #fce8e6; }
    .row { display: flex; gap: 1rem; margin-bottom: 1rem; }
    .card { flex: 0 0 calc((100% - {{ cards_per_row - 1 }}rem) / {{ cards_per_row }}); }
    figure { margin: 0; }
  </style>
</head>
<body>
  <h1>{{ title }}</h1>
  <form class="product" method="post" action="/products" enctype="multipart/form-data">
    <label>Nome do Produto <input type="text" name="name"></label>
    <label>Descrição do Produto <textarea name="description"></textarea></label>
    <label>Preço do Produto <input type="number" name="price" min="0" step="0.01" value="0.00"></label>
    <label>Imagem do Produto <input type="file" name="image" accept=".jpg,.jpeg,.png"></label>
    <button type="submit">Salvar Produto</button>
  </form>
  {% for notice in form_notices %}
  <div class="notice {{ notice.level }}">{{ notice.message }}</div>
  {% endfor %}
  {% if show_listing and saved_listing %}{{ listing(rows, listing_notices) }}{% endif %}

  <h2>Produtos Cadastrados</h2>
  <form method="get" action="/products">
    <button type="submit">Listar Produtos</button>
  </form>
  {% if show_listing and not saved_listing %}{{ listing(rows, listing_notices) }}{% endif %}
</body>
</html>
"#;

/// Product list shown under the form.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub rows: Vec<Vec<Card>>,
    pub notices: Notices,
}

impl Listing {
    /// Builds the grid, adding the empty-catalog placeholder when needed.
    pub fn new(products: &[Product], mut notices: Notices) -> Self {
        if products.is_empty() {
            notices.info(EMPTY_CATALOG);
        }

        Self {
            rows: card_rows(products),
            notices,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub form_notices: Notices,
    pub listing: Option<Listing>,
    /// Listing produced by a save is shown next to the form feedback.
    pub listing_after_save: bool,
}

pub fn render(view: &PageView) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("index.html", PAGE_TEMPLATE)?;

    let template = env.get_template("index.html")?;
    let html = template.render(context! {
        title => PAGE_TITLE,
        cards_per_row => crate::views::CARDS_PER_ROW,
        form_notices => &view.form_notices,
        rows => view.listing.as_ref().map(|l| &l.rows),
        listing_notices => view.listing.as_ref().map(|l| &l.notices),
        show_listing => view.listing.is_some(),
        saved_listing => view.listing_after_save,
    })?;

    Ok(html)
}
