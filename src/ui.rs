//! Server-rendered landing page: the school index and the curated
//! ranking, substituted into the embedded template.

use crate::session::catalog::{FeaturedCard, SchoolCard};

pub fn render_index(schools: &[SchoolCard], featured: &[FeaturedCard]) -> String {
    INDEX_HTML
        .replace("{{SCHOOL_CARDS}}", &school_cards_html(schools))
        .replace("{{FEATURED_CARDS}}", &featured_cards_html(featured))
}

fn school_cards_html(cards: &[SchoolCard]) -> String {
    if cards.is_empty() {
        return r#"<p class="empty">Nessuna scuola disponibile</p>"#.to_string();
    }
    cards
        .iter()
        .map(|card| {
            format!(
                concat!(
                    r#"<a class="card school" href="/server/classes.json" data-school-id="{id}">"#,
                    r#"<span class="card-head" style="background-color: {accent};">"#,
                    r#"<i class="fas {icon}"></i></span>"#,
                    r#"<span class="card-title">{title}</span></a>"#
                ),
                id = escape(&card.id),
                accent = escape(&card.accent),
                icon = escape(&card.icon),
                title = escape(&card.title),
            )
        })
        .collect()
}

fn featured_cards_html(cards: &[FeaturedCard]) -> String {
    if cards.is_empty() {
        return r#"<p class="empty">Nessun progetto classificato trovato</p>"#.to_string();
    }
    cards
        .iter()
        .map(|card| {
            format!(
                concat!(
                    r#"<a class="card featured" href="/progetti/{id}/index.html" data-project-id="{id}">"#,
                    r#"<span class="card-head"><i class="fas {icon}"></i>"#,
                    r#"<span class="rank">{rank}</span></span>"#,
                    r#"<span class="card-title">{title}</span>"#,
                    r#"<span class="card-sub">{class}</span></a>"#
                ),
                id = escape(&card.project_id),
                icon = escape(&card.icon),
                rank = card.rank,
                title = escape(&card.title),
                class = escape(&card.class_label),
            )
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="it">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Biblioteca Twine</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.0/css/all.min.css" />
  <style>
    :root {
      --bg: #f6f1e7;
      --ink: #2b2a28;
      --card: #ffffff;
      --accent: #ff8c00;
      --shadow: 0 14px 36px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
      display: grid;
      justify-items: center;
      gap: 28px;
    }

    header {
      text-align: center;
    }

    h1 {
      margin: 0;
      font-family: Georgia, serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
    }

    .subtitle {
      margin: 6px 0 0;
      color: #6b645d;
    }

    section {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 26px;
    }

    h2 {
      margin: 0 0 16px;
      font-size: 1.3rem;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      display: grid;
      gap: 8px;
      text-decoration: none;
      color: inherit;
      border: 1px solid rgba(47, 72, 88, 0.1);
      border-radius: 16px;
      overflow: hidden;
      padding-bottom: 14px;
      transition: transform 120ms ease;
    }

    .card:hover {
      transform: translateY(-2px);
    }

    .card-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 16px;
      font-size: 1.4rem;
      color: white;
      background-color: var(--accent);
    }

    .rank {
      font-weight: 700;
      font-size: 1rem;
    }

    .card-title {
      padding: 0 14px;
      font-weight: 600;
    }

    .card-sub {
      padding: 0 14px;
      color: #8b857d;
      font-size: 0.85rem;
    }

    .empty {
      color: #8b857d;
    }
  </style>
</head>
<body>
  <header>
    <h1>Biblioteca Twine</h1>
    <p class="subtitle">Storie interattive scritte dagli studenti</p>
  </header>

  <section>
    <h2>Scuole</h2>
    <div class="grid">{{SCHOOL_CARDS}}</div>
  </section>

  <section>
    <h2>Classificati</h2>
    <div class="grid">{{FEATURED_CARDS}}</div>
  </section>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cards_and_empty_states() {
        let page = render_index(&[], &[]);
        assert!(page.contains("Nessuna scuola disponibile"));
        assert!(page.contains("Nessun progetto classificato trovato"));

        let schools = vec![SchoolCard {
            id: "tenca".into(),
            title: "Liceo Statale \"Carlo Tenca\"".into(),
            icon: "fa-book".into(),
            accent: "#FF8C00".into(),
        }];
        let featured = vec![FeaturedCard {
            rank: 1,
            project_id: "tenca_classe3C_storia".into(),
            title: "La <Storia>".into(),
            class_label: "3C - TENCA".into(),
            icon: "fa-trophy".into(),
        }];
        let page = render_index(&schools, &featured);
        assert!(page.contains("Carlo Tenca"));
        assert!(page.contains("La &lt;Storia&gt;"));
        assert!(page.contains("fa-trophy"));
    }
}
