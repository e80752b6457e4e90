//! Menu page and filtered grid fragment.
//!
//! The full page renders the category tabs, the search box and the grid;
//! the grid alone is also served as an HTMX fragment so filtering swaps
//! just the item cards.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use jangada_core::{Category, CategoryFilter, MenuItem, SiteSettings, filter_menu};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Filter parameters, shared by the page and the fragment.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Category slug, or "todos" / absent for all.
    pub categoria: Option<String>,
    /// Free text matched against name and description.
    pub q: Option<String>,
}

impl MenuQuery {
    /// Unknown category slugs fall back to showing everything.
    fn category(&self) -> CategoryFilter {
        self.categoria
            .as_deref()
            .and_then(|slug| slug.parse().ok())
            .unwrap_or(CategoryFilter::All)
    }

    fn query(&self) -> &str {
        self.q.as_deref().unwrap_or("").trim()
    }
}

/// One tab in the category bar.
pub struct CategoryTab {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

fn category_tabs(selected: CategoryFilter) -> Vec<CategoryTab> {
    let mut tabs = vec![CategoryTab {
        slug: "todos",
        label: "Todos",
        active: selected == CategoryFilter::All,
    }];
    for category in Category::ALL {
        tabs.push(CategoryTab {
            slug: category.slug(),
            label: category.label(),
            active: selected == CategoryFilter::Only(category),
        });
    }
    tabs
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub settings: SiteSettings,
    pub tabs: Vec<CategoryTab>,
    pub query: String,
    pub items: Vec<MenuItem>,
    /// Slug of the active category selection, `todos` for all.
    pub active_slug: &'static str,
}

/// Menu grid fragment template.
///
/// Carries the active category in a hidden field so a search request
/// fired after a tab swap still filters within that category.
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu_grid.html")]
pub struct MenuGridTemplate {
    pub items: Vec<MenuItem>,
    pub active_slug: &'static str,
}

async fn filtered_items(state: &AppState, params: &MenuQuery) -> Result<Vec<MenuItem>> {
    let items = state.store().menu().await?;
    let filtered = filter_menu(&items, params.category(), params.query())
        .into_iter()
        .cloned()
        .collect();
    Ok(filtered)
}

/// Display the menu page.
#[instrument(skip(state))]
pub async fn menu_page(
    State(state): State<AppState>,
    Query(params): Query<MenuQuery>,
) -> Result<MenuTemplate> {
    let settings = state.store().settings().await?;
    let items = filtered_items(&state, &params).await?;

    Ok(MenuTemplate {
        settings,
        tabs: category_tabs(params.category()),
        query: params.query().to_owned(),
        items,
        active_slug: params.category().slug(),
    })
}

/// Serve the filtered grid fragment (HTMX swap target).
#[instrument(skip(state))]
pub async fn menu_grid(
    State(state): State<AppState>,
    Query(params): Query<MenuQuery>,
) -> Result<MenuGridTemplate> {
    let items = filtered_items(&state, &params).await?;
    Ok(MenuGridTemplate {
        items,
        active_slug: params.category().slug(),
    })
}

#[cfg(test)]
mod tests {
    use jangada_core::seed;

    use super::*;

    #[test]
    fn test_grid_fragment_carries_the_active_category() {
        let html = MenuGridTemplate {
            items: Vec::new(),
            active_slug: "petiscos",
        }
        .render()
        .expect("render grid");
        assert!(html.contains(r#"name="categoria" value="petiscos""#));
    }

    #[test]
    fn test_search_box_includes_the_category_field() {
        let html = MenuTemplate {
            settings: seed::default_settings(),
            tabs: category_tabs(CategoryFilter::Only(Category::Petiscos)),
            query: "caldo".to_owned(),
            items: Vec::new(),
            active_slug: "petiscos",
        }
        .render()
        .expect("render page");
        assert!(html.contains(r##"hx-include="#menu-category""##));
    }

    #[test]
    fn test_tab_links_keep_the_search_query() {
        let html = MenuTemplate {
            settings: seed::default_settings(),
            tabs: category_tabs(CategoryFilter::All),
            query: "caldo".to_owned(),
            items: Vec::new(),
            active_slug: "todos",
        }
        .render()
        .expect("render page");
        assert!(html.contains("/menu?categoria=bebidas&q=caldo"));
    }
}
