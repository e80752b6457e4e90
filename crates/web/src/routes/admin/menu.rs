//! Admin menu manager route handlers.
//!
//! List, create, edit and delete menu items, plus the photo upload
//! endpoint used by the item forms. All writes go through the catalog
//! store; on the remote variant they are optimistic and the store has
//! already reconciled its cache by the time an error reaches here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use jangada_core::{Category, MenuItem, MenuItemId, MenuItemPatch, NewMenuItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::images;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::store::StoreError;

/// Largest accepted photo upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Request body cap for the upload route, installed as the route's
/// `DefaultBodyLimit`. Sits above [`MAX_UPLOAD_BYTES`] so an oversized
/// photo reaches the handler's own size check instead of failing
/// multipart parsing; the margin covers the multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Item form data, shared by create and update.
#[derive(Deserialize)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
    /// Price text as typed, comma or dot decimal separator.
    pub price: String,
    /// Category slug.
    pub category: String,
    /// Data URL produced by the upload endpoint, or empty to clear.
    #[serde(default)]
    pub image: String,
    /// Checkbox: absent means unavailable.
    #[serde(default)]
    pub available: Option<String>,
}

impl ItemForm {
    fn price(&self) -> Result<Decimal> {
        self.price
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| AppError::BadRequest("Preço inválido.".to_owned()))
    }

    fn category(&self) -> Result<Category> {
        self.category
            .parse()
            .map_err(|_| AppError::BadRequest("Categoria inválida.".to_owned()))
    }

    fn image(&self) -> Option<String> {
        let image = self.image.trim();
        if image.is_empty() {
            None
        } else {
            Some(image.to_owned())
        }
    }

    const fn available(&self) -> bool {
        self.available.is_some()
    }
}

/// Menu manager template (list + create form).
#[derive(Template, WebTemplate)]
#[template(path = "admin/menu.html")]
pub struct ManageMenuTemplate {
    pub items: Vec<MenuItem>,
    pub categories: Vec<CategoryOption>,
    pub error: Option<String>,
}

/// Edit form template for one item.
#[derive(Template, WebTemplate)]
#[template(path = "admin/menu_edit.html")]
pub struct EditItemTemplate {
    pub item: MenuItem,
    pub categories: Vec<CategoryOption>,
    pub error: Option<String>,
}

/// One entry in the category select.
pub struct CategoryOption {
    pub slug: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn category_options(selected: Option<Category>) -> Vec<CategoryOption> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryOption {
            slug: category.slug(),
            label: category.label(),
            selected: selected == Some(category),
        })
        .collect()
}

/// Display the menu manager.
#[instrument(skip(state, _admin))]
pub async fn manage_page(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
) -> Result<ManageMenuTemplate> {
    let items = state.store().menu().await?;
    Ok(ManageMenuTemplate {
        items,
        categories: category_options(None),
        error: None,
    })
}

/// Handle item creation.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let item = NewMenuItem {
        name: form.name.trim().to_owned(),
        description: form.description.trim().to_owned(),
        price: form.price()?,
        category: form.category()?,
        image: form.image(),
        available: form.available(),
    };

    match state.store().add_menu_item(item).await {
        Ok(created) => {
            tracing::info!(id = %created.id, "Menu item created");
            Ok(Redirect::to("/admin/cardapio").into_response())
        }
        Err(e) => {
            tracing::error!("Menu item creation failed: {e}");
            let items = state.store().menu().await?;
            Ok(ManageMenuTemplate {
                items,
                categories: category_options(None),
                error: Some(store_error_message(&e)),
            }
            .into_response())
        }
    }
}

/// Display the edit form for one item.
#[instrument(skip(state, _admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<EditItemTemplate> {
    let id = MenuItemId::new(id);
    let items = state.store().menu().await?;
    let item = items
        .into_iter()
        .find(|item| item.id == id)
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))?;

    let selected = item.category;
    Ok(EditItemTemplate {
        item,
        categories: category_options(Some(selected)),
        error: None,
    })
}

/// Handle item update.
#[instrument(skip_all, fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let id = MenuItemId::new(id);
    let patch = MenuItemPatch {
        name: Some(form.name.trim().to_owned()),
        description: Some(form.description.trim().to_owned()),
        price: Some(form.price()?),
        category: Some(form.category()?),
        // Some(None) clears a removed photo
        image: Some(form.image()),
        available: Some(form.available()),
    };

    match state.store().update_menu_item(&id, patch).await {
        Ok(()) => {
            tracing::info!("Menu item updated");
            Ok(Redirect::to("/admin/cardapio").into_response())
        }
        Err(StoreError::NotFound(id)) => Err(AppError::NotFound(format!("item {id}"))),
        Err(e) => {
            tracing::error!("Menu item update failed: {e}");
            let items = state.store().menu().await?;
            let item = items.into_iter().find(|item| item.id == id);
            match item {
                Some(item) => {
                    let selected = item.category;
                    Ok(EditItemTemplate {
                        item,
                        categories: category_options(Some(selected)),
                        error: Some(store_error_message(&e)),
                    }
                    .into_response())
                }
                None => Err(AppError::NotFound(format!("item {id}"))),
            }
        }
    }
}

/// Handle item deletion.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = MenuItemId::new(id);
    match state.store().delete_menu_item(&id).await {
        Ok(()) => {
            tracing::info!("Menu item deleted");
            Ok(Redirect::to("/admin/cardapio"))
        }
        // Already gone, nothing left to do
        Err(StoreError::NotFound(_)) => Ok(Redirect::to("/admin/cardapio")),
        Err(e) => Err(e.into()),
    }
}

/// Body of a successful photo upload.
#[derive(Serialize)]
pub struct UploadResponse {
    /// JPEG data URL ready for the item form's hidden field.
    pub image: String,
}

/// Handle a photo upload (multipart, field name `photo`).
#[instrument(skip_all)]
pub async fn upload_image(
    _admin: RequireAdminAuth,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("upload inválido: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("upload inválido: {e}")))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest("Imagem grande demais.".to_owned()));
        }
        let image = images::process_upload(&bytes)?;
        return Ok(Json(UploadResponse { image }));
    }

    Err(AppError::BadRequest("Nenhuma imagem enviada.".to_owned()))
}

fn store_error_message(error: &StoreError) -> String {
    match error {
        StoreError::Invalid(e) => e.to_string(),
        _ => "Não foi possível salvar. Tente novamente.".to_owned(),
    }
}
