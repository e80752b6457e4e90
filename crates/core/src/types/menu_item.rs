//! Menu item domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::MenuItemId;

/// Errors validating menu item data.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MenuItemError {
    /// The item name is empty or whitespace.
    #[error("item name cannot be empty")]
    EmptyName,
    /// The price is negative.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// A menu item as served to the site and the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier within the catalog.
    pub id: MenuItemId,
    /// Display name.
    pub name: String,
    /// Short description shown on the menu card.
    pub description: String,
    /// Price in the local currency. Never negative.
    pub price: Decimal,
    /// Category the item is listed under.
    pub category: Category,
    /// Image reference: a URL or an inline `data:` encoded bitmap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the item is currently offered. Unavailable items are
    /// hidden from the public menu but kept in the admin list.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// A menu item before the store has issued an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl NewMenuItem {
    /// Validate the draft item.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the price is negative.
    pub fn validate(&self) -> Result<(), MenuItemError> {
        if self.name.trim().is_empty() {
            return Err(MenuItemError::EmptyName);
        }
        if self.price.is_sign_negative() {
            return Err(MenuItemError::NegativePrice(self.price));
        }
        Ok(())
    }

    /// Attach a store-issued identifier, producing a full [`MenuItem`].
    #[must_use]
    pub fn with_id(self, id: MenuItemId) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            available: self.available,
        }
    }
}

/// Partial update of a menu item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// `Some(None)` clears the image, `Some(Some(_))` replaces it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl MenuItemPatch {
    /// Whether this patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.available.is_none()
    }

    /// Validate the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns an error if a present name is blank or a present price is
    /// negative.
    pub fn validate(&self) -> Result<(), MenuItemError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(MenuItemError::EmptyName);
        }
        if let Some(price) = self.price
            && price.is_sign_negative()
        {
            return Err(MenuItemError::NegativePrice(price));
        }
        Ok(())
    }

    /// Apply this patch to an item in place.
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            item.description.clone_from(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(image) = &self.image {
            item.image.clone_from(image);
        }
        if let Some(available) = self.available {
            item.available = available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewMenuItem {
        NewMenuItem {
            name: "Caldo de Caranguejo".to_owned(),
            description: "Tradicional caldo cremoso com patinhas.".to_owned(),
            price: Decimal::new(2200, 2),
            category: Category::Comidas,
            image: None,
            available: true,
        }
    }

    #[test]
    fn test_validate_accepts_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut item = draft();
        item.name = "   ".to_owned();
        assert!(matches!(item.validate(), Err(MenuItemError::EmptyName)));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut item = draft();
        item.price = Decimal::new(-1, 2);
        assert!(matches!(
            item.validate(),
            Err(MenuItemError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_validate_accepts_zero_price() {
        let mut item = draft();
        item.price = Decimal::ZERO;
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_with_id_preserves_fields() {
        let item = draft().with_id(MenuItemId::new("7"));
        assert_eq!(item.id.as_str(), "7");
        assert_eq!(item.name, "Caldo de Caranguejo");
        assert!(item.available);
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut item = draft().with_id(MenuItemId::new("1"));
        let patch = MenuItemPatch {
            price: Some(Decimal::new(2500, 2)),
            available: Some(false),
            ..MenuItemPatch::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.price, Decimal::new(2500, 2));
        assert!(!item.available);
        assert_eq!(item.name, "Caldo de Caranguejo");
    }

    #[test]
    fn test_patch_can_clear_image() {
        let mut item = draft().with_id(MenuItemId::new("1"));
        item.image = Some("https://example.com/caldo.jpg".to_owned());
        let patch = MenuItemPatch {
            image: Some(None),
            ..MenuItemPatch::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.image, None);
    }

    #[test]
    fn test_available_defaults_true_on_deserialize() {
        let json = r#"{
            "id": "1",
            "name": "Suco Natural",
            "description": "Laranja ou limao.",
            "price": "12.00",
            "category": "bebidas"
        }"#;
        let item: MenuItem = serde_json::from_str(json).expect("deserialize");
        assert!(item.available);
        assert_eq!(item.image, None);
    }
}
