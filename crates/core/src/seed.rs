//! Default catalog and settings.
//!
//! Used to seed the local store on first run, and as the read fallback when
//! the remote table service is unreachable and nothing is cached yet.

use rust_decimal::Decimal;

use crate::types::{Category, MenuItem, MenuItemId, SiteSettings};

fn item(
    id: &str,
    name: &str,
    description: &str,
    cents: i64,
    category: Category,
    image: &str,
) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::new(cents, 2),
        category,
        image: Some(image.to_owned()),
        available: true,
    }
}

/// The menu a fresh deployment starts with.
#[must_use]
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        item(
            "1",
            "Coca-Cola 500ml",
            "Refrigerante gelado",
            800,
            Category::Bebidas,
            "https://images.unsplash.com/photo-1622483767028-3f66f32aef97?w=400&h=400&fit=crop",
        ),
        item(
            "2",
            "Suco Natural",
            "Laranja, Limão ou Abacaxi",
            1200,
            Category::Bebidas,
            "https://images.unsplash.com/photo-1613478223719-2ab802602423?w=400&h=400&fit=crop",
        ),
        item(
            "3",
            "Caipirinha",
            "Limão com cachaça especial",
            1800,
            Category::Bebidas,
            "https://images.unsplash.com/photo-1513558161293-cdaf765ed2fd?w=400&h=400&fit=crop",
        ),
        item(
            "4",
            "Caldo de Caranguejo",
            "Acompanha torradinhas",
            2200,
            Category::Comidas,
            "https://images.unsplash.com/photo-1559847844-5315695dadae?w=400&h=400&fit=crop",
        ),
        item(
            "5",
            "Camarão ao Alho e Óleo",
            "Porção generosa de camarão rosa",
            6500,
            Category::Comidas,
            "https://images.unsplash.com/photo-1565557623262-b51c2513a641?w=400&h=400&fit=crop",
        ),
        item(
            "6",
            "Isca de Peixe",
            "Peixe empanado com molho tártaro",
            4500,
            Category::Petiscos,
            "https://images.unsplash.com/photo-1599304766858-867eb6722d43?w=400&h=400&fit=crop",
        ),
        item(
            "7",
            "Peixada Cearense",
            "Peixe cozido com legumes, pirão e arroz",
            8900,
            Category::PratosRegionais,
            "https://images.unsplash.com/photo-1582218084420-569a9e31d772?w=400&h=400&fit=crop",
        ),
    ]
}

/// The settings a fresh deployment starts with.
#[must_use]
pub fn default_settings() -> SiteSettings {
    SiteSettings {
        hero_title: "Barraca do Jangadeiro".to_owned(),
        hero_subtitle: "Conforto, sabor e vista para o mar.".to_owned(),
        whatsapp: "5585999999999".to_owned(),
        whatsapp_display: "(85) 99999-9999".to_owned(),
        instagram: "barracadojangadeiro".to_owned(),
        address: "Av. Zezé Diogo, 1234 - Praia do Futuro, Fortaleza - CE".to_owned(),
        business_hours: "Todos os dias: 08:00 às 18:00".to_owned(),
        maps_url: "https://www.google.com/maps?q=-3.7388,-38.4633&output=embed".to_owned(),
        location_lat: -3.7388,
        location_lng: -38.4633,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_menu_ids_are_unique() {
        let menu = default_menu();
        let ids: HashSet<&str> = menu.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), menu.len());
    }

    #[test]
    fn test_default_menu_prices_non_negative() {
        assert!(default_menu().iter().all(|i| !i.price.is_sign_negative()));
    }

    #[test]
    fn test_default_menu_covers_every_category() {
        let menu = default_menu();
        for category in Category::ALL {
            assert!(
                menu.iter().any(|i| i.category == category),
                "no seed item for {category}"
            );
        }
    }
}
