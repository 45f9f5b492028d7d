//! Built-in categories offered when registering a transaction

use serde::Serialize;

use crate::transaction::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

impl CategoryInfo {
    /// The free-text pair stored on a transaction
    pub fn to_category(&self) -> Category {
        Category::new(self.name, self.icon)
    }
}

pub static CATEGORIES: [CategoryInfo; 6] = [
    CategoryInfo { key: "purchases", name: "Compras", icon: "shopping-bag" },
    CategoryInfo { key: "food", name: "Alimentação", icon: "coffee" },
    CategoryInfo { key: "salary", name: "Salário", icon: "dollar-sign" },
    CategoryInfo { key: "car", name: "Carro", icon: "crosshair" },
    CategoryInfo { key: "leisure", name: "Lazer", icon: "heart" },
    CategoryInfo { key: "studies", name: "Estudos", icon: "book" },
];

pub fn find_category(key: &str) -> Option<&'static CategoryInfo> {
    let key = key.trim();
    CATEGORIES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}
