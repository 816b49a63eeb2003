//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Appetizer,
    Main,
    Dessert,
    Beverage,
    Side,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 5] = [
        Self::Appetizer,
        Self::Main,
        Self::Dessert,
        Self::Beverage,
        Self::Side,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizer => "appetizer",
            Self::Main => "main",
            Self::Dessert => "dessert",
            Self::Beverage => "beverage",
            Self::Side => "side",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Appetizer => "Antipasti",
            Self::Main => "Primi Piatti",
            Self::Dessert => "Dolci",
            Self::Beverage => "Bevande",
            Self::Side => "Contorni",
        }
    }
}

impl std::fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutritional values (all optional, the service sends `{}` when unknown)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}

impl NutritionalInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: MenuCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Minutes
    pub preparation_time: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default, deserialize_with = "nutrition_or_default")]
    pub nutritional_info: NutritionalInfo,
}

fn default_true() -> bool {
    true
}

/// `null` and `{}` both mean "unknown"
fn nutrition_or_default<'de, D>(d: D) -> Result<NutritionalInfo, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<NutritionalInfo>::deserialize(d)?.unwrap_or_default())
}

/// Query for `GET /menu`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub category: Option<MenuCategory>,
    pub available: Option<bool>,
}

impl MenuFilter {
    pub fn available_only() -> Self {
        Self {
            category: None,
            available: Some(true),
        }
    }

    pub fn with_category(mut self, category: MenuCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Query-string pairs, omitting unset fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category) = self.category {
            query.push(("category", category.as_str().to_string()));
        }
        if let Some(available) = self.available {
            query.push(("available", available.to_string()));
        }
        query
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: MenuCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub preparation_time: u32,
    pub is_available: Option<bool>,
    #[serde(default)]
    pub allergens: Vec<String>,
    pub nutritional_info: Option<NutritionalInfo>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MenuCategory>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
}

impl MenuItemUpdate {
    /// Payload that only flips availability
    pub fn availability(is_available: bool) -> Self {
        Self {
            is_available: Some(is_available),
            ..Default::default()
        }
    }
}
