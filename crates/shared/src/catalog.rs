//! Item catalog loading and validation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{domain::Item, error::CatalogError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Parses a TOML catalog (`[[items]]` tables) and validates every entry.
pub fn parse_catalog(raw: &str) -> Result<Vec<Item>, CatalogError> {
    let catalog: Catalog = toml::from_str(raw)?;
    validate_items(&catalog.items)?;
    Ok(catalog.items)
}

pub fn validate_items(items: &[Item]) -> Result<(), CatalogError> {
    for (index, item) in items.iter().enumerate() {
        validate_item(index, item)?;
    }
    Ok(())
}

fn validate_item(index: usize, item: &Item) -> Result<(), CatalogError> {
    if item.title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle { index });
    }

    if !is_hex_color(&item.color) {
        return Err(CatalogError::InvalidColor {
            index,
            title: item.title.clone(),
            color: item.color.clone(),
        });
    }

    if let Some(link) = &item.link {
        Url::parse(link).map_err(|source| CatalogError::InvalidLink {
            index,
            title: item.title.clone(),
            link: link.clone(),
            source,
        })?;
    }

    Ok(())
}

fn is_hex_color(raw: &str) -> bool {
    let Some(digits) = raw.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
