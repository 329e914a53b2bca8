use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The syncable tables, shared between the local store and the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Tags,
    Recipes,
    Ingredients,
    RecipeTags,
    RecipeImages,
}

impl Table {
    /// Parents come before the children that reference them.
    pub const SYNC_ORDER: [Table; 5] = [
        Table::Tags,
        Table::Recipes,
        Table::Ingredients,
        Table::RecipeTags,
        Table::RecipeImages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Tags => "tags",
            Table::Recipes => "recipes",
            Table::Ingredients => "ingredients",
            Table::RecipeTags => "recipe_tags",
            Table::RecipeImages => "recipe_images",
        }
    }

    /// Position in [`Table::SYNC_ORDER`].
    pub fn sync_rank(self) -> usize {
        Self::SYNC_ORDER
            .iter()
            .position(|t| *t == self)
            .unwrap_or(Self::SYNC_ORDER.len())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        Self::SYNC_ORDER
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid table '{}'. Valid options: tags, recipes, ingredients, recipe_tags, recipe_images",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_rank_before_children() {
        assert!(Table::Recipes.sync_rank() < Table::Ingredients.sync_rank());
        assert!(Table::Tags.sync_rank() < Table::RecipeTags.sync_rank());
        assert!(Table::Recipes.sync_rank() < Table::RecipeTags.sync_rank());
    }

    #[test]
    fn test_table_from_str() {
        assert_eq!(Table::from_str("recipe-tags").unwrap(), Table::RecipeTags);
        assert_eq!(Table::from_str("RECIPES").unwrap(), Table::Recipes);
        assert!(Table::from_str("dishes").is_err());
    }

    #[test]
    fn test_table_serializes_as_name() {
        let json = serde_json::to_string(&Table::RecipeImages).unwrap();
        assert_eq!(json, "\"recipe_images\"");
    }
}
