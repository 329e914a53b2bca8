use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::envelope::Entity;
use super::Table;
use crate::wire::FieldMap;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Recipe {
    pub name: String,
    pub description: String,
    /// One step per line.
    pub instructions: String,
    pub notes: String,
    pub nutrition: String,
    pub source: String,
    pub video_url: String,
    pub rating: u8,
    pub prep_time: Option<i32>,  // minutes
    pub total_time: Option<i32>, // minutes
    pub servings: Option<i32>,
    pub approved: bool,
    /// Logical image identifier shared with the recipe's image record.
    pub sync_id: String,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            instructions: String::new(),
            notes: String::new(),
            nutrition: String::new(),
            source: String::new(),
            video_url: String::new(),
            rating: 0,
            prep_time: None,
            total_time: None,
            servings: None,
            approved: false,
            sync_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Entity for Recipe {
    const TABLE: Table = Table::Recipes;
    const FIELDS: FieldMap = FieldMap::new(&[
        ("name", "name"),
        ("description", "description"),
        ("instructions", "instructions"),
        ("notes", "notes"),
        ("nutrition", "nutrition"),
        ("source", "source"),
        ("video_url", "videoUrl"),
        ("rating", "rating"),
        ("prep_time", "prepTime"),
        ("total_time", "totalTime"),
        ("servings", "servings"),
        ("approved", "isApproved"),
        ("sync_id", "syncId"),
    ]);
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Ratings outside 0..=5 are clamped.
    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.min(MAX_RATING);
    }

    /// Non-empty instruction lines, trimmed.
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.instructions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        if let Some(servings) = self.servings {
            writeln!(f, "Servings: {}", servings)?;
        }

        let times: Vec<String> = [
            self.prep_time.map(|t| format!("prep: {} min", t)),
            self.total_time.map(|t| format!("total: {} min", t)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !times.is_empty() {
            writeln!(f, "Time: {}", times.join(", "))?;
        }

        if self.rating > 0 {
            writeln!(
                f,
                "Rating: {}{}",
                "*".repeat(self.rating as usize),
                "-".repeat((MAX_RATING - self.rating.min(MAX_RATING)) as usize)
            )?;
        }
        if !self.approved {
            writeln!(f, "(awaiting approval)")?;
        }

        let steps: Vec<&str> = self.steps().collect();
        if !steps.is_empty() {
            writeln!(f, "\nInstructions:")?;
            for (i, step) in steps.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, step)?;
            }
        }

        if !self.notes.is_empty() {
            writeln!(f, "\nNotes: {}", self.notes)?;
        }
        if !self.nutrition.is_empty() {
            writeln!(f, "Nutrition: {}", self.nutrition)?;
        }
        if !self.source.is_empty() {
            writeln!(f, "Source: {}", self.source)?;
        }
        if !self.video_url.is_empty() {
            writeln!(f, "Video: {}", self.video_url)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_defaults() {
        let recipe = Recipe::new("Pancakes");
        assert_eq!(recipe.name, "Pancakes");
        assert!(!recipe.approved);
        assert_eq!(recipe.rating, 0);
        assert!(Uuid::parse_str(&recipe.sync_id).is_ok());
    }

    #[test]
    fn test_each_recipe_gets_its_own_sync_id() {
        assert_ne!(Recipe::new("a").sync_id, Recipe::new("b").sync_id);
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut recipe = Recipe::new("Toast");
        recipe.set_rating(9);
        assert_eq!(recipe.rating, 5);
        recipe.set_rating(3);
        assert_eq!(recipe.rating, 3);
    }

    #[test]
    fn test_steps_skip_blank_lines() {
        let mut recipe = Recipe::new("Tea");
        recipe.instructions = "Boil water.\n\n  Steep 3 minutes. \n".into();
        let steps: Vec<&str> = recipe.steps().collect();
        assert_eq!(steps, vec!["Boil water.", "Steep 3 minutes."]);
    }

    #[test]
    fn test_display_lists_numbered_steps() {
        let mut recipe = Recipe::new("Tea");
        recipe.instructions = "Boil water.\nSteep.".into();
        recipe.servings = Some(2);
        let text = recipe.to_string();
        assert!(text.contains("Servings: 2"));
        assert!(text.contains("  1. Boil water."));
        assert!(text.contains("  2. Steep."));
        assert!(text.contains("(awaiting approval)"));
    }

    #[test]
    fn test_missing_json_fields_use_defaults() {
        let recipe: Recipe = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        assert_eq!(recipe.name, "Bare");
        assert!(recipe.prep_time.is_none());
        assert!(!recipe.sync_id.is_empty());
    }
}
