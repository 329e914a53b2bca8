//! Quantity scaling for recipes served at a different size.

use crate::models::Ingredient;

/// Multiplies a quantity by `factor`; unknown quantities stay unknown.
pub fn scale_value(value: Option<f64>, factor: f64) -> Option<f64> {
    value.map(|v| v * factor)
}

/// Factor that turns `original` servings into `desired` servings.
///
/// Unknown or non-positive originals scale by 1.
pub fn calculate_scale_factor(original: Option<f64>, desired: f64) -> f64 {
    match original {
        Some(original) if original > 0.0 => desired / original,
        _ => 1.0,
    }
}

/// The ingredient with its amount multiplied by `factor`.
pub fn scale_ingredient(ingredient: &Ingredient, factor: f64) -> Ingredient {
    Ingredient {
        amount: scale_value(ingredient.amount, factor),
        ..ingredient.clone()
    }
}

/// Formats a quantity with at most two decimals and no trailing zeros.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_value() {
        assert_eq!(scale_value(Some(4.0), 2.0), Some(8.0));
        assert_eq!(scale_value(Some(3.0), 0.5), Some(1.5));
        assert_eq!(scale_value(None, 2.0), None);
    }

    #[test]
    fn test_calculate_scale_factor() {
        assert_eq!(calculate_scale_factor(None, 3.0), 1.0);
        assert_eq!(calculate_scale_factor(Some(4.0), 2.0), 0.5);
        assert_eq!(calculate_scale_factor(Some(2.0), 6.0), 3.0);
    }

    #[test]
    fn test_calculate_scale_factor_non_positive_original() {
        assert_eq!(calculate_scale_factor(Some(0.0), 4.0), 1.0);
        assert_eq!(calculate_scale_factor(Some(-2.0), 4.0), 1.0);
    }

    #[test]
    fn test_scale_ingredient_keeps_other_fields() {
        let ingredient = Ingredient::new(Some(200.0), "g", "rice");
        let scaled = scale_ingredient(&ingredient, 1.5);
        assert_eq!(scaled.amount, Some(300.0));
        assert_eq!(scaled.unit, "g");
        assert_eq!(scaled.name, "rice");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(0.125), "0.13");
    }
}
