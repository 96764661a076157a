//! One-hot encoding with a dropped reference category.

use std::collections::BTreeSet;

use crate::data::{indicator_name, Column};

/// Category levels of one field, learned from training data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLevels {
    pub field: String,
    /// First category in sorted order; represented by all indicators being zero.
    pub reference: Option<String>,
    /// Remaining categories, in sorted order, one indicator column each.
    pub encoded: Vec<String>,
}

impl CategoryLevels {
    /// Collect the distinct non-missing values of `column`, sorted.
    pub fn fit(column: &Column) -> Self {
        let distinct: BTreeSet<String> = (0..column.len()).filter_map(|r| column.text_at(r)).collect();
        let mut levels = distinct.into_iter();
        let reference = levels.next();
        Self {
            field: column.name().to_string(),
            reference,
            encoded: levels.collect(),
        }
    }

    pub fn indicator_names(&self) -> impl Iterator<Item = String> + '_ {
        self.encoded.iter().map(|c| indicator_name(&self.field, c))
    }

    /// Indicator columns for `column`.
    ///
    /// Missing cells and the reference category give all-zero rows.
    pub fn encode(&self, column: &Column) -> Vec<Column> {
        let cells: Vec<Option<String>> = (0..column.len()).map(|r| column.text_at(r)).collect();
        self.encoded
            .iter()
            .map(|category| {
                let values = cells
                    .iter()
                    .map(|cell| if cell.as_deref() == Some(category.as_str()) { 1.0 } else { 0.0 })
                    .collect();
                Column::numeric(indicator_name(&self.field, category), values)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soil() -> Column {
        Column::text(
            "tipo_solo",
            vec![
                Some("Siltoso".into()),
                Some("Argiloso".into()),
                None,
                Some("Arenoso".into()),
                Some("Siltoso".into()),
            ],
        )
    }

    #[test]
    fn reference_is_first_sorted_category() {
        let levels = CategoryLevels::fit(&soil());
        assert_eq!(levels.reference.as_deref(), Some("Arenoso"));
        assert_eq!(levels.encoded, vec!["Argiloso", "Siltoso"]);
        let names: Vec<_> = levels.indicator_names().collect();
        assert_eq!(names, vec!["tipo_solo_Argiloso", "tipo_solo_Siltoso"]);
    }

    #[test]
    fn encode_sets_one_indicator_per_row() {
        let column = soil();
        let levels = CategoryLevels::fit(&column);
        let encoded = levels.encode(&column);
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].as_numeric().unwrap(), &[0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(encoded[1].as_numeric().unwrap(), &[1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn single_category_yields_no_indicator() {
        let column = Column::text("f", vec![Some("only".into()), Some("only".into())]);
        let levels = CategoryLevels::fit(&column);
        assert_eq!(levels.reference.as_deref(), Some("only"));
        assert!(levels.encode(&column).is_empty());
    }
}
