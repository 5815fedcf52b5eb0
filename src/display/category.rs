//! Category display formatting

use tabled::Tabled;

use super::render_table;
use crate::models::{Category, OperationKind};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Kind")]
    kind: OperationKind,
    #[tabled(rename = "Name")]
    name: String,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let rows = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.get(),
            kind: c.kind,
            name: c.name.clone(),
        })
        .collect();

    render_table(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    #[test]
    fn test_list() {
        let categories = vec![
            Category::new(CategoryId::new(1), OperationKind::Expense, "Food"),
            Category::new(CategoryId::new(2), OperationKind::Income, "Salary"),
        ];
        let output = format_category_list(&categories);
        assert!(output.contains("EXPENSE"));
        assert!(output.contains("Salary"));
        assert_eq!(format_category_list(&[]), "No categories found.\n");
    }
}
