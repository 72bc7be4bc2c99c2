use super::entity::Category;
use crate::domain::{DomainError, DomainResult};

/// Validates the invariants a Category must satisfy before it is persisted
pub fn validate_category(category: &Category) -> DomainResult<()> {
    validate_name(&category.name)?;
    validate_parent(category)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_parent(category: &Category) -> DomainResult<()> {
    if category.parent_id < 0 {
        return Err(DomainError::InvariantViolation(format!(
            "Parent id {} is negative",
            category.parent_id
        )));
    }
    if category.id != 0 && category.parent_id == category.id {
        return Err(DomainError::InvariantViolation(format!(
            "Category {} cannot be its own parent",
            category.id
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Category domain:
///
/// 1. Name cannot be empty
/// 2. Parent id is 0 (root) or another category's id
/// 3. A category is never its own parent
/// 4. Deletion is a soft flag, rows are never removed

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_category() {
        let category = Category::new("Electronics");
        assert!(validate_category(&category).is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let category = Category::new("   ");
        assert!(validate_category(&category).is_err());
    }

    #[test]
    fn test_self_parent_fails() {
        let mut category = Category::new("Loop");
        category.id = 7;
        category.parent_id = 7;
        assert!(validate_category(&category).is_err());
    }
}
