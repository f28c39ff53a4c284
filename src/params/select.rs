use super::tokens;
use crate::schema::Field;
use serde_json::Value;

/// Resolves a selection expression against `candidates`.
///
/// Unknown tokens are ignored and duplicates collapse. When nothing valid is
/// selected the whole candidate set is returned, so the result is never empty
/// unless the catalog itself has no fields in this category.
pub fn select_fields(raw: Option<&Value>, candidates: &[Field]) -> Vec<Field> {
    let mut selected: Vec<Field> = Vec::new();
    for token in tokens::flatten(raw) {
        let Some(field) = candidates.iter().find(|f| f.name == token) else {
            continue;
        };
        if !selected.contains(field) {
            selected.push(field.clone());
        }
    }

    if selected.is_empty() {
        candidates.to_vec()
    } else {
        selected
    }
}
