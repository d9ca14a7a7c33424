//! Custom field lookup.

use serde_json::Value;

use crate::TaskRecord;

/// Returns the value of the first custom field named `field_name`.
///
/// Names are compared case-insensitively. Only the first matching field is
/// consulted, even when later fields share the same name. Returns `None` when
/// no field matches or when the matching field is unset (`null`).
pub fn extract<'a>(task: &'a TaskRecord, field_name: &str) -> Option<&'a Value> {
    let wanted = field_name.to_lowercase();
    task.custom_fields
        .iter()
        .find(|field| field.name.to_lowercase() == wanted)
        .map(|field| &field.value)
        .filter(|value| !value.is_null())
}
