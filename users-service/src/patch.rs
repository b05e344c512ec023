//! Partial updates expressed as JSON Patch documents
//!
//! A [`PatchDocument`] is an ordered list of operations that target the three
//! editable user fields by JSON pointer (`/login`, `/firstName`, `/lastName`).
//! It is applied to an [`UpdateUser`] projection, never to the stored entity, so
//! a rejected patch has no effect on the repository.
//!
//! Each element of the document is decoded on its own. An element that is not
//! a well-formed operation (unknown `op`, missing `path`, `from` or `value`),
//! and an operation that cannot be applied (unknown path, non-string value,
//! failed `test`), is recorded as an error and skipped; the remaining operations
//! still run. The caller merges these errors with the result of validating the
//! patched projection.
//!
//! ```rust
//! use users_service::models::UpdateUser;
//! use users_service::patch::PatchDocument;
//!
//! let doc: PatchDocument = serde_json::from_str(
//!     r#"[{"op":"replace","path":"/firstName","value":"Jane"}]"#,
//! ).unwrap();
//!
//! let mut target = UpdateUser::new("jdoe", "John", "Doe");
//! let errors = doc.apply_to(&mut target);
//!
//! assert!(!errors.has_errors());
//! assert_eq!(target.first_name, "Jane");
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::UpdateUser;
use crate::validation::{ValidationErrors, FIRST_NAME, LAST_NAME, LOGIN};

/// Error key used for problems that cannot be attributed to a known field
pub const PATCH_KEY: &str = "patch";

/// One JSON Patch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    /// Name of the operation as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Replace { .. } => "replace",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::Test { .. } => "test",
        }
    }
}

impl TryFrom<&Value> for PatchOperation {
    type Error = PatchError;

    fn try_from(value: &Value) -> Result<Self, PatchError> {
        RawOperation::deserialize(value)
            .map_err(|e| PatchError::Malformed(e.to_string()))?
            .into_operation()
    }
}

/// Wire shape of an operation before its members are checked
#[derive(Debug, Deserialize)]
struct RawOperation {
    op: Option<String>,
    path: Option<String>,
    from: Option<String>,
    #[serde(default, deserialize_with = "present")]
    value: Option<Value>,
}

/// Keeps an explicit `"value": null` distinct from an absent member
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn required<T>(member: Option<T>, op: &'static str, name: &'static str) -> Result<T, PatchError> {
    member.ok_or(PatchError::MissingMember { op, member: name })
}

impl RawOperation {
    fn into_operation(self) -> Result<PatchOperation, PatchError> {
        let op = self.op.ok_or(PatchError::MissingOperation)?;
        let operation = match op.as_str() {
            "add" => PatchOperation::Add {
                path: required(self.path, "add", "path")?,
                value: required(self.value, "add", "value")?,
            },
            "remove" => PatchOperation::Remove {
                path: required(self.path, "remove", "path")?,
            },
            "replace" => PatchOperation::Replace {
                path: required(self.path, "replace", "path")?,
                value: required(self.value, "replace", "value")?,
            },
            "move" => PatchOperation::Move {
                from: required(self.from, "move", "from")?,
                path: required(self.path, "move", "path")?,
            },
            "copy" => PatchOperation::Copy {
                from: required(self.from, "copy", "from")?,
                path: required(self.path, "copy", "path")?,
            },
            "test" => PatchOperation::Test {
                path: required(self.path, "test", "path")?,
                value: required(self.value, "test", "value")?,
            },
            _ => return Err(PatchError::UnknownOperation(op)),
        };
        Ok(operation)
    }
}

/// Ordered list of patch operations
///
/// Only the outer array is checked when the document is decoded; each element
/// is decoded when the document is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(Vec<Value>);

impl PatchDocument {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply every operation in order, collecting failures
    pub fn apply_to(&self, target: &mut UpdateUser) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (index, entry) in self.0.iter().enumerate() {
            let result = PatchOperation::try_from(entry)
                .and_then(|operation| apply_operation(operation, target));
            if let Err(err) = result {
                tracing::debug!(index, error = %err, "Patch operation rejected");
                errors.add(err.key(), err.to_string());
            }
        }
        errors
    }
}

/// Editable user field addressed by a JSON pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Login,
    FirstName,
    LastName,
}

impl Field {
    /// Resolve a JSON pointer such as `/firstName` (case-insensitive)
    fn from_pointer(pointer: &str) -> Option<Self> {
        let name = pointer.strip_prefix('/')?;
        [Self::Login, Self::FirstName, Self::LastName]
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => LOGIN,
            Self::FirstName => FIRST_NAME,
            Self::LastName => LAST_NAME,
        }
    }

    fn get(self, target: &UpdateUser) -> &str {
        match self {
            Self::Login => &target.login,
            Self::FirstName => &target.first_name,
            Self::LastName => &target.last_name,
        }
    }

    fn slot(self, target: &mut UpdateUser) -> &mut String {
        match self {
            Self::Login => &mut target.login,
            Self::FirstName => &mut target.first_name,
            Self::LastName => &mut target.last_name,
        }
    }
}

/// Reason a single operation could not be decoded or applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    Malformed(String),
    MissingOperation,
    UnknownOperation(String),
    MissingMember { op: &'static str, member: &'static str },
    UnknownPath(String),
    InvalidValue { field: Field, value: String },
    TestFailed { field: Field, expected: String, actual: String },
}

impl PatchError {
    /// Key under which the error is reported in the validation map
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvalidValue { field, .. } | Self::TestFailed { field, .. } => field.name(),
            _ => PATCH_KEY,
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "Invalid patch operation: {}", reason),
            Self::MissingOperation => write!(f, "Patch operation is missing the 'op' member"),
            Self::UnknownOperation(op) => write!(f, "Unknown patch operation '{}'", op),
            Self::MissingMember { op, member } => write!(
                f,
                "The '{}' operation requires a '{}' member",
                op, member
            ),
            Self::UnknownPath(path) => write!(
                f,
                "The target location specified by path '{}' was not found",
                path
            ),
            Self::InvalidValue { field, value } => write!(
                f,
                "The value '{}' is invalid for target location '/{}'",
                value,
                field.name()
            ),
            Self::TestFailed {
                field,
                expected,
                actual,
            } => write!(
                f,
                "The current value '{}' at path '/{}' is not equal to the test value '{}'",
                actual,
                field.name(),
                expected
            ),
        }
    }
}

fn resolve(pointer: &str) -> Result<Field, PatchError> {
    Field::from_pointer(pointer).ok_or_else(|| PatchError::UnknownPath(pointer.to_string()))
}

/// Strings are taken as-is and `null` clears the field; anything else is rejected
fn string_value(field: Field, value: &Value) -> Result<String, PatchError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Err(PatchError::InvalidValue {
            field,
            value: other.to_string(),
        }),
    }
}

fn apply_operation(operation: PatchOperation, target: &mut UpdateUser) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let field = resolve(&path)?;
            *field.slot(target) = string_value(field, &value)?;
        }
        PatchOperation::Remove { path } => {
            let field = resolve(&path)?;
            field.slot(target).clear();
        }
        PatchOperation::Move { from, path } => {
            let source = resolve(&from)?;
            let dest = resolve(&path)?;
            if source != dest {
                let moved = std::mem::take(source.slot(target));
                *dest.slot(target) = moved;
            }
        }
        PatchOperation::Copy { from, path } => {
            let source = resolve(&from)?;
            let dest = resolve(&path)?;
            let copied = source.get(target).to_string();
            *dest.slot(target) = copied;
        }
        PatchOperation::Test { path, value } => {
            let field = resolve(&path)?;
            let actual = field.get(target);
            // Every field is present in the projection, so `null` never matches
            let (matches, expected) = match value {
                Value::String(expected) => (expected == actual, expected),
                Value::Null => (false, Value::Null.to_string()),
                other => {
                    return Err(PatchError::InvalidValue {
                        field,
                        value: other.to_string(),
                    })
                }
            };
            if !matches {
                return Err(PatchError::TestFailed {
                    field,
                    expected,
                    actual: actual.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> PatchDocument {
        serde_json::from_value(value).unwrap()
    }

    fn john() -> UpdateUser {
        UpdateUser::new("jdoe", "John", "Doe")
    }

    fn operation(value: Value) -> Result<PatchOperation, PatchError> {
        PatchOperation::try_from(&value)
    }

    #[test]
    fn test_decodes_all_operations() {
        let names: Vec<_> = [
            json!({"op": "add", "path": "/login", "value": "a"}),
            json!({"op": "remove", "path": "/login"}),
            json!({"op": "replace", "path": "/login", "value": "b"}),
            json!({"op": "move", "from": "/login", "path": "/lastName"}),
            json!({"op": "copy", "from": "/lastName", "path": "/login"}),
            json!({"op": "test", "path": "/login", "value": "b"}),
        ]
        .into_iter()
        .map(|value| operation(value).unwrap().name())
        .collect();
        assert_eq!(names, vec!["add", "remove", "replace", "move", "copy", "test"]);
    }

    #[test]
    fn test_explicit_null_value_is_kept() {
        assert_eq!(
            operation(json!({"op": "replace", "path": "/login", "value": null})),
            Ok(PatchOperation::Replace {
                path: "/login".to_string(),
                value: Value::Null,
            })
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            operation(json!({"op": "frobnicate", "path": "/login"})),
            Err(PatchError::UnknownOperation("frobnicate".to_string()))
        );
        assert_eq!(
            operation(json!({"path": "/login", "value": "x"})),
            Err(PatchError::MissingOperation)
        );
        assert_eq!(
            operation(json!({"op": "replace", "path": "/login"})),
            Err(PatchError::MissingMember { op: "replace", member: "value" })
        );
        assert_eq!(
            operation(json!({"op": "move", "path": "/login"})),
            Err(PatchError::MissingMember { op: "move", member: "from" })
        );
        assert_eq!(
            operation(json!({"op": "replace", "value": "x"})),
            Err(PatchError::MissingMember { op: "replace", member: "path" })
        );
        assert!(matches!(operation(json!(42)), Err(PatchError::Malformed(_))));
        assert!(matches!(
            operation(json!({"op": "remove", "path": 7})),
            Err(PatchError::Malformed(_))
        ));
    }

    #[test]
    fn test_document_must_be_an_array() {
        let result: Result<PatchDocument, _> =
            serde_json::from_value(json!({"op": "replace", "path": "/login", "value": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_structural_errors_are_reported_and_skipped() {
        let mut target = john();
        let errors = doc(json!([
            {"op": "frobnicate", "path": "/login", "value": "x"},
            {"op": "replace", "path": "/login"},
            {"op": "replace", "path": "/firstName", "value": "Jane"},
        ]))
        .apply_to(&mut target);

        assert_eq!(errors.messages(PATCH_KEY).len(), 2);
        assert!(errors.messages(PATCH_KEY)[0].contains("frobnicate"));
        assert_eq!(target, UpdateUser::new("jdoe", "Jane", "Doe"));
    }

    #[test]
    fn test_replace_and_add() {
        let mut target = john();
        let errors = doc(json!([
            {"op": "replace", "path": "/login", "value": "jsmith"},
            {"op": "add", "path": "/lastName", "value": "Smith"},
        ]))
        .apply_to(&mut target);

        assert!(!errors.has_errors());
        assert_eq!(target, UpdateUser::new("jsmith", "John", "Smith"));
    }

    #[test]
    fn test_paths_are_case_insensitive() {
        let mut target = john();
        let errors = doc(json!([{"op": "replace", "path": "/FIRSTNAME", "value": "Jane"}]))
            .apply_to(&mut target);
        assert!(!errors.has_errors());
        assert_eq!(target.first_name, "Jane");
    }

    #[test]
    fn test_remove_clears_field() {
        let mut target = john();
        let errors = doc(json!([{"op": "remove", "path": "/firstName"}])).apply_to(&mut target);
        assert!(!errors.has_errors());
        assert_eq!(target.first_name, "");
    }

    #[test]
    fn test_move_and_copy() {
        let mut target = john();
        doc(json!([{"op": "move", "from": "/firstName", "path": "/lastName"}])).apply_to(&mut target);
        assert_eq!(target.first_name, "");
        assert_eq!(target.last_name, "John");

        let mut target = john();
        doc(json!([{"op": "copy", "from": "/firstName", "path": "/lastName"}])).apply_to(&mut target);
        assert_eq!(target.first_name, "John");
        assert_eq!(target.last_name, "John");
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        let mut target = john();
        doc(json!([{"op": "move", "from": "/login", "path": "/login"}])).apply_to(&mut target);
        assert_eq!(target, john());
    }

    #[test]
    fn test_unknown_path_is_reported_and_skipped() {
        let mut target = john();
        let errors = doc(json!([
            {"op": "replace", "path": "/email", "value": "x@example.com"},
            {"op": "replace", "path": "/firstName", "value": "Jane"},
        ]))
        .apply_to(&mut target);

        assert_eq!(errors.messages(PATCH_KEY).len(), 1);
        assert!(errors.messages(PATCH_KEY)[0].contains("/email"));
        assert_eq!(target.first_name, "Jane");
    }

    #[test]
    fn test_id_is_not_patchable() {
        let mut target = john();
        let errors = doc(json!([{"op": "replace", "path": "/id", "value": "x"}])).apply_to(&mut target);
        assert!(errors.has_errors());
        assert_eq!(target, john());
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let mut target = john();
        let errors = doc(json!([{"op": "replace", "path": "/login", "value": 42}])).apply_to(&mut target);
        assert_eq!(errors.messages(LOGIN).len(), 1);
        assert_eq!(target.login, "jdoe");
    }

    #[test]
    fn test_null_value_clears_field() {
        let mut target = john();
        let errors = doc(json!([{"op": "replace", "path": "/login", "value": null}])).apply_to(&mut target);
        assert!(!errors.has_errors());
        assert_eq!(target.login, "");
    }

    #[test]
    fn test_failed_test_operation() {
        let mut target = john();
        let errors = doc(json!([
            {"op": "test", "path": "/login", "value": "someoneelse"},
            {"op": "test", "path": "/lastName", "value": "Doe"},
        ]))
        .apply_to(&mut target);

        assert_eq!(errors.error_count(), 1);
        assert_eq!(errors.messages(LOGIN).len(), 1);
    }

    #[test]
    fn test_null_test_value_never_matches() {
        let mut target = UpdateUser::new("jdoe", "", "Doe");
        let errors = doc(json!([{"op": "test", "path": "/firstName", "value": null}]))
            .apply_to(&mut target);
        assert_eq!(errors.messages(FIRST_NAME).len(), 1);
    }

    #[test]
    fn test_non_string_test_value_is_rejected() {
        let mut target = john();
        let errors = doc(json!([{"op": "test", "path": "/login", "value": 1}])).apply_to(&mut target);
        assert!(errors.messages(LOGIN)[0].contains("invalid"));
    }

    #[test]
    fn test_empty_document_changes_nothing() {
        let mut target = john();
        let document = PatchDocument::default();
        assert!(document.is_empty());
        assert!(!document.apply_to(&mut target).has_errors());
        assert_eq!(target, john());
    }
}
