//! JSON request body decoding into workout drafts and patches.
//!
//! Decoding collects type errors per field; constraint checks stay in the
//! model. Keys other than `title`, `load` and `reps` are ignored, so a body
//! can never rewrite `id` or `createdAt`.

use crate::model::workout::{
    WorkoutDraft, WorkoutPatch, WorkoutValidationError, FIELD_LOAD, FIELD_REPS, FIELD_TITLE,
};
use serde_json::{Map, Value};

pub const FIELD_BODY: &str = "body";

const MAX_INTEGRAL_FLOAT: f64 = 9.0e15;

/// Decodes a create body. `null` fields count as missing.
///
/// On failure the error lists type errors and missing/invalid fields together.
pub fn parse_draft(body: Option<&[u8]>) -> Result<WorkoutDraft, WorkoutValidationError> {
    let map = parse_object(body)?;
    let mut errors = WorkoutValidationError::default();

    let draft = WorkoutDraft {
        title: read_field(&map, FIELD_TITLE, true, &mut errors, extract_title),
        load: read_field(&map, FIELD_LOAD, true, &mut errors, extract_load),
        reps: read_field(&map, FIELD_REPS, true, &mut errors, extract_reps),
    };

    if errors.is_empty() {
        return Ok(draft);
    }
    if let Err(constraint_errors) = draft.validate() {
        errors.merge(constraint_errors);
    }
    Err(errors)
}

/// Decodes an update body. A supplied `null` is a type error.
pub fn parse_patch(body: Option<&[u8]>) -> Result<WorkoutPatch, WorkoutValidationError> {
    let map = parse_object(body)?;
    let mut errors = WorkoutValidationError::default();

    let patch = WorkoutPatch {
        title: read_field(&map, FIELD_TITLE, false, &mut errors, extract_title),
        load: read_field(&map, FIELD_LOAD, false, &mut errors, extract_load),
        reps: read_field(&map, FIELD_REPS, false, &mut errors, extract_reps),
    };

    if errors.is_empty() {
        return Ok(patch);
    }
    if let Err(constraint_errors) = patch.validate() {
        errors.merge(constraint_errors);
    }
    Err(errors)
}

fn parse_object(body: Option<&[u8]>) -> Result<Map<String, Value>, WorkoutValidationError> {
    let bytes = match body {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => bytes,
        _ => return Ok(Map::new()),
    };

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(WorkoutValidationError::single(
            FIELD_BODY,
            "must be a JSON object",
        )),
        Err(err) => Err(WorkoutValidationError::single(
            FIELD_BODY,
            format!("must be valid JSON ({err})"),
        )),
    }
}

fn read_field<T>(
    map: &Map<String, Value>,
    name: &'static str,
    null_is_missing: bool,
    errors: &mut WorkoutValidationError,
    extract: fn(&Value) -> Result<T, &'static str>,
) -> Option<T> {
    match map.get(name) {
        None => None,
        Some(Value::Null) if null_is_missing => None,
        Some(value) => extract(value)
            .map_err(|message| errors.push(name, message))
            .ok(),
    }
}

fn extract_title(value: &Value) -> Result<String, &'static str> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or("must be a string")
}

fn extract_load(value: &Value) -> Result<f64, &'static str> {
    value.as_f64().ok_or("must be a number")
}

fn extract_reps(value: &Value) -> Result<i64, &'static str> {
    let Value::Number(number) = value else {
        return Err("must be an integer");
    };
    if let Some(reps) = number.as_i64() {
        return Ok(reps);
    }
    if number.is_u64() {
        return Err("is too large");
    }
    // Integral floats such as `10.0` are accepted.
    match number.as_f64() {
        Some(reps) if reps.fract() != 0.0 => Err("must be an integer"),
        Some(reps) if reps.abs() < MAX_INTEGRAL_FLOAT => Ok(reps as i64),
        Some(reps) if reps < 0.0 => Err("must not be negative"),
        _ => Err("is too large"),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_draft, parse_patch, FIELD_BODY};
    use crate::model::workout::{FIELD_LOAD, FIELD_REPS, FIELD_TITLE};

    #[test]
    fn draft_decodes_complete_body() {
        let draft = parse_draft(Some(br#"{"title":"squat","load":80.5,"reps":5}"#)).unwrap();
        assert_eq!(draft.title.as_deref(), Some("squat"));
        assert_eq!(draft.load, Some(80.5));
        assert_eq!(draft.reps, Some(5));
    }

    #[test]
    fn draft_reports_type_errors_and_missing_fields_together() {
        let err = parse_draft(Some(br#"{"title":42,"reps":null}"#)).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_TITLE, FIELD_LOAD, FIELD_REPS]);
        assert_eq!(err.errors()[0].message, "must be a string");
        assert_eq!(err.errors()[1].message, "is required");
    }

    #[test]
    fn empty_body_behaves_like_empty_object() {
        let draft = parse_draft(Some(b"  ")).unwrap();
        assert!(draft.validate().is_err());
        assert!(parse_patch(None).unwrap().validate().unwrap().is_empty());
    }

    #[test]
    fn malformed_json_and_non_objects_cite_body() {
        assert!(parse_draft(Some(b"{not json")).unwrap_err().contains(FIELD_BODY));
        assert!(parse_patch(Some(b"[1,2]")).unwrap_err().contains(FIELD_BODY));
    }

    #[test]
    fn reps_accepts_integral_floats_only() {
        let patch = parse_patch(Some(br#"{"reps":10.0}"#)).unwrap();
        assert_eq!(patch.reps, Some(10));

        let err = parse_patch(Some(br#"{"reps":2.5}"#)).unwrap_err();
        assert_eq!(err.errors()[0].message, "must be an integer");
    }

    #[test]
    fn huge_reps_are_too_large_whatever_the_number_form() {
        let float = parse_patch(Some(br#"{"reps":1e20}"#)).unwrap_err();
        assert_eq!(float.errors()[0].message, "is too large");

        let unsigned = parse_patch(Some(br#"{"reps":18446744073709551615}"#)).unwrap_err();
        assert_eq!(unsigned.errors()[0].message, "is too large");

        let negative = parse_patch(Some(br#"{"reps":-1e20}"#)).unwrap_err();
        assert_eq!(negative.errors()[0].message, "must not be negative");
    }

    #[test]
    fn patch_rejects_null_and_ignores_immutable_keys() {
        let err = parse_patch(Some(br#"{"load":null}"#)).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_LOAD]);

        let patch = parse_patch(Some(br#"{"id":"x","createdAt":1,"reps":1}"#)).unwrap();
        assert_eq!(patch.reps, Some(1));
        assert!(patch.title.is_none());
    }
}
