use crate::annotation::AnnotationBlock;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Tag carrying body parameter declarations
const BODY_PARAM_TAG: &str = "bodyParam";

/// Marker splitting an explicit example literal off a parameter description
const EXAMPLE_MARKER: &str = "Example:";

/// The six recognized parameter kinds.
///
/// Anything else in the type position of a `@bodyParam` body is a parse
/// error for that parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    String,
    Boolean,
    Number,
    Object,
    Array,
}

impl ParamKind {
    /// Parse a type token; tokens are matched exactly, lower-case
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "integer" => Some(ParamKind::Integer),
            "string" => Some(ParamKind::String),
            "boolean" => Some(ParamKind::Boolean),
            "number" => Some(ParamKind::Number),
            "object" => Some(ParamKind::Object),
            "array" => Some(ParamKind::Array),
            _ => None,
        }
    }

    /// The token form of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Integer => "integer",
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Number => "number",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
        }
    }
}

/// One parsed body parameter declaration.
///
/// The example value's JSON type always matches `kind`, whether it came
/// from an explicit literal or from the fabricated sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
    #[serde(rename = "value")]
    pub example: Value,
}

/// Parses one `@bodyParam` body into a declaration.
///
/// Grammar: `<name> <type> [required] <description...>`. The description is
/// the remainder of the line verbatim and may be empty. A trailing
/// `Example: <literal>` segment is split off and coerced to the declared
/// kind; without one, a deterministic sample is fabricated so repeated runs
/// produce identical records.
///
/// # Errors
///
/// Returns [`Error::MalformedParameterTag`] when the name or type token is
/// missing, the type token is unrecognized, or an explicit example literal
/// does not coerce to the declared kind.
pub fn parse_parameter_tag(body: &str) -> Result<ParameterDeclaration> {
    let (name, rest) = split_token(body);
    if name.is_empty() {
        return Err(Error::MalformedParameterTag {
            parameter: "<unnamed>".to_string(),
            message: "missing parameter name".to_string(),
        });
    }

    let (type_token, rest) = split_token(rest);
    if type_token.is_empty() {
        return Err(Error::MalformedParameterTag {
            parameter: name.to_string(),
            message: "missing type token".to_string(),
        });
    }
    let kind = ParamKind::parse(type_token).ok_or_else(|| Error::MalformedParameterTag {
        parameter: name.to_string(),
        message: format!("unrecognized type token '{}'", type_token),
    })?;

    let (required, rest) = match split_token(rest) {
        ("required", after) => (true, after),
        _ => (false, rest),
    };

    let (description, example_literal) = split_example(rest);
    let example = match example_literal {
        Some(literal) => coerce_example(name, kind, literal)?,
        None => sample_for(name, kind),
    };

    Ok(ParameterDeclaration {
        name: name.to_string(),
        kind,
        required,
        description: description.to_string(),
        example,
    })
}

/// Collects every `@bodyParam` occurrence of the method-level block into an
/// ordered name → declaration map.
///
/// Class-level parameter tags are not inherited. A malformed occurrence is
/// logged and skipped; the remaining parameters still parse.
pub fn parse_parameters(method_scope: &AnnotationBlock) -> IndexMap<String, ParameterDeclaration> {
    let mut parameters = IndexMap::new();

    for body in method_scope.all(BODY_PARAM_TAG) {
        match parse_parameter_tag(body) {
            Ok(declaration) => {
                parameters.insert(declaration.name.clone(), declaration);
            }
            Err(e) => {
                warn!("Skipping parameter: {}", e);
            }
        }
    }

    parameters
}

/// Split the next whitespace-delimited token off a string
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

/// Split a trailing `Example: <literal>` segment off a description
fn split_example(description: &str) -> (&str, Option<&str>) {
    match description.find(EXAMPLE_MARKER) {
        Some(idx) => {
            let literal = description[idx + EXAMPLE_MARKER.len()..].trim();
            (description[..idx].trim_end(), Some(literal))
        }
        None => (description.trim_end(), None),
    }
}

/// Coerce an explicit example literal to the declared kind
fn coerce_example(name: &str, kind: ParamKind, literal: &str) -> Result<Value> {
    let malformed = |message: String| Error::MalformedParameterTag {
        parameter: name.to_string(),
        message,
    };

    match kind {
        ParamKind::Integer => literal
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| malformed(format!("example '{}' is not an integer", literal))),
        ParamKind::Number => literal
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| malformed(format!("example '{}' is not a number", literal))),
        ParamKind::Boolean => match literal {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(malformed(format!("example '{}' is not a boolean", literal))),
        },
        ParamKind::String => Ok(Value::String(literal.to_string())),
        ParamKind::Object => match serde_json::from_str::<Value>(literal) {
            Ok(value) if value.is_object() => Ok(value),
            _ => Err(malformed(format!("example '{}' is not a JSON object", literal))),
        },
        ParamKind::Array => match serde_json::from_str::<Value>(literal) {
            Ok(value) if value.is_array() => Ok(value),
            _ => Err(malformed(format!("example '{}' is not a JSON array", literal))),
        },
    }
}

/// Fabricated sample for a kind when no literal example is given.
///
/// Values are fixed, never random or time-based, so record output stays
/// byte-identical across runs.
fn sample_for(name: &str, kind: ParamKind) -> Value {
    match kind {
        ParamKind::Integer => json!(1),
        ParamKind::Number => json!(1.0),
        ParamKind::Boolean => json!(false),
        ParamKind::String => json!(name),
        ParamKind::Object => json!({}),
        ParamKind::Array => json!([]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_integer() {
        let param = parse_parameter_tag("user_id integer required The id of the user.").unwrap();

        assert_eq!(param.name, "user_id");
        assert_eq!(param.kind, ParamKind::Integer);
        assert!(param.required);
        assert_eq!(param.description, "The id of the user.");
        assert_eq!(param.example, json!(1));
    }

    #[test]
    fn test_missing_required_marker_means_optional() {
        let param = parse_parameter_tag("room_id string The id of the room.").unwrap();

        assert_eq!(param.kind, ParamKind::String);
        assert!(!param.required);
        assert_eq!(param.description, "The id of the room.");
    }

    #[test]
    fn test_empty_description() {
        let param = parse_parameter_tag("yet_another_param object required").unwrap();

        assert_eq!(param.kind, ParamKind::Object);
        assert!(param.required);
        assert_eq!(param.description, "");
        assert_eq!(param.example, json!({}));
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let err = parse_parameter_tag("").unwrap_err();
        assert!(matches!(err, Error::MalformedParameterTag { .. }));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = parse_parameter_tag("user_id").unwrap_err();
        assert!(matches!(err, Error::MalformedParameterTag { .. }));
    }

    #[test]
    fn test_unrecognized_type_is_malformed() {
        let err = parse_parameter_tag("user_id uuid required The id.").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("uuid"), "got: {}", message);
    }

    #[test]
    fn test_explicit_example_coercion() {
        let param =
            parse_parameter_tag("user_id integer required The id. Example: 9").unwrap();
        assert_eq!(param.description, "The id.");
        assert_eq!(param.example, json!(9));

        let param = parse_parameter_tag("forever boolean Ban forever. Example: true").unwrap();
        assert_eq!(param.example, json!(true));

        let param = parse_parameter_tag("tags array The tags. Example: [\"a\",\"b\"]").unwrap();
        assert_eq!(param.example, json!(["a", "b"]));
    }

    #[test]
    fn test_uncoercible_example_is_malformed() {
        let err = parse_parameter_tag("user_id integer The id. Example: banana").unwrap_err();
        assert!(matches!(err, Error::MalformedParameterTag { .. }));
    }

    #[test]
    fn test_fabricated_samples_match_kind() {
        let number = parse_parameter_tag("another_one number Just need something here.").unwrap();
        assert!(number.example.is_f64());

        let string = parse_parameter_tag("room_id string The room.").unwrap();
        assert_eq!(string.example, json!("room_id"));

        let array = parse_parameter_tag("even_more_param array").unwrap();
        assert_eq!(array.example, json!([]));
    }

    #[test]
    fn test_parse_parameters_skips_malformed_occurrence() {
        let comment = "@bodyParam user_id integer required The id of the user.\n\
                       @bodyParam broken_param uuid nope\n\
                       @bodyParam room_id string The id of the room.";
        let block = AnnotationBlock::parse(comment);

        let parameters = parse_parameters(&block);

        assert_eq!(parameters.len(), 2);
        assert!(parameters.contains_key("user_id"));
        assert!(parameters.contains_key("room_id"));
        assert!(!parameters.contains_key("broken_param"));
    }

    #[test]
    fn test_parse_parameters_preserves_order() {
        let comment = "@bodyParam b string\n@bodyParam a string\n@bodyParam c string";
        let block = AnnotationBlock::parse(comment);

        let params = parse_parameters(&block);
        let names: Vec<&String> = params.keys().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
