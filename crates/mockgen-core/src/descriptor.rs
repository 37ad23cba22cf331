//! Typed field descriptors.
//!
//! Raw descriptors from a [`FieldMap`](crate::FieldMap) are parsed into the
//! recursive [`FieldDescriptor`] sum type when a field is dispatched. Parsing
//! is liberal: malformed constraint keys fall back to their defaults and are
//! reported as [`DescriptorIssue`]s instead of errors. Only an unknown or
//! missing discriminator, a non-mapping descriptor, or nesting beyond the
//! configured depth are errors.

use serde_json::{Map, Value, json};

use crate::error::DescriptorError;
use crate::kind::FieldKind;

/// Default maximum nesting depth for object fields and array elements.
pub const DEFAULT_MAX_DEPTH: usize = 32;

pub const DEFAULT_FLOAT_MIN: f64 = 0.0;
pub const DEFAULT_FLOAT_MAX: f64 = 1.0;
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;
pub const MAX_DECIMAL_PLACES: u32 = 15;
pub const DEFAULT_INT_MIN: i64 = 0;
pub const DEFAULT_INT_MAX: i64 = 100;
pub const DEFAULT_MIN_ITEMS: usize = 1;
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Absorbs representation error when scaling decimal bounds, e.g. `0.07 * 100`.
const GRID_TOLERANCE: f64 = 1e-9;

/// A parsed descriptor; each variant carries only its own constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDescriptor {
    Uuid,
    Choice(ChoiceSpec),
    Float(FloatSpec),
    Integer(IntegerSpec),
    String(StringSpec),
    Object(ObjectSpec),
    Array(ArraySpec),
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Uuid => FieldKind::Uuid,
            Self::Choice(_) => FieldKind::Choice,
            Self::Float(_) => FieldKind::Float,
            Self::Integer(_) => FieldKind::Integer,
            Self::String(_) => FieldKind::String,
            Self::Object(_) => FieldKind::Object,
            Self::Array(_) => FieldKind::Array,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSpec {
    pub options: Vec<Value>,
    /// Validated weights, parallel to `options`. `None` means uniform.
    pub weights: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatSpec {
    pub min: f64,
    pub max: f64,
    pub decimal_places: u32,
}

impl FloatSpec {
    /// Smallest and largest multiples of `10^-decimal_places` inside the bounds,
    /// scaled by `10^decimal_places`. `None` when no such multiple exists.
    pub fn precision_grid(&self) -> Option<(f64, f64)> {
        let factor = self.scale();
        let low = (self.min * factor - GRID_TOLERANCE).ceil();
        let high = (self.max * factor + GRID_TOLERANCE).floor();
        (low.is_finite() && high.is_finite() && low <= high).then_some((low, high))
    }

    pub fn scale(&self) -> f64 {
        10f64.powi(self.decimal_places as i32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerSpec {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSpec {
    /// Realistic-value source hint, e.g. `name` or `city`.
    pub generator: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub fields: Vec<(String, FieldDescriptor)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySpec {
    pub min_items: usize,
    /// Always `>= min_items`.
    pub max_items: usize,
    pub elements: ElementSpec,
}

/// How array elements are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    /// Sample without replacement from a closed option list.
    Sample(Vec<Value>),
    /// Generate each element from a nested descriptor.
    Generated(Box<FieldDescriptor>),
    /// Generic random words.
    Words,
}

/// A liberal fallback taken while parsing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    pub code: &'static str,
    pub path: String,
    pub message: String,
}

impl DescriptorIssue {
    fn new(code: &'static str, path: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Parses raw descriptors with a recursion guard.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorParser {
    max_depth: usize,
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl DescriptorParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse the descriptor of a top-level field named `path`.
    pub fn parse(
        &self,
        path: &str,
        raw: &Value,
        issues: &mut Vec<DescriptorIssue>,
    ) -> Result<FieldDescriptor, DescriptorError> {
        self.parse_at(path, raw, 0, issues)
    }

    fn parse_at(
        &self,
        path: &str,
        raw: &Value,
        depth: usize,
        issues: &mut Vec<DescriptorIssue>,
    ) -> Result<FieldDescriptor, DescriptorError> {
        if depth > self.max_depth {
            return Err(DescriptorError::TooDeep {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let map = raw.as_object().ok_or_else(|| DescriptorError::NotAMapping {
            path: path.to_string(),
        })?;
        let discriminator = map.get("type").ok_or_else(|| DescriptorError::MissingKind {
            path: path.to_string(),
        })?;
        let kind_name = match discriminator {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        };
        let kind = FieldKind::parse(&kind_name).ok_or_else(|| DescriptorError::UnsupportedKind {
            path: path.to_string(),
            kind: kind_name.clone(),
        })?;

        let params = Params { map, path };
        let descriptor = match kind {
            FieldKind::Uuid => FieldDescriptor::Uuid,
            FieldKind::Choice => FieldDescriptor::Choice(parse_choice(&params, issues)),
            FieldKind::Float => FieldDescriptor::Float(parse_float(&params, issues)),
            FieldKind::Integer => FieldDescriptor::Integer(parse_integer(&params, issues)),
            FieldKind::String => FieldDescriptor::String(StringSpec {
                generator: params.get_str("generator", issues).map(str::to_string),
            }),
            FieldKind::Object => FieldDescriptor::Object(self.parse_object(&params, depth, issues)?),
            FieldKind::Array => FieldDescriptor::Array(self.parse_array(&params, depth, issues)?),
        };
        Ok(descriptor)
    }

    fn parse_object(
        &self,
        params: &Params<'_>,
        depth: usize,
        issues: &mut Vec<DescriptorIssue>,
    ) -> Result<ObjectSpec, DescriptorError> {
        let fields = match params.map.get("fields") {
            None => return Ok(ObjectSpec { fields: Vec::new() }),
            Some(Value::Object(fields)) => fields,
            Some(_) => {
                issues.push(DescriptorIssue::new(
                    "object_fields_invalid",
                    params.path,
                    "'fields' must be a mapping; generating an empty object",
                ));
                return Ok(ObjectSpec { fields: Vec::new() });
            }
        };

        let mut parsed = Vec::with_capacity(fields.len());
        for (name, raw) in fields {
            let child_path = format!("{}.{}", params.path, name);
            let child = self.parse_at(&child_path, raw, depth + 1, issues)?;
            parsed.push((name.clone(), child));
        }
        Ok(ObjectSpec { fields: parsed })
    }

    fn parse_array(
        &self,
        params: &Params<'_>,
        depth: usize,
        issues: &mut Vec<DescriptorIssue>,
    ) -> Result<ArraySpec, DescriptorError> {
        let mut min_items = params.get_count("min_items", DEFAULT_MIN_ITEMS, issues);
        let mut max_items = params.get_count("max_items", DEFAULT_MAX_ITEMS, issues);
        if max_items < min_items {
            issues.push(DescriptorIssue::new(
                "array_bounds_inverted",
                params.path,
                format!("max_items {max_items} is below min_items {min_items}; raising max_items"),
            ));
            max_items = min_items;
        }

        let element_path = format!("{}[]", params.path);
        let item_type = params.get_str("item_type", issues);
        let item_options = params.get_array("item_options", issues);

        if let Some(items) = params.map.get("items") {
            if items.is_object() {
                let element = self.parse_at(&element_path, items, depth + 1, issues)?;
                return Ok(ArraySpec {
                    min_items,
                    max_items,
                    elements: ElementSpec::Generated(Box::new(element)),
                });
            }
            issues.push(DescriptorIssue::new(
                "array_items_invalid",
                params.path,
                "'items' must be a descriptor mapping; ignoring it",
            ));
        }

        let elements = match (item_type, item_options) {
            (Some("string"), Some(options)) if !options.is_empty() => {
                if options.len() < max_items {
                    issues.push(DescriptorIssue::new(
                        "array_options_exhausted",
                        params.path,
                        format!(
                            "only {} item_options for up to {max_items} items; capping length",
                            options.len()
                        ),
                    ));
                    max_items = options.len();
                    min_items = min_items.min(max_items);
                }
                ElementSpec::Sample(options.clone())
            }
            (Some(item_type), options) => {
                if options.is_some_and(|options| !options.is_empty()) {
                    issues.push(DescriptorIssue::new(
                        "array_options_ignored",
                        params.path,
                        format!("item_options only apply to string items, not '{item_type}'"),
                    ));
                }
                let synthetic = json!({ "type": item_type });
                let element = self.parse_at(&element_path, &synthetic, depth + 1, issues)?;
                ElementSpec::Generated(Box::new(element))
            }
            (None, _) => ElementSpec::Words,
        };

        Ok(ArraySpec {
            min_items,
            max_items,
            elements,
        })
    }
}

fn parse_choice(params: &Params<'_>, issues: &mut Vec<DescriptorIssue>) -> ChoiceSpec {
    let options = params.get_array("options", issues).cloned().unwrap_or_default();
    if options.is_empty() {
        issues.push(DescriptorIssue::new(
            "choice_options_empty",
            params.path,
            "no options provided; generating null",
        ));
        return ChoiceSpec {
            options,
            weights: None,
        };
    }

    let weights = params
        .get_array("weights", issues)
        .and_then(|raw| match validate_weights(raw, options.len()) {
            Ok(weights) => Some(weights),
            Err(reason) => {
                issues.push(DescriptorIssue::new(
                    "choice_weights_invalid",
                    params.path,
                    format!("{reason}; sampling uniformly"),
                ));
                None
            }
        });

    ChoiceSpec { options, weights }
}

fn validate_weights(raw: &[Value], expected: usize) -> Result<Vec<f64>, String> {
    if raw.len() != expected {
        return Err(format!(
            "expected {expected} weights, found {}",
            raw.len()
        ));
    }
    let weights = raw
        .iter()
        .map(|value| value.as_f64().filter(|w| w.is_finite() && *w >= 0.0))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| "weights must be non-negative numbers".to_string())?;
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err("weights must not all be zero".to_string());
    }
    Ok(weights)
}

fn parse_float(params: &Params<'_>, issues: &mut Vec<DescriptorIssue>) -> FloatSpec {
    let mut min = params.get_f64("min_value", DEFAULT_FLOAT_MIN, issues);
    let mut max = params.get_f64("max_value", DEFAULT_FLOAT_MAX, issues);
    if min > max {
        issues.push(DescriptorIssue::new(
            "float_bounds_inverted",
            params.path,
            format!("min_value {min} exceeds max_value {max}; swapping"),
        ));
        std::mem::swap(&mut min, &mut max);
    }
    if !(max - min).is_finite() {
        issues.push(DescriptorIssue::new(
            "float_range_overflow",
            params.path,
            "range is too wide to sample; using defaults",
        ));
        min = DEFAULT_FLOAT_MIN;
        max = DEFAULT_FLOAT_MAX;
    }

    let mut decimal_places =
        params.get_count("decimal_places", DEFAULT_DECIMAL_PLACES as usize, issues);
    if decimal_places > MAX_DECIMAL_PLACES as usize {
        issues.push(DescriptorIssue::new(
            "float_precision_capped",
            params.path,
            format!("decimal_places capped at {MAX_DECIMAL_PLACES}"),
        ));
        decimal_places = MAX_DECIMAL_PLACES as usize;
    }

    let spec = FloatSpec {
        min,
        max,
        decimal_places: decimal_places as u32,
    };
    if spec.precision_grid().is_none() {
        issues.push(DescriptorIssue::new(
            "float_precision_unreachable",
            params.path,
            format!(
                "no value with {} decimal place(s) lies in [{min}, {max}]; values are not rounded",
                spec.decimal_places
            ),
        ));
    }
    spec
}

fn parse_integer(params: &Params<'_>, issues: &mut Vec<DescriptorIssue>) -> IntegerSpec {
    let mut min = params.get_i64("min_value", DEFAULT_INT_MIN, issues);
    let mut max = params.get_i64("max_value", DEFAULT_INT_MAX, issues);
    if min > max {
        issues.push(DescriptorIssue::new(
            "integer_bounds_inverted",
            params.path,
            format!("min_value {min} exceeds max_value {max}; swapping"),
        ));
        std::mem::swap(&mut min, &mut max);
    }
    IntegerSpec { min, max }
}

struct Params<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Params<'a> {
    fn wrong_type(&self, key: &str, expected: &str, issues: &mut Vec<DescriptorIssue>) {
        issues.push(DescriptorIssue::new(
            "param_type_invalid",
            self.path,
            format!("'{key}' must be {expected}; using the default"),
        ));
    }

    fn get_f64(&self, key: &str, default: f64, issues: &mut Vec<DescriptorIssue>) -> f64 {
        match self.map.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => value.as_f64().unwrap_or_else(|| {
                self.wrong_type(key, "a number", issues);
                default
            }),
        }
    }

    fn get_i64(&self, key: &str, default: i64, issues: &mut Vec<DescriptorIssue>) -> i64 {
        match self.map.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => as_integral(value).unwrap_or_else(|| {
                self.wrong_type(key, "an integer", issues);
                default
            }),
        }
    }

    fn get_count(&self, key: &str, default: usize, issues: &mut Vec<DescriptorIssue>) -> usize {
        match self.map.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => as_integral(value)
                .and_then(|value| usize::try_from(value).ok())
                .unwrap_or_else(|| {
                    self.wrong_type(key, "a non-negative integer", issues);
                    default
                }),
        }
    }

    fn get_str(&self, key: &str, issues: &mut Vec<DescriptorIssue>) -> Option<&'a str> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.as_str()),
            Some(_) => {
                self.wrong_type(key, "a string", issues);
                None
            }
        }
    }

    fn get_array(&self, key: &str, issues: &mut Vec<DescriptorIssue>) -> Option<&'a Vec<Value>> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(values)) => Some(values),
            Some(_) => {
                self.wrong_type(key, "an array", issues);
                None
            }
        }
    }
}

/// Integers, or floats with no fractional part that fit in an `i64`.
fn as_integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
            .map(|v| v as i64)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(raw: Value) -> (Result<FieldDescriptor, DescriptorError>, Vec<DescriptorIssue>) {
        let mut issues = Vec::new();
        let parsed = DescriptorParser::default().parse("field", &raw, &mut issues);
        (parsed, issues)
    }

    #[test]
    fn integer_defaults_apply() {
        let (parsed, issues) = parse(json!({"type": "integer"}));
        assert_eq!(
            parsed,
            Ok(FieldDescriptor::Integer(IntegerSpec { min: 0, max: 100 }))
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn integral_floats_are_accepted_as_integer_bounds() {
        let (parsed, issues) = parse(json!({"type": "integer", "min_value": 18.0, "max_value": 99}));
        assert_eq!(
            parsed,
            Ok(FieldDescriptor::Integer(IntegerSpec { min: 18, max: 99 }))
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn wrong_typed_bounds_fall_back_with_issue() {
        let (parsed, issues) = parse(json!({"type": "float", "min_value": "low"}));
        let Ok(FieldDescriptor::Float(spec)) = parsed else {
            panic!("expected float descriptor");
        };
        assert_eq!(spec.min, DEFAULT_FLOAT_MIN);
        assert_eq!(issues[0].code, "param_type_invalid");
    }

    #[test]
    fn precision_grid_rounds_bounds_inward() {
        let spec = FloatSpec {
            min: 0.07,
            max: 0.123,
            decimal_places: 2,
        };
        assert_eq!(spec.precision_grid(), Some((7.0, 12.0)));
    }

    #[test]
    fn unreachable_precision_is_reported() {
        let (parsed, issues) = parse(json!({
            "type": "float", "min_value": 0.001, "max_value": 0.009, "decimal_places": 2
        }));
        assert!(matches!(parsed, Ok(FieldDescriptor::Float(_))));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "float_precision_unreachable");
    }

    #[test]
    fn inverted_array_bounds_raise_max_to_min() {
        let (parsed, issues) = parse(json!({"type": "array", "min_items": 5, "max_items": 1}));
        let Ok(FieldDescriptor::Array(spec)) = parsed else {
            panic!("expected array descriptor");
        };
        assert_eq!((spec.min_items, spec.max_items), (5, 5));
        assert_eq!(spec.elements, ElementSpec::Words);
        assert_eq!(issues[0].code, "array_bounds_inverted");
    }

    #[test]
    fn item_type_builds_synthetic_element_descriptor() {
        let (parsed, _) = parse(json!({"type": "array", "item_type": "integer"}));
        let Ok(FieldDescriptor::Array(spec)) = parsed else {
            panic!("expected array descriptor");
        };
        assert_eq!(
            spec.elements,
            ElementSpec::Generated(Box::new(FieldDescriptor::Integer(IntegerSpec {
                min: 0,
                max: 100
            })))
        );
    }

    #[test]
    fn unknown_element_kind_is_reported_at_element_path() {
        let (parsed, _) = parse(json!({"type": "array", "item_type": "blob"}));
        assert_eq!(
            parsed,
            Err(DescriptorError::UnsupportedKind {
                path: "field[]".to_string(),
                kind: "blob".to_string()
            })
        );
    }

    #[test]
    fn string_options_cap_length_to_option_count() {
        let (parsed, issues) = parse(json!({
            "type": "array",
            "item_type": "string",
            "item_options": ["a", "b"],
            "min_items": 3,
            "max_items": 4
        }));
        let Ok(FieldDescriptor::Array(spec)) = parsed else {
            panic!("expected array descriptor");
        };
        assert_eq!((spec.min_items, spec.max_items), (2, 2));
        assert!(issues.iter().any(|issue| issue.code == "array_options_exhausted"));
    }

    #[test]
    fn mismatched_weights_fall_back_to_uniform() {
        let (parsed, issues) = parse(json!({"type": "choice", "options": ["a", "b"], "weights": [1]}));
        let Ok(FieldDescriptor::Choice(spec)) = parsed else {
            panic!("expected choice descriptor");
        };
        assert_eq!(spec.weights, None);
        assert_eq!(issues[0].code, "choice_weights_invalid");
    }

    #[test]
    fn nested_unknown_kind_fails_whole_descriptor() {
        let (parsed, _) = parse(json!({
            "type": "object",
            "fields": {"inner": {"type": "mystery"}}
        }));
        assert!(matches!(
            parsed,
            Err(DescriptorError::UnsupportedKind { ref path, .. }) if path == "field.inner"
        ));
    }

    #[test]
    fn nesting_beyond_max_depth_is_rejected() {
        let mut raw = json!({"type": "integer"});
        for _ in 0..4 {
            raw = json!({"type": "object", "fields": {"child": raw}});
        }
        let mut issues = Vec::new();
        let parsed = DescriptorParser::new(2).parse("root", &raw, &mut issues);
        assert!(matches!(parsed, Err(DescriptorError::TooDeep { max_depth: 2, .. })));
    }
}
