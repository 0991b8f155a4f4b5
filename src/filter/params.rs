//! Parameter schemas and parameter sets.
//!
//! A filter publishes a [`ParameterSchema`] describing the inputs it needs.
//! A host builds a [`ParameterSet`] against it, either from user input or from
//! [`ParameterSchema::defaults`], and passes the set to `execute`. Validation is
//! strict: a missing required key, an unexpected key or a value of the wrong
//! type is an error, never silently replaced by a default.
//!
//! # Example
//!
//! ```
//! use meshfilter::filter::{ParamSpec, ParamType, ParamValue, ParameterSchema, ParameterSet};
//! use nalgebra::Vector3;
//!
//! let schema = ParameterSchema::new().with(
//!     ParamSpec::new("offset", ParamType::Vec3).with_default(ParamValue::Vec3(Vector3::zeros())),
//! );
//!
//! let params = ParameterSet::new().with("offset", ParamValue::Vec3(Vector3::x()));
//! assert!(schema.validate(&params).is_ok());
//! assert!(schema.validate(&ParameterSet::new()).is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Vector3;

use crate::error::{FilterError, Result};

/// The semantic type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// A boolean flag.
    Bool,
    /// A signed integer.
    Int,
    /// A finite floating point number.
    Float,
    /// A finite 3D vector (offsets, directions, points).
    Vec3,
    /// An index into the mesh vertex collection.
    Vertex,
}

impl ParamType {
    /// Parse a textual value (as typed into a dialog or on a command line).
    ///
    /// Vectors are written as three comma-separated numbers, `1,0,-2.5`.
    pub fn parse(self, name: &str, text: &str) -> Result<ParamValue> {
        let text = text.trim();
        let bad = |what: &str| {
            FilterError::invalid_param(name, format!("cannot parse `{}` as {}", text, what))
        };

        let value = match self {
            ParamType::Bool => match text {
                "true" | "1" | "yes" => ParamValue::Bool(true),
                "false" | "0" | "no" => ParamValue::Bool(false),
                _ => return Err(bad("bool")),
            },
            ParamType::Int => ParamValue::Int(text.parse().map_err(|_| bad("int"))?),
            ParamType::Float => ParamValue::Float(text.parse().map_err(|_| bad("float"))?),
            ParamType::Vertex => ParamValue::Vertex(text.parse().map_err(|_| bad("vertex index"))?),
            ParamType::Vec3 => {
                let parts: Vec<f64> = text
                    .split(',')
                    .map(|p| p.trim().parse::<f64>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| bad("vec3"))?;
                match parts.as_slice() {
                    [x, y, z] => ParamValue::Vec3(Vector3::new(*x, *y, *z)),
                    _ => return Err(bad("vec3")),
                }
            }
        };
        Ok(value)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Vec3 => "vec3",
            ParamType::Vertex => "vertex",
        };
        f.pad(s)
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A 3D vector.
    Vec3(Vector3<f64>),
    /// A vertex index.
    Vertex(usize),
}

impl ParamValue {
    /// The semantic type of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Vec3(_) => ParamType::Vec3,
            ParamValue::Vertex(_) => ParamType::Vertex,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            ParamValue::Float(v) => v.is_finite(),
            ParamValue::Vec3(v) => v.iter().all(|c| c.is_finite()),
            _ => true,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Vec3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
            ParamValue::Vertex(v) => write!(f, "{}", v),
        }
    }
}

/// Declaration of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Key used in a [`ParameterSet`].
    pub name: &'static str,

    /// Expected semantic type.
    pub ty: ParamType,

    /// Short label for a dialog field.
    pub label: &'static str,

    /// Longer help text.
    pub tooltip: &'static str,

    /// Whether the parameter must be present at execution.
    pub required: bool,

    /// Value to pre-populate a dialog or a headless run with.
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// Create a required parameter with no default.
    pub fn new(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            label: name,
            tooltip: "",
            required: true,
            default: None,
        }
    }

    /// Set the dialog label.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Set the help text.
    pub fn with_tooltip(mut self, tooltip: &'static str) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Set the default value.
    ///
    /// # Panics
    /// Panics if the default does not match the declared type.
    pub fn with_default(mut self, value: ParamValue) -> Self {
        assert_eq!(value.param_type(), self.ty, "default for `{}` has the wrong type", self.name);
        self.default = Some(value);
        self
    }

    /// Mark the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn check(&self, value: &ParamValue) -> Result<()> {
        if value.param_type() != self.ty {
            return Err(FilterError::invalid_param(
                self.name,
                format!("expected {}, got {}", self.ty, value.param_type()),
            ));
        }
        if !value.is_finite() {
            return Err(FilterError::invalid_param(self.name, "value must be finite"));
        }
        Ok(())
    }
}

/// The ordered set of parameters a filter accepts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSchema {
    specs: Vec<ParamSpec>,
}

impl ParameterSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter declaration.
    pub fn with(mut self, spec: ParamSpec) -> Self {
        debug_assert!(self.get(spec.name).is_none(), "duplicate parameter `{}`", spec.name);
        self.specs.push(spec);
        self
    }

    /// Look up a parameter declaration by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Iterate over the declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.specs.iter()
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the schema declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Check a parameter set against this schema.
    ///
    /// Fails with [`FilterError::InvalidParameter`] for the first unknown key,
    /// missing required parameter, or type-incorrect value found.
    pub fn validate(&self, params: &ParameterSet) -> Result<()> {
        for (name, _) in params.iter() {
            if self.get(name).is_none() {
                return Err(FilterError::invalid_param(name, "not accepted by this filter"));
            }
        }

        for spec in &self.specs {
            match params.get(spec.name) {
                Some(value) => spec.check(value)?,
                None if spec.required => {
                    return Err(FilterError::invalid_param(spec.name, "missing required parameter"));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Build a parameter set from the declared defaults.
    ///
    /// Parameters without a default are left out, so the result only validates
    /// if every required parameter has one.
    pub fn defaults(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        for spec in &self.specs {
            if let Some(value) = &spec.default {
                params.set(spec.name, value.clone());
            }
        }
        params
    }
}

/// Named parameter values supplied to one invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Option<ParamValue> {
        self.values.insert(name.to_string(), value)
    }

    /// Set a value, builder style.
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Iterate over (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of values in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&ParamValue> {
        self.get(name)
            .ok_or_else(|| FilterError::invalid_param(name, "missing required parameter"))
    }

    fn mismatch(name: &str, expected: ParamType, got: &ParamValue) -> FilterError {
        FilterError::invalid_param(name, format!("expected {}, got {}", expected, got.param_type()))
    }

    /// Get a boolean parameter.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            ParamValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamType::Bool, other)),
        }
    }

    /// Get an integer parameter.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamType::Int, other)),
        }
    }

    /// Get a float parameter.
    pub fn get_float(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            ParamValue::Float(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamType::Float, other)),
        }
    }

    /// Get a vector parameter.
    pub fn get_vec3(&self, name: &str) -> Result<Vector3<f64>> {
        match self.require(name)? {
            ParamValue::Vec3(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamType::Vec3, other)),
        }
    }

    /// Get a vertex index parameter.
    pub fn get_vertex(&self, name: &str) -> Result<usize> {
        match self.require(name)? {
            ParamValue::Vertex(v) => Ok(*v),
            other => Err(Self::mismatch(name, ParamType::Vertex, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .with(ParamSpec::new("target", ParamType::Vertex).with_default(ParamValue::Vertex(0)))
            .with(ParamSpec::new("scale", ParamType::Float).optional())
    }

    fn reason(err: FilterError) -> String {
        match err {
            FilterError::InvalidParameter { reason, .. } => reason,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_complete_set() {
        let s = schema();
        assert!(s.validate(&ParameterSet::new().with("target", ParamValue::Vertex(3))).is_ok());
        assert!(s
            .validate(
                &ParameterSet::new()
                    .with("target", ParamValue::Vertex(3))
                    .with("scale", ParamValue::Float(2.0))
            )
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_and_mistyped() {
        let s = schema();
        let empty = ParameterSet::new();
        assert_eq!(reason(s.validate(&empty).unwrap_err()), "missing required parameter");

        let wrong = ParameterSet::new().with("target", ParamValue::Float(1.0));
        assert_eq!(reason(s.validate(&wrong).unwrap_err()), "expected vertex, got float");

        let unknown = ParameterSet::new()
            .with("target", ParamValue::Vertex(0))
            .with("taget", ParamValue::Vertex(0));
        assert!(matches!(
            s.validate(&unknown),
            Err(FilterError::InvalidParameter { name, .. }) if name == "taget"
        ));

        let nan = ParameterSet::new()
            .with("target", ParamValue::Vertex(0))
            .with("scale", ParamValue::Float(f64::NAN));
        assert_eq!(reason(s.validate(&nan).unwrap_err()), "value must be finite");
    }

    #[test]
    fn test_defaults_skip_missing() {
        let defaults = schema().defaults();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.get_vertex("target").unwrap(), 0);
        assert!(defaults.get("scale").is_none());
    }

    #[test]
    fn test_typed_getters() {
        let params =
            ParameterSet::new().with("offset", ParamValue::Vec3(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(params.get_vec3("offset").unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(params.get_float("offset").is_err());
        assert!(params.get_vec3("missing").is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            ParamType::Vec3.parse("offset", " 1, 0,-2.5").unwrap(),
            ParamValue::Vec3(Vector3::new(1.0, 0.0, -2.5))
        );
        assert_eq!(ParamType::Vertex.parse("target", "12").unwrap(), ParamValue::Vertex(12));
        assert_eq!(ParamType::Bool.parse("flag", "yes").unwrap(), ParamValue::Bool(true));
        assert!(ParamType::Vec3.parse("offset", "1,2").is_err());
        assert!(ParamType::Vertex.parse("target", "-1").is_err());
        assert!(ParamType::Int.parse("n", "abc").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let v = ParamValue::Vec3(Vector3::new(0.5, -1.0, 2.0));
        assert_eq!(ParamType::Vec3.parse("offset", &v.to_string()).unwrap(), v);
    }
}
