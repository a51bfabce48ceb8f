//! Filter factory
//!
//! Translates a declarative filter specification into a typed [`Filter`].
//! Exactly one of the `range`, `type` and `value` discriminators must be
//! present. A key listed in the configured post-filter properties forces the
//! post-filter flag, and a chained key wraps the result in a chained-property
//! filter.

use serde_json::Value;

use crate::error::{FacetqlError, Result};
use crate::factory::{as_object, field_path, require_str};
use crate::mapping::{PropertyFieldMapper, PropertyStore};
use crate::query::filters::{
    ChainedFilter, Filter, FuzzyFilter, HasPropertyFilter, RangeFilter, TextFilter, ValueFilter,
    ValuesFilter,
};
use crate::query::types::{DefaultOperator, Fuzziness, RangeBounds, RangeValue};

/// Factory for filters
pub struct FilterFactory<'a> {
    store: &'a dyn PropertyStore,
    post_filter_properties: Vec<String>,
    default_operator: DefaultOperator,
}

impl<'a> FilterFactory<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self {
            store,
            post_filter_properties: Vec::new(),
            default_operator: DefaultOperator::default(),
        }
    }

    /// Properties whose filters are forced into the post-filter position
    pub fn with_post_filter_properties(mut self, properties: Vec<String>) -> Self {
        self.post_filter_properties = properties;
        self
    }

    /// Default boolean operator for free-text filters
    pub fn with_default_operator(mut self, operator: DefaultOperator) -> Self {
        self.default_operator = operator;
        self
    }

    /// Parse one filter specification
    pub fn parse(&self, spec: &Value, path: &str) -> Result<Filter> {
        let object = as_object(spec, path)?;
        let key = require_str(spec, path, "key")?;
        let mapper = PropertyFieldMapper::resolve(self.store, key)?;

        // A typed filter carries its operand in `value`, so `value` only
        // discriminates when `type` is absent.
        let has_range = object.contains_key("range");
        let has_type = object.contains_key("type");
        let has_value = object.contains_key("value");
        let inner = match (has_range, has_type, has_value) {
            (true, false, false) => {
                self.parse_range(&mapper, &spec["range"], &field_path(path, "range"))?
            }
            (false, true, _) => self.parse_typed(&mapper, spec, path)?,
            (false, false, true) => {
                self.parse_value(&mapper, &spec["value"], &field_path(path, "value"))?
            }
            _ => {
                return Err(FacetqlError::parse(
                    path,
                    "exactly one of `range`, `type` or `value` is required",
                ))
            }
        };

        // A chained key turns the whole filter into a join over the chain.
        let filter = if mapper.is_chained() {
            Filter::from(ChainedFilter::new(mapper, inner))
        } else {
            inner
        };

        let negated = match object.get("negate") {
            None => false,
            Some(Value::Bool(negate)) => *negate,
            Some(_) => {
                return Err(FacetqlError::parse(
                    field_path(path, "negate"),
                    "expected a boolean",
                ))
            }
        };
        let post_filter = self.post_filter_properties.iter().any(|p| p == key);

        Ok(filter.negated(negated).post_filter(post_filter))
    }

    fn parse_range(
        &self,
        mapper: &PropertyFieldMapper,
        spec: &Value,
        path: &str,
    ) -> Result<Filter> {
        let object = as_object(spec, path)?;
        let mut bounds = RangeBounds::default();
        for (field, value) in object {
            let slot = match field.as_str() {
                "gte" => &mut bounds.gte,
                "gt" => &mut bounds.gt,
                "lte" => &mut bounds.lte,
                "lt" => &mut bounds.lt,
                "boost" => {
                    bounds.boost = value.as_f64().ok_or_else(|| {
                        FacetqlError::parse(field_path(path, "boost"), "expected a number")
                    })? as f32;
                    continue;
                }
                other => {
                    return Err(FacetqlError::parse(
                        field_path(path, other),
                        "unknown range bound",
                    ))
                }
            };
            *slot = Some(parse_range_value(value, &field_path(path, field))?);
        }
        if !bounds.is_bounded() {
            return Err(FacetqlError::parse(path, "range needs at least one numeric bound"));
        }
        Ok(Filter::from(RangeFilter::new(mapper.clone(), bounds)))
    }

    fn parse_typed(
        &self,
        mapper: &PropertyFieldMapper,
        spec: &Value,
        path: &str,
    ) -> Result<Filter> {
        let kind = require_str(spec, path, "type")?;
        let value = require_str(spec, path, "value")?;
        match kind {
            "query" => {
                let operator = match spec.get("operator") {
                    None => self.default_operator,
                    Some(Value::String(operator)) => {
                        DefaultOperator::parse(operator).ok_or_else(|| {
                            FacetqlError::parse(
                                field_path(path, "operator"),
                                "expected `and` or `or`",
                            )
                        })?
                    }
                    Some(_) => {
                        return Err(FacetqlError::parse(
                            field_path(path, "operator"),
                            "expected a string",
                        ))
                    }
                };
                Ok(Filter::from(
                    TextFilter::new(mapper.clone(), value).with_operator(operator),
                ))
            }
            "fuzzy" => {
                let fuzziness = parse_fuzziness(spec.get("fuzziness"), &field_path(path, "fuzziness"))?;
                Ok(Filter::from(
                    FuzzyFilter::new(mapper.clone(), value).with_fuzziness(fuzziness),
                ))
            }
            other => Err(FacetqlError::parse(
                field_path(path, "type"),
                format!("unknown filter type `{other}`, expected `query` or `fuzzy`"),
            )),
        }
    }

    fn parse_value(
        &self,
        mapper: &PropertyFieldMapper,
        spec: &Value,
        path: &str,
    ) -> Result<Filter> {
        match spec {
            // The literal "+" means "the property is set at all"
            Value::String(s) if s == "+" => {
                Ok(Filter::from(HasPropertyFilter::new(mapper.clone())))
            }
            Value::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if !is_scalar(value) {
                        return Err(FacetqlError::parse(
                            format!("{path}.{i}"),
                            "expected a scalar value",
                        ));
                    }
                }
                Ok(Filter::from(ValuesFilter::new(mapper.clone(), values.clone())))
            }
            value if is_scalar(value) => {
                Ok(Filter::from(ValueFilter::new(mapper.clone(), value.clone())))
            }
            _ => Err(FacetqlError::parse(
                path,
                "expected a scalar, an array of scalars, or \"+\"",
            )),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    value.is_string() || value.is_number() || value.is_boolean()
}

fn parse_range_value(value: &Value, path: &str) -> Result<RangeValue> {
    if let Some(long) = value.as_i64() {
        return Ok(RangeValue::Long(long));
    }
    if let Some(double) = value.as_f64() {
        return Ok(RangeValue::Double(double));
    }
    Err(FacetqlError::parse(path, "expected a numeric bound"))
}

fn parse_fuzziness(value: Option<&Value>, path: &str) -> Result<Fuzziness> {
    match value {
        None => Ok(Fuzziness::Auto),
        Some(Value::String(s)) if s == "AUTO" => Ok(Fuzziness::Auto),
        Some(value) => match value.as_u64() {
            Some(distance) => Ok(Fuzziness::Distance(distance as u32)),
            None => Err(FacetqlError::parse(
                path,
                "expected \"AUTO\" or a non-negative integer",
            )),
        },
    }
}
