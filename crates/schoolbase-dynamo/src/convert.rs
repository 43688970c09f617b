//! Conversion between items and DynamoDB attribute maps

use crate::error::{DynamoError, Result};
use aws_sdk_dynamodb::types::AttributeValue;
use schoolbase_core::{Item, Value};
use std::collections::HashMap;

/// Convert a value to its DynamoDB attribute form.
///
/// NaN and infinities have no DynamoDB number form and are rejected.
pub fn to_attribute(value: &Value) -> Result<AttributeValue> {
    Ok(match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Int(i) => AttributeValue::N(i.to_string()),
        Value::Float(f) if !f.is_finite() => {
            return Err(DynamoError::UnsupportedAttribute(format!("number {}", f)));
        }
        Value::Float(f) => AttributeValue::N(f.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::List(list) => AttributeValue::L(
            list.iter().map(to_attribute).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => AttributeValue::M(to_attributes(map)?),
    })
}

/// Convert an item to a DynamoDB attribute map
pub fn to_attributes(item: &Item) -> Result<HashMap<String, AttributeValue>> {
    item.iter()
        .map(|(k, v)| to_attribute(v).map(|attr| (k.clone(), attr)))
        .collect()
}

/// Convert a DynamoDB attribute back to a value.
///
/// String and number sets become lists. Binary attributes are rejected.
pub fn from_attribute(attr: &AttributeValue) -> Result<Value> {
    match attr {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(list) => list
            .iter()
            .map(from_attribute)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        AttributeValue::M(map) => from_attributes(map).map(Value::Map),
        AttributeValue::Ss(set) => Ok(Value::List(
            set.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        other => Err(DynamoError::UnsupportedAttribute(format!("{:?}", other))),
    }
}

/// Convert a DynamoDB attribute map to an item, attributes sorted by name
pub fn from_attributes(map: &HashMap<String, AttributeValue>) -> Result<Item> {
    let mut names: Vec<&String> = map.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| from_attribute(&map[name]).map(|value| (name.clone(), value)))
        .collect()
}

fn parse_number(n: &str) -> Result<Value> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    n.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| DynamoError::UnsupportedAttribute(format!("number {:?}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolbase_core::SeedRecord;

    #[test]
    fn test_scalars_to_attribute() {
        assert_eq!(to_attribute(&Value::from("T001")).unwrap(), AttributeValue::S("T001".into()));
        assert_eq!(to_attribute(&Value::Int(34)).unwrap(), AttributeValue::N("34".into()));
        assert_eq!(to_attribute(&Value::Float(1.5)).unwrap(), AttributeValue::N("1.5".into()));
        assert_eq!(to_attribute(&Value::Null).unwrap(), AttributeValue::Null(true));
    }

    #[test]
    fn test_list_to_attribute() {
        let recipients = Value::from(vec!["all"]);
        assert_eq!(
            to_attribute(&recipients).unwrap(),
            AttributeValue::L(vec![AttributeValue::S("all".into())])
        );
    }

    #[test]
    fn test_seed_item_comes_back_sorted() {
        let item = SeedRecord::new()
            .with("classId", "C001")
            .with("students", 34i64)
            .with("grade", "Year 10")
            .into_item();

        let back = from_attributes(&to_attributes(&item).unwrap()).unwrap();
        let names: Vec<&str> = back.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["classId", "grade", "students"]);
        assert_eq!(back.get("students"), Some(&Value::Int(34)));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = to_attribute(&Value::Float(f)).unwrap_err();
            assert!(matches!(err, DynamoError::UnsupportedAttribute(_)));
        }

        let item = SeedRecord::new()
            .with("classId", "C001")
            .with("scores", Value::List(vec![Value::Float(1.0), Value::Float(f64::NAN)]))
            .into_item();
        assert!(to_attributes(&item).is_err());
    }

    #[test]
    fn test_sets_become_lists() {
        let ss = AttributeValue::Ss(vec!["a".into(), "b".into()]);
        assert_eq!(from_attribute(&ss).unwrap(), Value::from(vec!["a", "b"]));
        let ns = AttributeValue::Ns(vec!["1".into(), "2.5".into()]);
        assert_eq!(
            from_attribute(&ns).unwrap(),
            Value::List(vec![Value::Int(1), Value::Float(2.5)])
        );
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = from_attribute(&AttributeValue::N("twelve".into())).unwrap_err();
        assert!(matches!(err, DynamoError::UnsupportedAttribute(_)));
    }
}
