use serde_json::Value;

use crate::circuit::FieldElement;
use crate::error::AppError;

/// Normalize the login `inputs` field to the flat circuit vector.
///
/// Clients send either the flat vector or nested per-parameter arrays, so
/// arrays are flattened depth-first. Leaves must be decimal strings or
/// non-negative integers below 2^64.
pub fn flatten_inputs(inputs: &Value) -> Result<Vec<FieldElement>, AppError> {
    fn walk(value: &Value, out: &mut Vec<FieldElement>) -> Result<(), AppError> {
        match value {
            Value::Array(items) => items.iter().try_for_each(|item| walk(item, out)),
            Value::String(text) => {
                let element = text
                    .parse::<FieldElement>()
                    .map_err(|e| AppError::Validation(format!("Invalid input value: {}", e)))?;
                out.push(element);
                Ok(())
            }
            Value::Number(number) => {
                let value = number.as_u64().ok_or_else(|| {
                    AppError::Validation(format!(
                        "Invalid input value {}: numbers must be non-negative integers below 2^64",
                        number
                    ))
                })?;
                out.push(FieldElement(value as u128));
                Ok(())
            }
            other => Err(AppError::Validation(format!("Invalid input value: {}", other))),
        }
    }

    if !inputs.is_array() {
        return Err(AppError::Validation("inputs must be an array".to_string()));
    }
    let mut flat = Vec::new();
    walk(inputs, &mut flat)?;
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_and_flat_agree() {
        let flat = flatten_inputs(&json!(["1", "2", "0", "1", "5", "6"])).unwrap();
        let nested = flatten_inputs(&json!([["1", "2"], [["0", "1"]], ["5", 6]])).unwrap();
        assert_eq!(flat, nested);
        assert_eq!(flat.len(), 6);
    }

    #[test]
    fn test_flatten_big_values_as_strings() {
        let values = flatten_inputs(&json!([
            "291758579581176276479882149098931506236",
            "115202997958126358074360036803991057756"
        ]))
        .unwrap();
        assert_eq!(values[0].value(), 291_758_579_581_176_276_479_882_149_098_931_506_236);
    }

    #[test]
    fn test_flatten_rejects_bad_leaves() {
        assert!(flatten_inputs(&json!("1 2 3")).is_err());
        assert!(flatten_inputs(&json!(["1", null])).is_err());
        assert!(flatten_inputs(&json!(["1", -4])).is_err());
        assert!(flatten_inputs(&json!(["0x10"])).is_err());
        assert!(flatten_inputs(&json!([{"a": 1}])).is_err());
        assert!(flatten_inputs(&json!([])).unwrap().is_empty());
    }
}
