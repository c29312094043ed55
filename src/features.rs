use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ServiceErr};

/// Number of features the model expects per sample.
pub const NUM_FEATURES: usize = 4;

/// Payload field names, in the order the model expects them.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// The four measurements describing one iris sample.
///
/// Values are not range-checked: negative or otherwise implausible
/// measurements are passed to the model as they are. They only have to fit in an `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub sepal_length: f32,
    pub sepal_width: f32,
    pub petal_length: f32,
    pub petal_width: f32,
}

impl FeatureVector {
    /// Creates a new `FeatureVector`.
    ///
    /// # Arguments
    /// * `sepal_length` - Sepal length in centimeters.
    /// * `sepal_width` - Sepal width in centimeters.
    /// * `petal_length` - Petal length in centimeters.
    /// * `petal_width` - Petal width in centimeters.
    ///
    /// # Returns
    /// A new `FeatureVector` instance.
    pub const fn new(
        sepal_length: f32,
        sepal_width: f32,
        petal_length: f32,
        petal_width: f32,
    ) -> Self {
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    /// Extracts the four named numeric fields out of an untyped json payload.
    ///
    /// # Arguments
    /// * `payload` - The parsed request body.
    ///
    /// # Returns
    /// The feature vector or an `InvalidInput` error if the payload isn't an object,
    /// or any of the fields is missing or isn't a number.
    pub fn from_json(payload: &Value) -> Result<Self> {
        let Value::Object(fields) = payload else {
            return Err(ServiceErr::invalid_input(format!(
                "expected a json object, got {}",
                kind_of(payload)
            )));
        };

        let mut values = [0.0; NUM_FEATURES];
        for (value, name) in values.iter_mut().zip(FEATURE_NAMES) {
            *value = numeric_field(fields, name)?;
        }

        Ok(Self::from(values))
    }

    /// Returns the features as the flat row fed to the model.
    pub fn to_array(&self) -> [f32; NUM_FEATURES] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

impl From<[f32; NUM_FEATURES]> for FeatureVector {
    fn from([sl, sw, pl, pw]: [f32; NUM_FEATURES]) -> Self {
        Self::new(sl, sw, pl, pw)
    }
}

impl TryFrom<&[f32]> for FeatureVector {
    type Error = ServiceErr;

    fn try_from(values: &[f32]) -> Result<Self> {
        let values: [f32; NUM_FEATURES] = values.try_into().map_err(|_| {
            ServiceErr::invalid_input(format!(
                "input should have exactly {NUM_FEATURES} features, got {}",
                values.len()
            ))
        })?;

        Ok(Self::from(values))
    }
}

fn numeric_field(fields: &Map<String, Value>, name: &str) -> Result<f32> {
    match fields.get(name) {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                ServiceErr::invalid_input(format!("field `{name}` doesn't fit in an f32: {n}"))
            }),
        Some(other) => Err(ServiceErr::invalid_input(format!(
            "field `{name}` must be a number, got {}",
            kind_of(other)
        ))),
        None => Err(ServiceErr::invalid_input(format!(
            "missing required field `{name}`"
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_fields_in_model_order() {
        let payload = json!({
            "petal_width": 0.2,
            "sepal_length": 5.1,
            "petal_length": 1.4,
            "sepal_width": 3.5,
        });

        let features = FeatureVector::from_json(&payload).unwrap();
        assert_eq!(features.to_array(), [5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn accepts_integers_and_out_of_range_values() {
        let payload = json!({
            "sepal_length": 5,
            "sepal_width": -3.5,
            "petal_length": 1000.0,
            "petal_width": 0,
        });

        let features = FeatureVector::from_json(&payload).unwrap();
        assert_eq!(features.to_array(), [5.0, -3.5, 1000.0, 0.0]);
    }

    #[test]
    fn ignores_unknown_fields() {
        let payload = json!({
            "sepal_length": 6.3,
            "sepal_width": 2.9,
            "petal_length": 5.6,
            "petal_width": 1.8,
            "color": "purple",
        });

        assert!(FeatureVector::from_json(&payload).is_ok());
    }

    #[test]
    fn rejects_missing_field() {
        let payload = json!({
            "sepal_length": 5.1,
            "sepal_width": 3.5,
            "petal_length": 1.4,
        });

        let err = FeatureVector::from_json(&payload).unwrap_err();
        assert!(matches!(err, ServiceErr::InvalidInput(ref msg) if msg.contains("petal_width")));
    }

    #[test]
    fn rejects_numeric_strings() {
        let payload = json!({
            "sepal_length": "5.1",
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2,
        });

        let err = FeatureVector::from_json(&payload).unwrap_err();
        assert!(matches!(err, ServiceErr::InvalidInput(ref msg) if msg.contains("a string")));
    }

    #[test]
    fn rejects_values_overflowing_f32() {
        for huge in [1e300, -1e39] {
            let payload = json!({
                "sepal_length": 5.1,
                "sepal_width": 3.5,
                "petal_length": huge,
                "petal_width": 0.2,
            });

            let err = FeatureVector::from_json(&payload).unwrap_err();
            assert!(
                matches!(err, ServiceErr::InvalidInput(ref msg) if msg.contains("petal_length"))
            );
        }
    }

    #[test]
    fn rejects_null_field() {
        let payload = json!({
            "sepal_length": 5.1,
            "sepal_width": null,
            "petal_length": 1.4,
            "petal_width": 0.2,
        });

        assert!(matches!(
            FeatureVector::from_json(&payload),
            Err(ServiceErr::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [json!([5.1, 3.5, 1.4, 0.2]), json!(null), json!("iris")] {
            assert!(matches!(
                FeatureVector::from_json(&payload),
                Err(ServiceErr::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn slice_must_have_four_values() {
        assert!(FeatureVector::try_from(&[1.0_f32, 2.0, 3.0, 4.0][..]).is_ok());

        for values in [&[][..], &[1.0_f32, 2.0, 3.0][..], &[1.0; 5][..]] {
            let err = FeatureVector::try_from(values).unwrap_err();
            assert!(matches!(err, ServiceErr::InvalidInput(ref msg) if msg.contains("exactly 4")));
        }
    }
}
