//! Hospital record models
//!
//! A hospital record is an open set of JSON fields stored under
//! `hospitals/{year}/{id}`. The domain fields (name, address, capacity, ...)
//! are not validated here; only the two keys that locate the record are typed.

use super::ids::{HospitalId, Year};
use super::{HospitalError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name carrying the record id in a flattened hospital
pub const ID_FIELD: &str = "id";

/// Field name carrying the year partition in a flattened hospital
pub const YEAR_FIELD: &str = "YEAR";

/// Open set of domain fields of a hospital record
pub type Fields = Map<String, Value>;

/// A hospital as exposed to consumers: the stored fields annotated with the
/// record id and its year partition.
///
/// Serializes to one flat JSON object, e.g.
/// `{"id": "-Nq...", "YEAR": "2024", "name": "Seoul General"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    /// Store-assigned record id
    pub id: HospitalId,

    /// Year partition the record lives under
    #[serde(rename = "YEAR")]
    pub year: Year,

    #[serde(flatten)]
    fields: Fields,
}

impl Hospital {
    /// Build a hospital from its location and stored fields.
    ///
    /// Stored fields named `id` or `YEAR` are dropped: the location always
    /// wins over whatever the record body says about itself.
    pub fn new(id: HospitalId, year: Year, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        fields.remove(YEAR_FIELD);
        Self { id, year, fields }
    }

    /// Domain fields, without `id` and `YEAR`
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Look up a single domain field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convenience accessor for the conventional `name` field
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Consume the hospital, returning the domain fields
    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Render the flat JSON object consumers see
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        object.insert(YEAR_FIELD.to_string(), Value::String(self.year.to_string()));
        Value::Object(object)
    }
}

/// Input to `add_hospital`: a full record including its year tag
#[derive(Debug, Clone, PartialEq)]
pub struct NewHospital {
    /// Partition the record will be appended under
    pub year: Year,

    /// Fields written to the store
    pub fields: Fields,
}

impl NewHospital {
    /// Create a new record for `year`. A `YEAR` entry inside `fields` is
    /// discarded so the year is never stored twice.
    pub fn new(year: Year, mut fields: Fields) -> Self {
        fields.remove(YEAR_FIELD);
        Self { year, fields }
    }

    /// Split a flat JSON object carrying a `YEAR` key into year and fields.
    ///
    /// The year may be a JSON string or an integer.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Validation` if the value is not an object or
    /// has no usable `YEAR`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hospital_sync::domain::NewHospital;
    /// use serde_json::json;
    ///
    /// let record = NewHospital::from_value(json!({"YEAR": "2024", "name": "A"})).unwrap();
    /// assert_eq!(record.year.as_str(), "2024");
    /// assert_eq!(record.fields, json!({"name": "A"}).as_object().unwrap().clone());
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(HospitalError::Validation(
                "hospital record must be a JSON object".to_string(),
            ));
        };

        let year = match fields.remove(YEAR_FIELD) {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            Some(other) => {
                return Err(HospitalError::Validation(format!(
                    "{YEAR_FIELD} must be a string or integer, got {other}"
                )))
            }
            None => {
                return Err(HospitalError::Validation(format!(
                    "hospital record is missing {YEAR_FIELD}"
                )))
            }
        };

        let year = Year::new(year).map_err(HospitalError::Validation)?;
        Ok(Self { year, fields })
    }

    /// Fields as the JSON value written to the store
    pub fn fields_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
