//! Record field arguments shared by `add` and `update`

use crate::domain::{Fields, NewHospital, Year, YEAR_FIELD};
use clap::Args;
use serde_json::Value;

/// Record contents, either as repeated `--field` pairs or one JSON object
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Field as key=value; the value is parsed as JSON, falling back to a string
    #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,

    /// Whole record as a JSON object
    #[arg(long, value_name = "OBJECT", conflicts_with = "fields")]
    pub json: Option<String>,
}

/// Parse one `key=value` argument
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

impl FieldArgs {
    /// Collect the record contents into a field map
    pub fn to_fields(&self) -> Result<Fields, String> {
        match &self.json {
            Some(json) => match serde_json::from_str::<Value>(json) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err("--json must be a JSON object".to_string()),
                Err(e) => Err(format!("--json is not valid JSON: {e}")),
            },
            None => Ok(self.fields.iter().cloned().collect()),
        }
    }

    /// Build the record to add. `--year` wins over a `YEAR` inside the fields.
    pub fn to_new_hospital(&self, year: Option<&str>) -> Result<NewHospital, String> {
        let mut fields = self.to_fields()?;
        if let Some(year) = year {
            fields.insert(YEAR_FIELD.to_string(), Value::String(year.to_string()));
        }
        NewHospital::from_value(Value::Object(fields)).map_err(|e| e.to_string())
    }
}

/// Parse a `--year` argument
pub fn parse_year(raw: &str) -> Result<Year, String> {
    Year::new(raw)
}
