//! Form validation for profile and address submissions.

use serde::{Deserialize, Deserializer, de};

use crate::db::users::AddressFields;

/// Deserialize an optional numeric form field, treating an empty string
/// as absent.
///
/// Browsers submit `name=` for untouched selects and cleared number
/// inputs; plain `Option<i32>` rejects that as a parse error.
///
/// # Errors
///
/// Returns a deserialization error if a non-empty value fails to parse.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

/// A single field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }
}

/// Shipping address form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
}

impl AddressForm {
    /// Validate that every address field is present and non-blank.
    ///
    /// Values are trimmed before both the check and the returned fields.
    ///
    /// # Errors
    ///
    /// Returns one `FieldError` per missing field.
    pub fn validate(&self) -> Result<AddressFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        let street_address = self.street_address.trim();
        let city = self.city.trim();
        let state = self.state.trim();
        let country = self.country.trim();
        let zip_code = self.zip_code.trim();

        if street_address.is_empty() {
            errors.push(FieldError::required("street_address"));
        }
        if city.is_empty() {
            errors.push(FieldError::required("city"));
        }
        if state.is_empty() {
            errors.push(FieldError::required("state"));
        }
        if country.is_empty() {
            errors.push(FieldError::required("country"));
        }
        if zip_code.is_empty() {
            errors.push(FieldError::required("zip_code"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(AddressFields {
            street_address: street_address.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            country: country.to_owned(),
            zip_code: zip_code.to_owned(),
        })
    }

    /// Convert without completeness checks, trimming each field.
    ///
    /// Used by the standalone add-address form, which accepts partial
    /// addresses.
    #[must_use]
    pub fn into_fields(self) -> AddressFields {
        AddressFields {
            street_address: self.street_address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            country: self.country.trim().to_owned(),
            zip_code: self.zip_code.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> AddressForm {
        AddressForm {
            street_address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            country: "USA".to_owned(),
            zip_code: "62704".to_owned(),
        }
    }

    #[test]
    fn test_validate_complete_address() {
        let fields = full_form().validate().expect("complete address validates");
        assert_eq!(fields.city, "Springfield");
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let mut form = full_form();
        form.city = "  Springfield  ".to_owned();
        let fields = form.validate().expect("trimmed address validates");
        assert_eq!(fields.city, "Springfield");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut form = full_form();
        form.state = "   ".to_owned();
        form.zip_code = String::new();

        let errors = form.validate().expect_err("blank fields rejected");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["state", "zip_code"]);
    }

    #[test]
    fn test_into_fields_allows_partial() {
        let form = AddressForm {
            street_address: "1 Main St".to_owned(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            zip_code: String::new(),
        };
        let fields = form.into_fields();
        assert_eq!(fields.street_address, "1 Main St");
        assert!(fields.city.is_empty());
    }
}
