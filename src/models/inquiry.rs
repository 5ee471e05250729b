use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Form fields that can carry an inline validation message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Email,
    DepartureDate,
    Subject,
    Destination,
    Message,
}

/// Per-field validation messages, ordered by field.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }
}

/// The booking panel form as the customer fills it in.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub departure_date: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Partial update of an [`InquiryForm`]; absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InquiryFormPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub departure_date: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub travelers: Option<u32>,
}

impl InquiryForm {
    pub fn apply(&mut self, patch: &InquiryFormPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(date) = &patch.departure_date {
            self.departure_date = date.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(message) = &patch.message {
            self.message = Some(message.clone());
        }
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Body of the one-shot inquiry endpoint.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[serde(flatten)]
    pub form: InquiryForm,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
}

fn default_travelers() -> u32 {
    1
}

/// Record produced by a successful inquiry. Nothing is reserved or paid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingIntent {
    pub id: Uuid,
    pub tour_id: u32,
    pub tour_title: String,
    pub departure_date: NaiveDate,
    pub traveler_count: u32,
    pub total_price: u64,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub booking: BookingIntent,
    pub whatsapp_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errors_serialize_by_field_name() {
        let mut errors = ValidationErrors::new();
        errors.insert(FormField::DepartureDate, "Please select a departure date");
        errors.insert(FormField::Name, "Name is required");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Name is required",
                "departureDate": "Please select a departure date"
            })
        );
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut form = InquiryForm {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            ..Default::default()
        };
        let patch: InquiryFormPatch =
            serde_json::from_value(json!({ "departureDate": "2024-03-05" })).unwrap();
        form.apply(&patch);
        assert_eq!(form.name, "Ann");
        assert_eq!(form.departure_date, "2024-03-05");
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let form = InquiryForm {
            phone: Some("   ".to_string()),
            message: Some(" Vegetarian meals ".to_string()),
            ..Default::default()
        };
        assert_eq!(form.phone(), None);
        assert_eq!(form.message(), Some("Vegetarian meals"));
    }

    #[test]
    fn test_request_defaults_to_one_traveler() {
        let request: InquiryRequest = serde_json::from_value(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "departureDate": "2024-03-05"
        }))
        .unwrap();
        assert_eq!(request.travelers, 1);
        assert_eq!(request.form.name, "Ann");
    }
}
