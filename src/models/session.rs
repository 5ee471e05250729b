use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::inquiry::{BookingIntent, InquiryForm, ValidationErrors};

/// Lifecycle of a booking panel's form.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryState {
    Empty,
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub tour_id: u32,
    pub state: InquiryState,
    pub form: InquiryForm,
    pub travelers: u32,
    pub max_travelers: u32,
    pub unit_price: u64,
    pub total_price: u64,
    pub errors: ValidationErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub tour_id: u32,
}
