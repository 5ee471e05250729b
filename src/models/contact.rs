use serde::{Deserialize, Serialize};

use crate::models::inquiry::non_blank;

/// Which of the site's general lead forms sent the inquiry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    Contact,
    Email,
    Quick,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInquiry {
    pub kind: ContactKind,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub destination: Option<String>,
    pub message: Option<String>,
}

impl ContactInquiry {
    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn subject(&self) -> Option<&str> {
        non_blank(self.subject.as_deref())
    }

    pub fn destination(&self) -> Option<&str> {
        non_blank(self.destination.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub status: String,
    pub whatsapp_url: String,
}
