use url::Url;

use crate::models::contact::ContactInquiry;
use crate::models::inquiry::BookingIntent;
use crate::models::tour::TourRecord;
use crate::services::pricing_service::PricingService;

const WHATSAPP_BASE: &str = "https://wa.me/";

pub const DEFAULT_GREETING: &str = "Hello! I'm interested in learning more about your Nepal tours. Could you please provide more information?";

/// Builds pre-filled WhatsApp deep links. Opening them is left to the client.
#[derive(Debug, Clone)]
pub struct WhatsAppHandoff {
    base: Url,
}

impl WhatsAppHandoff {
    /// Non-digit characters in `number` ("+977 984-...") are dropped.
    pub fn new(number: &str) -> Result<Self, url::ParseError> {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        let base = Url::parse(WHATSAPP_BASE)?.join(&digits)?;
        Ok(Self { base })
    }

    pub fn link(&self, text: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("text", text);
        url
    }

    pub fn default_link(&self) -> Url {
        self.link(DEFAULT_GREETING)
    }

    pub fn booking_link(&self, intent: &BookingIntent, tour: &TourRecord) -> Url {
        self.link(&booking_message(intent, tour))
    }

    pub fn contact_link(&self, inquiry: &ContactInquiry) -> Url {
        self.link(&contact_message(inquiry))
    }
}

/// Multi-line booking summary sent to the operator. Field order is stable.
pub fn booking_message(intent: &BookingIntent, tour: &TourRecord) -> String {
    let travelers = if intent.traveler_count == 1 {
        "1 person".to_string()
    } else {
        format!("{} people", intent.traveler_count)
    };
    let requests = intent
        .message
        .as_deref()
        .map(|message| format!("💬 Special Requests:\n{}\n\n", message))
        .unwrap_or_default();

    format!(
        "🏔️ TOUR BOOKING REQUEST\n\
         \n\
         📋 TOUR DETAILS:\n\
         • Tour: {title}\n\
         • Duration: {duration}\n\
         • Location: {location}\n\
         • Travelers: {travelers}\n\
         • Departure Date: {date}\n\
         • Total Price: {total}\n\
         \n\
         👤 CUSTOMER INFORMATION:\n\
         • Name: {name}\n\
         • Email: {email}\n\
         • Phone: {phone}\n\
         \n\
         {requests}\
         ✅ I would like to proceed with this booking. Please confirm availability and provide payment details.\n\
         \n\
         Thank you!",
        title = intent.tour_title,
        duration = tour.duration,
        location = tour.location,
        travelers = travelers,
        date = intent.departure_date.format("%A, %B %-d, %Y"),
        total = PricingService::format_usd(intent.total_price),
        name = intent.customer_name,
        email = intent.customer_email,
        phone = intent.customer_phone.as_deref().unwrap_or("Not provided"),
        requests = requests,
    )
}

pub fn contact_message(inquiry: &ContactInquiry) -> String {
    let subject = inquiry
        .subject()
        .or_else(|| inquiry.destination())
        .unwrap_or("General Inquiry");

    format!(
        "Hi! I'm interested in learning more about your Nepal tours.\n\
         \n\
         My Details:\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Subject: {subject}\n\
         \n\
         Message: {message}\n\
         \n\
         Please provide more information about your Nepal tours and packages.",
        name = not_provided(&inquiry.name),
        email = not_provided(&inquiry.email),
        phone = inquiry.phone().unwrap_or("Not provided"),
        subject = subject,
        message = inquiry
            .message()
            .unwrap_or("I would like to know more about your tours and services."),
    )
}

fn not_provided(value: &str) -> &str {
    match value.trim() {
        "" => "Not provided",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog_service::Catalog;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn intent(travelers: u32, message: Option<&str>) -> BookingIntent {
        BookingIntent {
            id: Uuid::new_v4(),
            tour_id: 1,
            tour_title: "Everest Base Camp Trek".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            traveler_count: travelers,
            total_price: 2299 * u64::from(travelers),
            customer_name: "Ann".to_string(),
            customer_email: "ann@example.com".to_string(),
            customer_phone: None,
            message: message.map(str::to_string),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_booking_message_fields_in_order() {
        let catalog = Catalog::bundled().unwrap();
        let tour = &catalog.find(1).unwrap().tour;
        let text = booking_message(&intent(3, None), tour);

        let order = [
            "• Tour: Everest Base Camp Trek",
            "• Duration: 14 Days",
            "• Location: Everest Region",
            "• Travelers: 3 people",
            "• Departure Date: Tuesday, March 5, 2024",
            "• Total Price: $6,897",
            "• Name: Ann",
            "• Email: ann@example.com",
            "• Phone: Not provided",
        ];
        let mut last = 0;
        for line in order {
            let at = text.find(line).unwrap_or_else(|| panic!("missing {:?}", line));
            assert!(at >= last, "{:?} out of order", line);
            last = at;
        }
        assert!(!text.contains("Special Requests"));
    }

    #[test]
    fn test_booking_message_singular_and_requests() {
        let catalog = Catalog::bundled().unwrap();
        let tour = &catalog.find(1).unwrap().tour;
        let text = booking_message(&intent(1, Some("Vegetarian meals")), tour);
        assert!(text.contains("• Travelers: 1 person\n"));
        assert!(text.contains("💬 Special Requests:\nVegetarian meals"));
    }

    #[test]
    fn test_link_encodes_text() {
        let handoff = WhatsAppHandoff::new("+977 984-7228505").unwrap();
        let url = handoff.link("Hi & bye");
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/9779847228505");
        let text: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(text, vec![("text".to_string(), "Hi & bye".to_string())]);
    }

    #[test]
    fn test_contact_message_placeholders() {
        let text = contact_message(&ContactInquiry::default());
        assert!(text.contains("Name: Not provided"));
        assert!(text.contains("Subject: General Inquiry"));
        assert!(text.contains("Message: I would like to know more"));
    }
}
