use chrono::{Datelike, DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::models::contact::{ContactInquiry, ContactKind};
use crate::models::inquiry::{BookingIntent, FormField, InquiryForm, ValidationErrors};
use crate::services::catalog_service::CatalogEntry;
use crate::services::pricing_service::{PricingService, TravelerCount};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const DATE_REQUIRED: &str = "Please select a departure date";
pub const DATE_UNAVAILABLE: &str = "Please select an available departure date";

fn check_name_and_email(name: &str, email: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.insert(FormField::Name, NAME_REQUIRED);
    }

    if email.trim().is_empty() {
        errors.insert(FormField::Email, EMAIL_REQUIRED);
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.insert(FormField::Email, EMAIL_INVALID);
    }
}

/// Check the required fields of a booking form. Every violation is reported.
pub fn validate(form: &InquiryForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_name_and_email(&form.name, &form.email, &mut errors);

    if form.departure_date.trim().is_empty() {
        errors.insert(FormField::DepartureDate, DATE_REQUIRED);
    }

    errors
}

pub fn validate_contact(inquiry: &ContactInquiry) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_name_and_email(&inquiry.name, &inquiry.email, &mut errors);

    match inquiry.kind {
        ContactKind::Contact | ContactKind::Email => {
            if inquiry.subject().is_none() {
                errors.insert(FormField::Subject, "Please select a subject");
            }
            if inquiry.message().is_none() {
                errors.insert(FormField::Message, "Message is required");
            }
        }
        ContactKind::Quick => {
            if inquiry.destination().is_none() {
                errors.insert(FormField::Destination, "Please select a destination");
            }
        }
    }

    errors
}

/// Generates the departure dates a customer may pick from.
///
/// Generated departures sit on a fixed cadence counted from 0001-01-01, so a
/// weekly schedule always departs on Sundays and a date offered on one day is
/// still on the schedule the next.
#[derive(Debug, Clone, Copy)]
pub struct DepartureSchedule {
    pub interval_days: u32,
    pub horizon_days: u32,
}

impl Default for DepartureSchedule {
    fn default() -> Self {
        Self {
            interval_days: 7,
            horizon_days: 180,
        }
    }
}

impl DepartureSchedule {
    fn step(&self) -> i32 {
        i32::try_from(self.interval_days.max(1)).unwrap_or(i32::MAX)
    }

    fn horizon(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(i64::from(self.horizon_days))
    }

    fn on_cadence(&self, date: NaiveDate) -> bool {
        date.num_days_from_ce().rem_euclid(self.step()) == 0
    }

    /// Fixed dates from the tour when it has them, otherwise every cadence
    /// date after `today` up to the horizon.
    pub fn candidates(&self, tour: &CatalogEntry, today: NaiveDate) -> Vec<NaiveDate> {
        if let Some(dates) = &tour.tour.available_dates {
            return dates.clone();
        }

        let step = self.step();
        let ahead = step - today.num_days_from_ce().rem_euclid(step);
        let interval = Duration::days(i64::from(step));
        let horizon = self.horizon(today);
        std::iter::successors(Some(today + Duration::days(i64::from(ahead))), |date| {
            date.checked_add_signed(interval)
        })
        .take_while(|date| *date <= horizon)
        .collect()
    }

    /// Whether `date` can be booked on `today`: one of the tour's fixed dates,
    /// or a cadence date from `today` through the horizon. Every date offered
    /// on an earlier day passes until it is in the past.
    pub fn accepts(&self, tour: &CatalogEntry, date: NaiveDate, today: NaiveDate) -> bool {
        if let Some(dates) = &tour.tour.available_dates {
            return dates.contains(&date);
        }
        date >= today && date <= self.horizon(today) && self.on_cadence(date)
    }
}

pub struct InquiryService;

impl InquiryService {
    /// Validate the form and build the booking intent.
    ///
    /// The selected date must parse and be accepted by `schedule` on the
    /// date of `now`.
    pub fn submit(
        tour: &CatalogEntry,
        form: &InquiryForm,
        travelers: TravelerCount,
        schedule: &DepartureSchedule,
        now: DateTime<Utc>,
    ) -> Result<BookingIntent, ValidationErrors> {
        let mut errors = validate(form);
        let today = now.date_naive();

        let departure_date = if errors.contains(FormField::DepartureDate) {
            None
        } else {
            match NaiveDate::parse_from_str(form.departure_date.trim(), "%Y-%m-%d") {
                Ok(date) if schedule.accepts(tour, date, today) => Some(date),
                _ => {
                    errors.insert(FormField::DepartureDate, DATE_UNAVAILABLE);
                    None
                }
            }
        };

        let departure_date = match departure_date {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        Ok(BookingIntent {
            id: Uuid::new_v4(),
            tour_id: tour.tour.id,
            tour_title: tour.tour.title.clone(),
            departure_date,
            traveler_count: travelers.get(),
            total_price: PricingService::compute_total(tour.unit_price, travelers),
            customer_name: form.name.trim().to_string(),
            customer_email: form.email.trim().to_string(),
            customer_phone: form.phone().map(str::to_string),
            message: form.message().map(str::to_string),
            submitted_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog_service::Catalog;
    use chrono::Weekday;

    fn valid_form() -> InquiryForm {
        InquiryForm {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            departure_date: "2024-03-05".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_form_reports_three_required_fields() {
        let errors = validate(&InquiryForm::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(FormField::Name), Some(NAME_REQUIRED));
        assert_eq!(errors.get(FormField::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(FormField::DepartureDate), Some(DATE_REQUIRED));
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn test_invalid_email_is_the_only_error() {
        let form = InquiryForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Email), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let form = InquiryForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form).get(FormField::Name), Some(NAME_REQUIRED));
    }

    // Monday 2024-01-01, 09:00 UTC
    fn monday() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_weekly_schedule() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let today = monday().date_naive();
        let dates = DepartureSchedule::default().candidates(tour, today);
        assert_eq!(dates.len(), 25);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert!(dates.iter().all(|date| date.weekday() == Weekday::Sun));
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
        assert!(*dates.last().unwrap() <= today + Duration::days(180));
    }

    #[test]
    fn test_offered_dates_survive_the_next_day() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let schedule = DepartureSchedule::default();
        let today = monday().date_naive();
        let tomorrow = today + Duration::days(1);

        let offered = schedule.candidates(tour, today);
        assert!(offered
            .iter()
            .all(|date| schedule.accepts(tour, *date, tomorrow)));

        let next_day_list = schedule.candidates(tour, tomorrow);
        assert!(offered.iter().all(|date| next_day_list.contains(date)));

        let form = InquiryForm {
            departure_date: offered[0].to_string(),
            ..valid_form()
        };
        let intent = InquiryService::submit(
            tour,
            &form,
            TravelerCount::new(10),
            &schedule,
            monday() + Duration::days(1),
        )
        .unwrap();
        assert_eq!(intent.departure_date, offered[0]);
    }

    #[test]
    fn test_schedule_rejects_past_and_far_dates() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let schedule = DepartureSchedule::default();
        let today = monday().date_naive();

        let last_sunday = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(!schedule.accepts(tour, last_sunday, today));
        let far_sunday = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        assert!(!schedule.accepts(tour, far_sunday, today));
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(!schedule.accepts(tour, tuesday, today));
    }

    #[test]
    fn test_fixed_dates_take_precedence() {
        let catalog = Catalog::bundled().unwrap();
        let mut tour = catalog.find(2).unwrap().clone();
        let fixed = vec![NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()];
        tour.tour.available_dates = Some(fixed.clone());
        let schedule = DepartureSchedule::default();
        let today = monday().date_naive();
        assert_eq!(schedule.candidates(&tour, today), fixed);
        assert!(schedule.accepts(&tour, fixed[0], today));
        assert!(!schedule.accepts(&tour, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(), today));
    }

    #[test]
    fn test_submit_builds_intent() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let form = InquiryForm {
            departure_date: date.to_string(),
            phone: Some("+977 1234567".to_string()),
            ..valid_form()
        };
        let intent = InquiryService::submit(
            tour,
            &form,
            TravelerCount::clamped(3, 10),
            &DepartureSchedule::default(),
            monday(),
        )
        .unwrap();
        assert_eq!(intent.total_price, 6897);
        assert_eq!(intent.traveler_count, 3);
        assert_eq!(intent.tour_title, "Everest Base Camp Trek");
        assert_eq!(intent.departure_date, date);
        assert_eq!(intent.customer_phone.as_deref(), Some("+977 1234567"));
        assert!(intent.message.is_none());
    }

    #[test]
    fn test_submit_rejects_unoffered_date() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let errors = InquiryService::submit(
            tour,
            &valid_form(),
            TravelerCount::new(10),
            &DepartureSchedule::default(),
            monday(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::DepartureDate), Some(DATE_UNAVAILABLE));
    }

    #[test]
    fn test_submit_reports_all_errors() {
        let catalog = Catalog::bundled().unwrap();
        let tour = catalog.find(1).unwrap();
        let errors = InquiryService::submit(
            tour,
            &InquiryForm::default(),
            TravelerCount::new(10),
            &DepartureSchedule::default(),
            monday(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_contact_rules_depend_on_form() {
        let quick = ContactInquiry {
            kind: ContactKind::Quick,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            ..Default::default()
        };
        let errors = validate_contact(&quick);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FormField::Destination]);

        let contact = ContactInquiry {
            kind: ContactKind::Contact,
            subject: Some("custom-trip".to_string()),
            message: Some("Can we add a rest day?".to_string()),
            ..quick
        };
        assert!(validate_contact(&contact).is_empty());
    }
}
