use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::inquiry::{BookingIntent, InquiryForm, InquiryFormPatch, ValidationErrors};
use crate::models::session::{InquiryState, SessionSnapshot};
use crate::services::audit_log_service::{record_best_effort, AuditLog};
use crate::services::catalog_service::CatalogEntry;
use crate::services::handoff_service::WhatsAppHandoff;
use crate::services::inquiry_service::{DepartureSchedule, InquiryService};
use crate::services::pricing_service::{PricingService, TravelerCount};
use crate::services::scheduler::DelayedTask;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub max_travelers: u32,
    pub submit_delay: Duration,
    pub reset_delay: Duration,
    pub schedule: DepartureSchedule,
    /// Sessions untouched for this long are dropped.
    pub idle_timeout: Duration,
    /// Opening a session beyond this count evicts the least recently used one.
    pub max_sessions: usize,
}

#[derive(Debug)]
pub enum SessionError {
    NotFound(Uuid),
    /// The session is submitting or showing its confirmation.
    Busy(InquiryState),
    /// Submit was rejected; the snapshot carries the field errors.
    Invalid(Box<SessionSnapshot>),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound(id) => write!(f, "Inquiry session {} not found", id),
            SessionError::Busy(state) => {
                write!(f, "Inquiry session cannot be changed while {:?}", state)
            }
            SessionError::Invalid(snapshot) => write!(
                f,
                "Inquiry has {} invalid field(s)",
                snapshot.errors.len()
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// State behind one open booking panel.
struct InquirySession {
    id: Uuid,
    tour: CatalogEntry,
    candidates: Vec<NaiveDate>,
    form: InquiryForm,
    travelers: TravelerCount,
    state: InquiryState,
    errors: ValidationErrors,
    booking: Option<BookingIntent>,
    whatsapp_url: Option<String>,
    pending: Option<DelayedTask>,
    last_touched: Instant,
}

impl InquirySession {
    fn new(tour: CatalogEntry, candidates: Vec<NaiveDate>, max_travelers: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tour,
            candidates,
            form: InquiryForm::default(),
            travelers: TravelerCount::new(max_travelers),
            state: InquiryState::Empty,
            errors: ValidationErrors::new(),
            booking: None,
            whatsapp_url: None,
            pending: None,
            last_touched: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    // A submission in flight owns the pending audit append
    fn evictable(&self, idle_timeout: Duration) -> bool {
        self.state != InquiryState::Submitting && self.last_touched.elapsed() >= idle_timeout
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.state {
            InquiryState::Empty | InquiryState::Editing => Ok(()),
            busy => Err(SessionError::Busy(busy)),
        }
    }

    fn reset(&mut self) {
        self.form = InquiryForm::default();
        self.travelers = TravelerCount::new(self.travelers.max());
        self.state = InquiryState::Empty;
        self.errors = ValidationErrors::new();
        self.booking = None;
        self.whatsapp_url = None;
    }

    fn replace_pending(&mut self, next: Option<DelayedTask>) {
        if let Some(current) = self.pending.take() {
            current.detach();
        }
        self.pending = next;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            tour_id: self.tour.tour.id,
            state: self.state,
            form: self.form.clone(),
            travelers: self.travelers.get(),
            max_travelers: self.travelers.max(),
            unit_price: self.tour.unit_price,
            total_price: PricingService::compute_total(self.tour.unit_price, self.travelers),
            errors: self.errors.clone(),
            booking: self.booking.clone(),
            whatsapp_url: self.whatsapp_url.clone(),
        }
    }
}

/// Open inquiry sessions, one per booking panel.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, InquirySession>>,
    sweeper: Mutex<Option<DelayedTask>>,
    settings: SessionSettings,
    audit_log: Arc<dyn AuditLog>,
    handoff: WhatsAppHandoff,
}

impl SessionStore {
    pub fn new(
        settings: SessionSettings,
        audit_log: Arc<dyn AuditLog>,
        handoff: WhatsAppHandoff,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            sweeper: Mutex::new(None),
            settings,
            audit_log,
            handoff,
        }
    }

    /// Open a session for `tour`. Idle sessions are evicted first, and the
    /// least recently used one goes when the store is full.
    pub async fn open(self: &Arc<Self>, tour: &CatalogEntry) -> SessionSnapshot {
        let candidates = self
            .settings
            .schedule
            .candidates(tour, Utc::now().date_naive());
        let session = InquirySession::new(tour.clone(), candidates, self.settings.max_travelers);
        let snapshot = session.snapshot();

        {
            let mut sessions = self.sessions.lock().await;
            self.evict_idle(&mut sessions);
            while sessions.len() >= self.settings.max_sessions.max(1) {
                let oldest = sessions
                    .values()
                    .filter(|s| s.state != InquiryState::Submitting)
                    .min_by_key(|s| s.last_touched)
                    .map(|s| s.id);
                match oldest {
                    Some(id) => {
                        sessions.remove(&id);
                        debug!("Evicted least recently used inquiry session {}", id);
                    }
                    None => break,
                }
            }
            sessions.insert(session.id, session);
        }

        self.ensure_sweeper().await;
        snapshot
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, InquirySession>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.evictable(self.settings.idle_timeout));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle inquiry session(s)", evicted);
        }
    }

    /// Start the idle sweep unless one is already running. The sweep stops
    /// itself once the store is empty.
    async fn ensure_sweeper(self: &Arc<Self>) {
        let mut sweeper = self.sweeper.lock().await;
        if sweeper.is_some() {
            return;
        }

        let store: Weak<Self> = Arc::downgrade(self);
        let period = self.settings.idle_timeout;
        *sweeper = Some(DelayedTask::schedule(period, async move {
            loop {
                let Some(store) = store.upgrade() else {
                    return;
                };
                if !store.sweep().await {
                    return;
                }
                drop(store);
                tokio::time::sleep(period).await;
            }
        }));
    }

    /// Evict idle sessions. Returns false, and releases the sweeper slot,
    /// when nothing is left to watch.
    async fn sweep(&self) -> bool {
        let mut sweeper = self.sweeper.lock().await;
        let mut sessions = self.sessions.lock().await;
        self.evict_idle(&mut sessions);
        if sessions.is_empty() {
            if let Some(task) = sweeper.take() {
                task.detach();
            }
            return false;
        }
        true
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.touch();
        Ok(session.snapshot())
    }

    pub async fn departures(&self, id: Uuid) -> Result<Vec<NaiveDate>, SessionError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&id)
            .map(|session| session.candidates.clone())
            .ok_or(SessionError::NotFound(id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: &InquiryFormPatch,
    ) -> Result<SessionSnapshot, SessionError> {
        self.edit(id, |session| {
            session.form.apply(patch);
            if let Some(requested) = patch.travelers {
                session.travelers = TravelerCount::clamped(requested, session.travelers.max());
            }
        })
        .await
    }

    pub async fn increment_travelers(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.edit(id, |session| session.travelers.increment()).await
    }

    pub async fn decrement_travelers(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.edit(id, |session| session.travelers.decrement()).await
    }

    async fn edit<F>(&self, id: Uuid, change: F) -> Result<SessionSnapshot, SessionError>
    where
        F: FnOnce(&mut InquirySession),
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.touch();
        session.ensure_editable()?;
        change(session);
        session.state = InquiryState::Editing;
        Ok(session.snapshot())
    }

    /// Validate and, when valid, move to `Submitting`. The audit append and
    /// the move to `Submitted` happen after the submit delay; the session
    /// returns to `Empty` after the reset delay.
    pub async fn submit(self: &Arc<Self>, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.touch();
        session.ensure_editable()?;

        let outcome = InquiryService::submit(
            &session.tour,
            &session.form,
            session.travelers,
            &self.settings.schedule,
            Utc::now(),
        );

        let intent = match outcome {
            Ok(intent) => intent,
            Err(errors) => {
                session.errors = errors;
                session.state = InquiryState::Editing;
                return Err(SessionError::Invalid(Box::new(session.snapshot())));
            }
        };

        session.errors = ValidationErrors::new();
        session.state = InquiryState::Submitting;
        session.whatsapp_url = Some(
            self.handoff
                .booking_link(&intent, &session.tour.tour)
                .to_string(),
        );
        session.booking = Some(intent.clone());

        let store = Arc::clone(self);
        let task = DelayedTask::schedule(self.settings.submit_delay, async move {
            store.complete_submission(id, intent).await;
        });
        session.replace_pending(Some(task));

        Ok(session.snapshot())
    }

    async fn complete_submission(self: Arc<Self>, id: Uuid, intent: BookingIntent) {
        record_best_effort(self.audit_log.as_ref(), &intent).await;

        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(&id) else {
            return;
        };
        if session.state != InquiryState::Submitting {
            return;
        }
        info!(
            "Booking inquiry {} submitted for tour {} ({} travelers)",
            intent.id, intent.tour_id, intent.traveler_count
        );
        session.state = InquiryState::Submitted;

        let store = Arc::clone(&self);
        let reset = DelayedTask::schedule(self.settings.reset_delay, async move {
            store.reset(id).await;
        });
        session.replace_pending(Some(reset));
    }

    async fn reset(&self, id: Uuid) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.reset();
            session.replace_pending(None);
        }
    }

    /// Close the panel. Any pending submit or reset is cancelled.
    pub async fn close(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self.sessions.lock().await.remove(&id);
        match removed {
            Some(session) => {
                if let Some(task) = &session.pending {
                    task.cancel();
                }
                Ok(())
            }
            None => Err(SessionError::NotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
