use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::{gen_service_impl, local_time::local_now};
use agendo_utils::TimeRange;
use async_trait::async_trait;
use dao::{
    appointment::AppointmentDao, break_time::BreakTimeDao, working_hours::WorkingHoursDao,
    DaoError, TransactionDao,
};
use service::{
    appointment::{Appointment, AppointmentStatus, PaymentMethod},
    booking::{
        is_on_booking_grid, AppointmentPatch, BookingOutcome, BookingService, BookingWarning,
        CreateAppointmentRequest,
    },
    branch::{Branch, BranchService},
    client::ClientService,
    clock::ClockService,
    config::{BookingConfig, ConfigService},
    notification::NotificationEvent,
    offering::OfferingService,
    outbox::{OutboxMessage, OutboxService},
    payment_gateway::PaymentGatewayService,
    payment_validation::{PaymentDecision, PaymentValidationService, ScoringSummary},
    professional::ProfessionalService,
    uuid_service::UuidService,
    DayOfWeek, ServiceError, ValidationFailureItem,
};
use time::{PrimitiveDateTime, Time};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const BOOKING_SERVICE_PROCESS: &str = "booking-service";

gen_service_impl! {
    struct BookingServiceImpl: BookingService = BookingServiceDeps {
        BranchService: BranchService<Transaction = Self::Transaction> = branch_service,
        ProfessionalService: ProfessionalService<Transaction = Self::Transaction> = professional_service,
        OfferingService: OfferingService<Transaction = Self::Transaction> = offering_service,
        ClientService: ClientService<Transaction = Self::Transaction> = client_service,
        WorkingHoursDao: WorkingHoursDao<Transaction = Self::Transaction> = working_hours_dao,
        BreakTimeDao: BreakTimeDao<Transaction = Self::Transaction> = break_time_dao,
        AppointmentDao: AppointmentDao<Transaction = Self::Transaction> = appointment_dao,
        PaymentValidationService: PaymentValidationService = payment_validation_service,
        PaymentGatewayService: PaymentGatewayService = payment_gateway_service,
        OutboxService: OutboxService = outbox_service,
        ConfigService: ConfigService = config_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

/// The store guard rejected the write because the professional is already booked.
fn slot_conflict_on_overlap(range: TimeRange) -> impl FnOnce(DaoError) -> ServiceError {
    move |err| match err {
        DaoError::AppointmentOverlap => ServiceError::SlotConflict(range),
        err => err.into(),
    }
}

fn annotate_payment_risk(notes: Option<Arc<str>>, scoring: &ScoringSummary) -> Arc<str> {
    let annotation = format!(
        "[Prepayment recommended but waived: {} (score {}, no-shows {})]",
        scoring.reason, scoring.score, scoring.no_show_count
    );
    match notes.filter(|notes| !notes.trim().is_empty()) {
        Some(notes) => format!("{notes}\n{annotation}").into(),
        None => annotation.into(),
    }
}

fn status_not_modifiable() -> ServiceError {
    ServiceError::ValidationError(
        [ValidationFailureItem::ModificationNotAllowed("status".into())].into(),
    )
}

impl<Deps: BookingServiceDeps> BookingServiceImpl<Deps> {
    /// Runs `unit` under the store timeout. Contention on the store reruns the
    /// whole unit, so a retried write sees what the competing one committed.
    async fn run_atomic<T, F, Fut>(
        &self,
        config: &BookingConfig,
        operation: &'static str,
        unit: F,
    ) -> Result<T, ServiceError>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, ServiceError>> + Send,
        T: Send,
    {
        let mut attempt = 0;
        loop {
            let result = tokio::time::timeout(config.store_timeout, unit())
                .await
                .map_err(|_| {
                    warn!("{} exceeded the store timeout", operation);
                    ServiceError::Timeout
                })?;
            match result {
                Err(ServiceError::DatabaseQueryError(DaoError::Contention(err)))
                    if attempt < config.max_contention_retries =>
                {
                    attempt += 1;
                    warn!(
                        "{} hit store contention, retry {}/{}: {}",
                        operation, attempt, config.max_contention_retries, err
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(
                        10 * u64::from(attempt),
                    ))
                    .await;
                }
                result => return result,
            }
        }
    }

    fn publish(
        &self,
        event: NotificationEvent,
        appointment: &Appointment,
        warnings: &mut Vec<BookingWarning>,
    ) {
        if let Err(err) = self.outbox_service.publish(OutboxMessage {
            event,
            appointment: appointment.clone(),
        }) {
            warn!(
                "Could not publish {} notification of appointment {}: {}",
                event, appointment.id, err
            );
            warnings.push(BookingWarning::NotificationNotPublished(
                err.to_string().into(),
            ));
        }
    }

    /// Fail open: an unreachable payment gate never blocks a booking.
    async fn evaluate_payment(
        &self,
        config: &BookingConfig,
        request: &CreateAppointmentRequest,
        warnings: &mut Vec<BookingWarning>,
    ) -> Option<PaymentDecision> {
        let evaluation = self.payment_validation_service.evaluate(
            request.business_id,
            request.client.email.clone(),
            request.client.phone.clone(),
        );
        match tokio::time::timeout(config.collaborator_timeout, evaluation).await {
            Ok(Ok(decision)) => Some(decision),
            Ok(Err(err)) => {
                warn!("Payment validation failed, booking without prepayment: {}", err);
                warnings.push(BookingWarning::PaymentValidationUnavailable(
                    err.to_string().into(),
                ));
                None
            }
            Err(_) => {
                warn!("Payment validation timed out, booking without prepayment");
                warnings.push(BookingWarning::PaymentValidationUnavailable(
                    "timeout".into(),
                ));
                None
            }
        }
    }

    fn branch_now(&self, branch: &Branch, config: &BookingConfig) -> PrimitiveDateTime {
        local_now(
            self.clock_service.date_time_now(),
            &branch.timezone,
            &config.default_timezone,
        )
    }

    fn validate_start(
        &self,
        start_time: PrimitiveDateTime,
        branch: &Branch,
        config: &BookingConfig,
    ) -> Result<(), ServiceError> {
        if !is_on_booking_grid(start_time) {
            return Err(ServiceError::invalid_value("start_time"));
        }
        if start_time < self.branch_now(branch, config) {
            return Err(ServiceError::invalid_value("start_time"));
        }
        Ok(())
    }

    /// Picks the professional for `range`.
    ///
    /// A requested professional must be active at the branch and work during
    /// the whole range. Without a request the first free professional in
    /// name order is taken.
    async fn assign_professional(
        &self,
        business_id: Uuid,
        branch_id: Uuid,
        range: TimeRange,
        requested: Option<Uuid>,
        exclude: Option<Uuid>,
        tx: Deps::Transaction,
    ) -> Result<Uuid, ServiceError> {
        let date = range.start.date();
        let day_of_week = DayOfWeek::from(date);

        let breaks = self
            .break_time_dao
            .find_active_by_branch_and_day(branch_id, day_of_week, tx.clone())
            .await?;
        if breaks
            .iter()
            .any(|break_time| range.overlaps(&TimeRange::on_date(date, break_time.from, break_time.to)))
        {
            return Err(ServiceError::SlotConflict(range));
        }
        let windows: HashMap<Uuid, (Time, Time)> = self
            .working_hours_dao
            .find_active_by_branch_and_day(branch_id, day_of_week, tx.clone())
            .await?
            .iter()
            .map(|working_hours| {
                (
                    working_hours.professional_id,
                    (working_hours.from, working_hours.to),
                )
            })
            .collect();
        let fits_window = |professional_id: &Uuid| {
            windows
                .get(professional_id)
                .is_some_and(|(from, to)| TimeRange::on_date(date, *from, *to).contains(&range))
        };

        match requested {
            Some(professional_id) => {
                self.professional_service
                    .get_active_in_branch(business_id, branch_id, professional_id, Some(tx.clone()))
                    .await?;
                if !fits_window(&professional_id) {
                    return Err(ServiceError::invalid_value("start_time"));
                }
                let conflicts = self
                    .appointment_dao
                    .find_active_overlapping(professional_id, range.start, range.end, exclude, tx)
                    .await?;
                if !conflicts.is_empty() {
                    return Err(ServiceError::SlotConflict(range));
                }
                Ok(professional_id)
            }
            None => {
                let professionals = self
                    .professional_service
                    .get_active_for_branch(branch_id, Some(tx.clone()))
                    .await?;
                for professional in professionals.iter() {
                    if !fits_window(&professional.id) {
                        continue;
                    }
                    let conflicts = self
                        .appointment_dao
                        .find_active_overlapping(
                            professional.id,
                            range.start,
                            range.end,
                            exclude,
                            tx.clone(),
                        )
                        .await?;
                    if conflicts.is_empty() {
                        info!("Auto assigned professional {} for {}", professional.id, range);
                        return Ok(professional.id);
                    }
                }
                Err(ServiceError::NoProfessionalAvailable)
            }
        }
    }

    async fn load_appointment(
        &self,
        business_id: Uuid,
        id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Appointment, ServiceError> {
        self.appointment_dao
            .find_by_id(id, tx)
            .await?
            .filter(|appointment| appointment.business_id == business_id)
            .as_ref()
            .map(Appointment::from)
            .ok_or(ServiceError::EntityNotFound(id))
    }

    /// `decision` is the payment gate's verdict, evaluated before the
    /// transaction is opened.
    async fn try_create(
        &self,
        request: &CreateAppointmentRequest,
        decision: Option<&PaymentDecision>,
        gate_warnings: &[BookingWarning],
        config: &BookingConfig,
    ) -> Result<BookingOutcome, ServiceError> {
        let warnings = gate_warnings.to_vec();
        let tx = self.transaction_dao.use_transaction(None).await?;

        let branch = self
            .branch_service
            .resolve(request.business_id, request.branch_id, Some(tx.clone()))
            .await?;
        self.validate_start(request.start_time, &branch, config)?;
        let offering = self
            .offering_service
            .get_for_branch(
                request.business_id,
                request.offering_id,
                branch.id,
                Some(tx.clone()),
            )
            .await?;
        let range = TimeRange::starting_at(request.start_time, offering.duration());
        let professional_id = self
            .assign_professional(
                request.business_id,
                branch.id,
                range,
                request.professional_id,
                None,
                tx.clone(),
            )
            .await?;

        let mut notes = request.notes.clone();
        if let Some(decision) = decision.filter(|decision| decision.requires_online_payment) {
            if request.payment_method != PaymentMethod::Online {
                if !request.acknowledge_payment_risk {
                    info!("Prepayment required: {}", decision.scoring.reason);
                    return Err(ServiceError::PaymentRequired(decision.scoring.clone()));
                }
                notes = Some(annotate_payment_risk(notes, &decision.scoring));
            }
        }

        let client = self
            .client_service
            .resolve(request.business_id, &request.client, Some(tx.clone()))
            .await?;

        let status = match request.payment_method {
            PaymentMethod::Online => AppointmentStatus::PendingPayment,
            PaymentMethod::Local => AppointmentStatus::Confirmed,
        };
        let mut appointment = Appointment {
            id: self.uuid_service.new_uuid("appointment-id"),
            business_id: request.business_id,
            branch_id: branch.id,
            client_id: client.id,
            offering_id: offering.id,
            professional_id: Some(professional_id),
            start_time: range.start,
            end_time: range.end,
            status,
            payment_method: request.payment_method,
            price_cents: offering.price_cents,
            notes,
            checkout_handle: None,
            cancellation_reason: None,
            created: Some(self.clock_service.date_time_now()),
            version: self.uuid_service.new_uuid("appointment-version"),
        };
        self.appointment_dao
            .create(
                &(&appointment).try_into()?,
                BOOKING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await
            .map_err(slot_conflict_on_overlap(range))?;

        let checkout = if status == AppointmentStatus::PendingPayment {
            // Dropping the transaction on failure rolls the insert back.
            let checkout = tokio::time::timeout(
                config.collaborator_timeout,
                self.payment_gateway_service.create_checkout(&appointment),
            )
            .await
            .map_err(|_| ServiceError::CollaboratorError("payment-gateway", "timeout".into()))??;
            appointment = Appointment {
                checkout_handle: Some(checkout.checkout_handle.clone()),
                version: self.uuid_service.new_uuid("appointment-version"),
                ..appointment
            };
            self.appointment_dao
                .update(
                    &(&appointment).try_into()?,
                    BOOKING_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
            Some(checkout)
        } else {
            None
        };

        self.transaction_dao.commit(tx).await?;
        Ok(BookingOutcome {
            appointment,
            checkout,
            warnings: warnings.into(),
        })
    }

    async fn try_get(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let appointment = self.load_appointment(business_id, id, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(appointment)
    }

    /// Cancels every pending payment created before `cutoff`.
    async fn try_expire(&self, cutoff: PrimitiveDateTime) -> Result<Vec<Appointment>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let mut expired = Vec::new();
        for entity in self
            .appointment_dao
            .find_pending_payment_created_before(cutoff, tx.clone())
            .await?
            .iter()
        {
            let current = Appointment::from(entity);
            let appointment = Appointment {
                status: current.status.transition_to(AppointmentStatus::Cancelled)?,
                cancellation_reason: Some("payment expired".into()),
                version: self.uuid_service.new_uuid("appointment-version"),
                ..current
            };
            self.appointment_dao
                .update(
                    &(&appointment).try_into()?,
                    BOOKING_SERVICE_PROCESS,
                    tx.clone(),
                )
                .await?;
            expired.push(appointment);
        }
        self.transaction_dao.commit(tx).await?;
        Ok(expired)
    }

    async fn try_update(
        &self,
        business_id: Uuid,
        id: Uuid,
        patch: &AppointmentPatch,
        config: &BookingConfig,
    ) -> Result<Appointment, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let current = self.load_appointment(business_id, id, tx.clone()).await?;
        if !current.status.is_active() {
            return Err(status_not_modifiable());
        }

        let mut appointment = Appointment {
            notes: match &patch.notes {
                Some(notes) if notes.trim().is_empty() => None,
                Some(notes) => Some(notes.clone()),
                None => current.notes.clone(),
            },
            version: self.uuid_service.new_uuid("appointment-version"),
            ..current.clone()
        };
        if patch.changes_schedule() {
            let branch = self
                .branch_service
                .get(business_id, current.branch_id, Some(tx.clone()))
                .await?;
            let offering = self
                .offering_service
                .get_for_branch(
                    business_id,
                    patch.offering_id.unwrap_or(current.offering_id),
                    branch.id,
                    Some(tx.clone()),
                )
                .await?;
            let start_time = patch.start_time.unwrap_or(current.start_time);
            self.validate_start(start_time, &branch, config)?;
            let range = TimeRange::starting_at(start_time, offering.duration());
            let professional_id = self
                .assign_professional(
                    business_id,
                    branch.id,
                    range,
                    patch.professional_id.or(current.professional_id),
                    Some(current.id),
                    tx.clone(),
                )
                .await?;
            appointment = Appointment {
                offering_id: offering.id,
                professional_id: Some(professional_id),
                start_time: range.start,
                end_time: range.end,
                price_cents: if offering.id == current.offering_id {
                    current.price_cents
                } else {
                    offering.price_cents
                },
                ..appointment
            };
        }

        self.appointment_dao
            .update(
                &(&appointment).try_into()?,
                BOOKING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await
            .map_err(slot_conflict_on_overlap(appointment.time_range()))?;
        self.transaction_dao.commit(tx).await?;
        Ok(appointment)
    }

    /// Moves the appointment to `next`. Returns `None` if it already is
    /// cancelled and `next` is a cancellation.
    async fn try_transition(
        &self,
        business_id: Uuid,
        id: Uuid,
        next: AppointmentStatus,
        reason: Option<Arc<str>>,
        config: &BookingConfig,
    ) -> Result<(Appointment, bool), ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let current = self.load_appointment(business_id, id, tx.clone()).await?;
        if current.status == AppointmentStatus::Cancelled && next == AppointmentStatus::Cancelled
        {
            self.transaction_dao.commit(tx).await?;
            return Ok((current, false));
        }
        let status = current.status.transition_to(next)?;
        if matches!(next, AppointmentStatus::Completed | AppointmentStatus::NoShow) {
            let branch = self
                .branch_service
                .get(business_id, current.branch_id, Some(tx.clone()))
                .await?;
            if self.branch_now(&branch, config) < current.end_time {
                return Err(ServiceError::invalid_value("end_time"));
            }
        }

        let appointment = Appointment {
            status,
            cancellation_reason: if status == AppointmentStatus::Cancelled {
                reason
            } else {
                current.cancellation_reason.clone()
            },
            version: self.uuid_service.new_uuid("appointment-version"),
            ..current
        };
        self.appointment_dao
            .update(
                &(&appointment).try_into()?,
                BOOKING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok((appointment, true))
    }

    async fn transition(
        &self,
        business_id: Uuid,
        id: Uuid,
        next: AppointmentStatus,
        reason: Option<Arc<str>>,
        event: Option<NotificationEvent>,
    ) -> Result<BookingOutcome, ServiceError> {
        let config = self.config_service.get_config().await?;
        let config = &config;
        let reason = &reason;
        let (appointment, changed) = self
            .run_atomic(config, "transition", move || {
                self.try_transition(business_id, id, next, reason.clone(), config)
            })
            .await?;

        let mut warnings = Vec::new();
        if changed {
            info!("Appointment {} is now {}", appointment.id, appointment.status);
            if let Some(event) = event {
                self.publish(event, &appointment, &mut warnings);
            }
        }
        Ok(BookingOutcome {
            appointment,
            checkout: None,
            warnings: warnings.into(),
        })
    }
}

#[async_trait]
impl<Deps: BookingServiceDeps> BookingService for BookingServiceImpl<Deps> {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError> {
        let config = self.config_service.get_config().await?;
        self.run_atomic(&config, "get appointment", move || {
            self.try_get(business_id, id)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<BookingOutcome, ServiceError> {
        let config = self.config_service.get_config().await?;
        let config = &config;
        let mut gate_warnings = Vec::new();
        let decision = self
            .evaluate_payment(config, request, &mut gate_warnings)
            .await;
        let (decision, gate_warnings) = (decision.as_ref(), gate_warnings.as_slice());
        let mut outcome = self
            .run_atomic(config, "create appointment", move || {
                self.try_create(request, decision, gate_warnings, config)
            })
            .await?;
        info!(
            "Created appointment {} ({}) for professional {:?}",
            outcome.appointment.id, outcome.appointment.status, outcome.appointment.professional_id
        );

        if outcome.appointment.status == AppointmentStatus::Confirmed {
            let mut warnings = outcome.warnings.to_vec();
            self.publish(NotificationEvent::Confirmed, &outcome.appointment, &mut warnings);
            outcome.warnings = warnings.into();
        }
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        patch: &AppointmentPatch,
    ) -> Result<BookingOutcome, ServiceError> {
        let config = self.config_service.get_config().await?;
        let config = &config;
        let appointment = self
            .run_atomic(config, "update appointment", move || {
                self.try_update(business_id, id, patch, config)
            })
            .await?;

        let mut warnings = Vec::new();
        self.publish(NotificationEvent::Modified, &appointment, &mut warnings);
        Ok(BookingOutcome {
            appointment,
            checkout: None,
            warnings: warnings.into(),
        })
    }

    #[instrument(skip(self))]
    async fn cancel(
        &self,
        business_id: Uuid,
        id: Uuid,
        reason: Option<Arc<str>>,
    ) -> Result<BookingOutcome, ServiceError> {
        self.transition(
            business_id,
            id,
            AppointmentStatus::Cancelled,
            reason,
            Some(NotificationEvent::Cancelled),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn confirm_payment(
        &self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Appointment, ServiceError> {
        Ok(self
            .transition(
                business_id,
                id,
                AppointmentStatus::Confirmed,
                None,
                Some(NotificationEvent::Confirmed),
            )
            .await?
            .appointment)
    }

    #[instrument(skip(self))]
    async fn fail_payment(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError> {
        Ok(self
            .transition(
                business_id,
                id,
                AppointmentStatus::Cancelled,
                Some("payment failed".into()),
                Some(NotificationEvent::Cancelled),
            )
            .await?
            .appointment)
    }

    #[instrument(skip(self))]
    async fn complete(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError> {
        Ok(self
            .transition(business_id, id, AppointmentStatus::Completed, None, None)
            .await?
            .appointment)
    }

    #[instrument(skip(self))]
    async fn mark_no_show(
        &self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Appointment, ServiceError> {
        Ok(self
            .transition(business_id, id, AppointmentStatus::NoShow, None, None)
            .await?
            .appointment)
    }

    #[instrument(skip(self))]
    async fn expire_pending_payments(
        &self,
        max_age: time::Duration,
    ) -> Result<Arc<[Appointment]>, ServiceError> {
        let config = self.config_service.get_config().await?;
        let cutoff = self.clock_service.date_time_now() - max_age;
        let expired = self
            .run_atomic(&config, "expire pending payments", move || {
                self.try_expire(cutoff)
            })
            .await?;

        let mut warnings = Vec::new();
        for appointment in expired.iter() {
            self.publish(NotificationEvent::Cancelled, appointment, &mut warnings);
        }
        if !expired.is_empty() {
            info!("Expired {} pending payments", expired.len());
        }
        Ok(expired.into())
    }
}
