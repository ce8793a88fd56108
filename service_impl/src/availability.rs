use std::collections::HashMap;
use std::sync::Arc;

use crate::{gen_service_impl, local_time::local_now};
use agendo_utils::{
    slot::{generate_slots, SlotQuery},
    TimeRange,
};
use async_trait::async_trait;
use dao::{
    appointment::AppointmentDao, break_time::BreakTimeDao, business::BusinessDao,
    working_hours::WorkingHoursDao, TransactionDao,
};
use service::{
    availability::{
        Availability, AvailabilityQuery, AvailabilityService, Occupancy,
        ProfessionalAvailability, Urgency,
    },
    branch::BranchService,
    clock::ClockService,
    config::ConfigService,
    offering::OfferingService,
    professional::{Professional, ProfessionalService},
    DayOfWeek, ServiceError,
};
use time::{Duration, PrimitiveDateTime, Time};
use tracing::instrument;
use uuid::Uuid;

gen_service_impl! {
    struct AvailabilityServiceImpl: AvailabilityService = AvailabilityServiceDeps {
        BranchService: BranchService<Transaction = Self::Transaction> = branch_service,
        ProfessionalService: ProfessionalService<Transaction = Self::Transaction> = professional_service,
        OfferingService: OfferingService<Transaction = Self::Transaction> = offering_service,
        BusinessDao: BusinessDao<Transaction = Self::Transaction> = business_dao,
        WorkingHoursDao: WorkingHoursDao<Transaction = Self::Transaction> = working_hours_dao,
        BreakTimeDao: BreakTimeDao<Transaction = Self::Transaction> = break_time_dao,
        AppointmentDao: AppointmentDao<Transaction = Self::Transaction> = appointment_dao,
        ConfigService: ConfigService = config_service,
        ClockService: ClockService = clock_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

fn whole_minutes(duration: Duration) -> u32 {
    duration.whole_minutes().clamp(0, u32::MAX as i64) as u32
}

fn overlap_minutes(window: &TimeRange, ranges: &[TimeRange]) -> u32 {
    ranges
        .iter()
        .filter_map(|range| window.intersection(range))
        .map(|range| whole_minutes(range.duration()))
        .sum()
}

fn occupancy(
    window: &TimeRange,
    breaks: &[TimeRange],
    busy: &[TimeRange],
    total_candidates: usize,
    available_slots: usize,
) -> Occupancy {
    let booked_minutes = overlap_minutes(window, busy);
    let working_minutes =
        whole_minutes(window.duration()).saturating_sub(overlap_minutes(window, breaks));
    let occupancy_percent = if working_minutes == 0 {
        0
    } else {
        (u64::from(booked_minutes) * 100 / u64::from(working_minutes)).min(100) as u8
    };
    Occupancy {
        total_candidates,
        available_slots,
        booked_minutes,
        working_minutes,
        occupancy_percent,
        urgency: Urgency::from_ratio(available_slots, total_candidates),
    }
}

impl<Deps: AvailabilityServiceDeps> AvailabilityServiceImpl<Deps> {
    async fn granularity_minutes(
        &self,
        business_id: Uuid,
        default_minutes: u16,
        tx: Deps::Transaction,
    ) -> Result<u16, ServiceError> {
        let business = self
            .business_dao
            .find_by_id(business_id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(business_id))?;
        Ok(match business.slot_granularity_minutes {
            0 => default_minutes,
            minutes => minutes,
        })
    }
}

#[async_trait]
impl<Deps: AvailabilityServiceDeps> AvailabilityService for AvailabilityServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, tx))]
    async fn get_available_slots(
        &self,
        query: &AvailabilityQuery,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let config = self.config_service.get_config().await?;

        let branch = self
            .branch_service
            .get(query.business_id, query.branch_id, Some(tx.clone()))
            .await?;
        if !branch.active {
            return Err(ServiceError::EntityNotFound(branch.id));
        }
        let offering = self
            .offering_service
            .get_for_branch(
                query.business_id,
                query.offering_id,
                branch.id,
                Some(tx.clone()),
            )
            .await?;
        let granularity_minutes = self
            .granularity_minutes(
                query.business_id,
                config.default_slot_granularity_minutes,
                tx.clone(),
            )
            .await?;
        let professionals: Arc<[Professional]> = match query.professional_id {
            Some(professional_id) => [self
                .professional_service
                .get_active_in_branch(
                    query.business_id,
                    branch.id,
                    professional_id,
                    Some(tx.clone()),
                )
                .await?]
            .into(),
            None => {
                self.professional_service
                    .get_active_for_branch(branch.id, Some(tx.clone()))
                    .await?
            }
        };

        // Everything below is loaded once for the whole branch and day.
        let day_of_week = DayOfWeek::from(query.date);
        let windows: HashMap<Uuid, (Time, Time)> = self
            .working_hours_dao
            .find_active_by_branch_and_day(branch.id, day_of_week, tx.clone())
            .await?
            .iter()
            .map(|working_hours| {
                (
                    working_hours.professional_id,
                    (working_hours.from, working_hours.to),
                )
            })
            .collect();
        let breaks: Vec<TimeRange> = self
            .break_time_dao
            .find_active_by_branch_and_day(branch.id, day_of_week, tx.clone())
            .await?
            .iter()
            .map(|break_time| TimeRange::on_date(query.date, break_time.from, break_time.to))
            .collect();
        let day_start = PrimitiveDateTime::new(query.date, Time::MIDNIGHT);
        let mut busy: HashMap<Uuid, Vec<TimeRange>> = HashMap::new();
        for appointment in self
            .appointment_dao
            .find_active_by_branch_in_range(
                branch.id,
                day_start,
                day_start + Duration::days(1),
                tx.clone(),
            )
            .await?
            .iter()
        {
            if let Some(professional_id) = appointment.professional_id {
                busy.entry(professional_id)
                    .or_default()
                    .push(TimeRange::new(appointment.start_time, appointment.end_time));
            }
        }
        let not_before = local_now(
            self.clock_service.date_time_now(),
            &branch.timezone,
            &config.default_timezone,
        );

        let mut result = Vec::with_capacity(professionals.len());
        for professional in professionals.iter() {
            let Some((from, to)) = windows.get(&professional.id) else {
                continue;
            };
            let working_window = TimeRange::on_date(query.date, *from, *to);
            let professional_busy = busy
                .get(&professional.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let scan = generate_slots(&SlotQuery {
                working_window,
                duration: offering.duration(),
                granularity: Duration::minutes(granularity_minutes.into()),
                breaks: &breaks,
                busy: professional_busy,
                not_before: Some(not_before),
            });
            result.push(ProfessionalAvailability {
                professional_id: professional.id,
                professional_name: professional.name.clone(),
                working_window,
                occupancy: occupancy(
                    &working_window,
                    &breaks,
                    professional_busy,
                    scan.candidates,
                    scan.slots.len(),
                ),
                slots: scan.slots.into(),
            });
        }

        self.transaction_dao.commit(tx).await?;
        Ok(Availability {
            branch_id: branch.id,
            date: query.date,
            offering_id: offering.id,
            duration_minutes: offering.duration_minutes,
            granularity_minutes,
            professionals: result.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn on_monday(from: Time, to: Time) -> TimeRange {
        TimeRange::on_date(date!(2024 - 01 - 15), from, to)
    }

    #[test]
    fn test_occupancy_counts_booked_and_working_minutes() {
        let window = on_monday(time!(09:00), time!(13:00));
        let breaks = [on_monday(time!(12:00), time!(12:30))];
        let busy = [
            on_monday(time!(10:00), time!(10:30)),
            on_monday(time!(12:45), time!(13:15)),
        ];
        let occupancy = occupancy(&window, &breaks, &busy, 8, 5);
        assert_eq!(occupancy.booked_minutes, 45);
        assert_eq!(occupancy.working_minutes, 210);
        assert_eq!(occupancy.occupancy_percent, 21);
        assert_eq!(occupancy.urgency, Urgency::Low);
    }

    #[test]
    fn test_occupancy_of_empty_window() {
        let window = on_monday(time!(09:00), time!(09:00));
        let occupancy = occupancy(&window, &[], &[], 0, 0);
        assert_eq!(occupancy.working_minutes, 0);
        assert_eq!(occupancy.occupancy_percent, 0);
        assert_eq!(occupancy.urgency, Urgency::High);
    }
}
