//! Poll service.
//!
//! Polls are one-per-weekday; the original scheduler jobs live here as the
//! admin operations `create_weekly` and `clean_old`.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use chrono_tz::Tz;
use univan_common::{AppResult, IdGenerator};
use univan_db::{
    entities::{
        poll::{self, PollStatus},
        trip::TripType,
    },
    repositories::PollRepository,
};
use sea_orm::Set;

use super::stop_resolver::{ResolvedStop, StopResolver};

/// Poll service for business logic.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    resolver: StopResolver,
    timezone: Tz,
    id_gen: IdGenerator,
}

/// First poll day to provision, given today's date: weekend runs skip ahead
/// to Monday.
pub(crate) fn week_start(today: NaiveDate) -> NaiveDate {
    match today.weekday() {
        Weekday::Sat => today + Days::new(2),
        Weekday::Sun => today + Days::new(1),
        _ => today,
    }
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, resolver: StopResolver, timezone: Tz) -> Self {
        Self {
            poll_repo,
            resolver,
            timezone,
            id_gen: IdGenerator::new(),
        }
    }

    fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// List all polls in date order.
    pub async fn list(&self) -> AppResult<Vec<poll::Model>> {
        self.poll_repo.list().await
    }

    /// Get a poll by ID.
    pub async fn get(&self, id: &str) -> AppResult<poll::Model> {
        self.poll_repo.get_by_id(id).await
    }

    /// Grouped stop breakdown of a poll's votes for one trip direction.
    pub async fn boarding_list(
        &self,
        poll_id: &str,
        trip_type: &TripType,
    ) -> AppResult<Vec<ResolvedStop>> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;
        self.resolver.breakdown(&poll.id, trip_type).await
    }

    /// Provision polls for the remaining weekdays of the week (or all of
    /// next week when run on a weekend). Existing polls are left alone.
    /// Returns the dates actually created.
    pub async fn create_weekly(&self) -> AppResult<Vec<NaiveDate>> {
        let mut created = Vec::new();
        let mut date = week_start(self.today());

        while !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            if self.poll_repo.find_by_date(date).await?.is_none() {
                let model = poll::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    date: Set(date),
                    status: Set(PollStatus::Open),
                };
                self.poll_repo.create(model).await?;
                created.push(date);
            }
            date = date + Days::new(1);
        }

        tracing::info!(created = created.len(), "Weekly polls provisioned");
        Ok(created)
    }

    /// Delete polls older than today, returning the deleted dates.
    pub async fn clean_old(&self) -> AppResult<Vec<NaiveDate>> {
        let deleted = self.poll_repo.delete_before(self.today()).await?;
        let dates: Vec<NaiveDate> = deleted.into_iter().map(|p| p.date).collect();
        tracing::info!(deleted = dates.len(), "Old polls cleaned up");
        Ok(dates)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_on_weekday_is_today() {
        // 2025-06-04 is a Wednesday.
        assert_eq!(week_start(date(2025, 6, 4)), date(2025, 6, 4));
    }

    #[test]
    fn test_week_start_skips_weekend_to_monday() {
        // 2025-06-07 is a Saturday, 2025-06-08 a Sunday.
        assert_eq!(week_start(date(2025, 6, 7)), date(2025, 6, 9));
        assert_eq!(week_start(date(2025, 6, 8)), date(2025, 6, 9));
    }
}
