//! Vote service.
//!
//! Vote casting and updating under the daily cutoff rules: on the poll's
//! day, outbound-ish options close at 12:00 and return-ish options at 18:00,
//! evaluated in the configured time zone. Earlier days are always open,
//! later days always closed.

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use univan_common::{AppError, AppResult, IdGenerator};
use univan_db::{
    entities::{
        student,
        vote::{self, VoteOption},
    },
    repositories::{PollRepository, VoteRepository},
};
use sea_orm::Set;

/// True when `option` may still be voted for a poll dated `poll_date`.
pub(crate) fn option_open_at(poll_date: NaiveDate, option: &VoteOption, now: DateTime<Tz>) -> bool {
    let today = now.date_naive();
    if today < poll_date {
        return true;
    }
    if today > poll_date {
        return false;
    }

    let (hour, minute) = match option {
        VoteOption::RoundTrip | VoteOption::OneWayOutbound => (12, 0),
        VoteOption::OneWayReturn | VoteOption::Absent => (18, 0),
    };
    let Some(cutoff) = NaiveTime::from_hms_opt(hour, minute, 0) else {
        return false;
    };
    now.time() <= cutoff
}

fn closed_message(option: &VoteOption) -> String {
    match option {
        VoteOption::RoundTrip | VoteOption::OneWayOutbound => {
            "round-trip and outbound-only votes close at 12:00 on the poll day".to_string()
        }
        VoteOption::OneWayReturn | VoteOption::Absent => {
            "return-only and absent votes close at 18:00 on the poll day".to_string()
        }
    }
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    poll_repo: PollRepository,
    timezone: Tz,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(vote_repo: VoteRepository, poll_repo: PollRepository, timezone: Tz) -> Self {
        Self {
            vote_repo,
            poll_repo,
            timezone,
            id_gen: IdGenerator::new(),
        }
    }

    fn now(&self) -> DateTime<Tz> {
        chrono::Utc::now().with_timezone(&self.timezone)
    }

    /// Cast a student's vote on a poll.
    ///
    /// A second vote by the same student on the same poll fails with
    /// `AlreadyVoted`, including under a race (the unique index is the
    /// arbiter).
    pub async fn cast(
        &self,
        student: &student::Model,
        poll_id: &str,
        option: VoteOption,
    ) -> AppResult<vote::Model> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if !option_open_at(poll.date, &option, self.now()) {
            return Err(AppError::VotingClosed(closed_message(&option)));
        }

        let model = vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            student_id: Set(student.id.clone()),
            poll_id: Set(poll.id),
            option: Set(option),
            voted_at: Set(chrono::Utc::now().into()),
        };

        let vote = self.vote_repo.create(model).await?;
        tracing::debug!(vote_id = %vote.id, student_id = %vote.student_id, "Vote cast");
        Ok(vote)
    }

    /// Change a student's existing vote, under the same cutoff rules.
    pub async fn update(
        &self,
        student: &student::Model,
        vote_id: &str,
        option: VoteOption,
    ) -> AppResult<vote::Model> {
        let vote = self.vote_repo.get_by_id(vote_id).await?;
        if vote.student_id != student.id {
            return Err(AppError::Forbidden(
                "You can only change your own vote".to_string(),
            ));
        }

        let poll = self.poll_repo.get_by_id(&vote.poll_id).await?;
        if !option_open_at(poll.date, &option, self.now()) {
            return Err(AppError::VotingClosed(closed_message(&option)));
        }

        let mut active: vote::ActiveModel = vote.into();
        active.option = Set(option);
        active.voted_at = Set(chrono::Utc::now().into());

        self.vote_repo.update(active).await
    }

    /// A student's vote history, newest first.
    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<vote::Model>> {
        self.vote_repo.find_by_student(student_id).await
    }

    /// A student's vote on one poll, if any.
    pub async fn find_for_poll(
        &self,
        student_id: &str,
        poll_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        self.vote_repo
            .find_by_student_and_poll(student_id, poll_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    const TZ: Tz = chrono_tz::America::Fortaleza;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        TZ.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn poll_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn test_any_option_open_before_poll_day() {
        for option in [
            VoteOption::RoundTrip,
            VoteOption::OneWayOutbound,
            VoteOption::OneWayReturn,
            VoteOption::Absent,
        ] {
            assert!(option_open_at(poll_day(), &option, at(2025, 6, 1, 23, 59)));
        }
    }

    #[test]
    fn test_no_option_open_after_poll_day() {
        for option in [
            VoteOption::RoundTrip,
            VoteOption::OneWayOutbound,
            VoteOption::OneWayReturn,
            VoteOption::Absent,
        ] {
            assert!(!option_open_at(poll_day(), &option, at(2025, 6, 3, 0, 1)));
        }
    }

    #[test]
    fn test_outbound_options_close_at_noon() {
        assert!(option_open_at(
            poll_day(),
            &VoteOption::RoundTrip,
            at(2025, 6, 2, 12, 0)
        ));
        assert!(!option_open_at(
            poll_day(),
            &VoteOption::OneWayOutbound,
            at(2025, 6, 2, 12, 1)
        ));
    }

    #[test]
    fn test_return_options_close_at_six() {
        assert!(option_open_at(
            poll_day(),
            &VoteOption::Absent,
            at(2025, 6, 2, 17, 59)
        ));
        assert!(option_open_at(
            poll_day(),
            &VoteOption::OneWayReturn,
            at(2025, 6, 2, 18, 0)
        ));
        assert!(!option_open_at(
            poll_day(),
            &VoteOption::OneWayReturn,
            at(2025, 6, 2, 18, 1)
        ));
    }

    #[test]
    fn test_outbound_closed_while_return_still_open() {
        let afternoon = at(2025, 6, 2, 14, 0);
        assert!(!option_open_at(poll_day(), &VoteOption::RoundTrip, afternoon));
        assert!(option_open_at(poll_day(), &VoteOption::OneWayReturn, afternoon));
    }
}
