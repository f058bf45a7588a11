//! Trip service.
//!
//! Owns the trip state machine (pending -> in_progress -> completed) and the
//! coordination around it: creation under the (poll, trip_type) uniqueness
//! invariant, start/advance/complete transitions, and the per-stop payload
//! assembly. Every transition is a single transaction that re-reads the trip
//! row with `SELECT ... FOR UPDATE`, so concurrent calls on the same trip
//! serialize and the loser observes the already-advanced state.
//!
//! The stop list is recomputed from the live votes on every advance; when
//! the current stop is no longer in the recomputed list (vote withdrawn
//! mid-trip) the transition fails with `StopNotFound` rather than guessing a
//! recovery.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use univan_common::{AppError, AppResult, IdGenerator};
use univan_db::{
    entities::{
        student,
        trip::{self, TripStatus, TripType},
        Trip,
    },
    repositories::{PollRepository, TripFilters, TripRepository},
};

use super::stop_resolver::{ResolvedStop, Stop, StopResolver};

/// Trip service: state machine plus request-boundary coordination.
#[derive(Clone)]
pub struct TripService {
    db: Arc<DatabaseConnection>,
    trip_repo: TripRepository,
    poll_repo: PollRepository,
    resolver: StopResolver,
    id_gen: IdGenerator,
}

/// A trip positioned at a stop, with the students waiting there.
#[derive(Debug, Clone)]
pub struct StopReached {
    pub trip: trip::Model,
    pub stop: Stop,
    pub students: Vec<student::Model>,
}

/// A completed trip, with the paired return trip when one was provisioned.
#[derive(Debug, Clone)]
pub struct TripCompleted {
    pub trip: trip::Model,
    pub return_trip: Option<trip::Model>,
}

/// Result of an advance: either the next stop, or completion.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    Moved(StopReached),
    Completed(TripCompleted),
}

/// Position of a trip within its resolved stop list.
#[derive(Debug, Clone, Copy)]
pub struct TripProgress {
    pub total_stops: usize,
    /// Index of the current stop; `None` unless the trip is in progress.
    pub current_index: Option<usize>,
}

/// Full per-stop breakdown of a trip, regardless of its status.
#[derive(Debug, Clone)]
pub struct TripDetail {
    pub trip: trip::Model,
    pub stops: Vec<ResolvedStop>,
    pub progress: TripProgress,
}

/// Read-only status view: the trip plus, when in progress, the students at
/// the current stop.
#[derive(Debug, Clone)]
pub struct TripStatusView {
    pub trip: trip::Model,
    pub progress: TripProgress,
    pub current_students: Option<Vec<student::Model>>,
}

/// Stop identifier the trip's position pointer refers to, if set.
fn current_stop_id(trip: &trip::Model) -> Option<String> {
    match trip.trip_type {
        TripType::Outbound => trip.current_boarding_point_id.clone(),
        TripType::Return => trip
            .current_university
            .clone()
            .map(|u| u.code().to_string()),
    }
}

/// Index of `current` within `stops`.
fn position_of(stops: &[Stop], current: &str) -> Option<usize> {
    stops.iter().position(|s| s.id() == current)
}

impl TripService {
    /// Create a new trip service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        trip_repo: TripRepository,
        poll_repo: PollRepository,
        resolver: StopResolver,
    ) -> Self {
        Self {
            db,
            trip_repo,
            poll_repo,
            resolver,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a pending trip for a poll and direction.
    ///
    /// Fails with `DuplicateTrip` when a trip for the same (poll, direction)
    /// already exists; a race between the check and the insert is caught by
    /// the unique index and surfaces as the same error.
    pub async fn create(&self, poll_id: &str, trip_type: TripType) -> AppResult<trip::Model> {
        let poll = self.poll_repo.get_by_id(poll_id).await?;

        if self
            .trip_repo
            .find_by_poll_and_type(&poll.id, trip_type.clone())
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateTrip(format!(
                "a {} trip already exists for this poll",
                trip_type.as_str()
            )));
        }

        let model = trip::ActiveModel {
            id: Set(self.id_gen.generate()),
            poll_id: Set(poll.id),
            trip_type: Set(trip_type),
            status: Set(TripStatus::Pending),
            current_boarding_point_id: Set(None),
            current_university: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        let trip = self.trip_repo.create(model).await?;
        tracing::info!(trip_id = %trip.id, trip_type = %trip.trip_type.as_str(), "Trip created");
        Ok(trip)
    }

    /// List trips matching the filters.
    pub async fn list(&self, filters: &TripFilters) -> AppResult<Vec<trip::Model>> {
        self.trip_repo.list(filters).await
    }

    /// Get a trip by ID.
    pub async fn get(&self, trip_id: &str) -> AppResult<trip::Model> {
        self.trip_repo.get_by_id(trip_id).await
    }

    /// Start a pending trip: resolve the stops and move to the first one.
    pub async fn start(&self, trip_id: &str) -> AppResult<StopReached> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let trip = Self::lock_trip(&txn, trip_id).await?;

        if trip.status != TripStatus::Pending {
            return Err(AppError::InvalidState(
                "trip already started or completed".to_string(),
            ));
        }

        let stops = self
            .resolver
            .resolve_stops(&trip.poll_id, &trip.trip_type)
            .await?;
        let Some(first) = stops.into_iter().next() else {
            return Err(AppError::NoStops(match trip.trip_type {
                TripType::Outbound => "no boarding points for this trip".to_string(),
                TripType::Return => "no universities for this trip".to_string(),
            }));
        };

        let poll_id = trip.poll_id.clone();
        let trip_type = trip.trip_type.clone();

        let mut active: trip::ActiveModel = trip.into();
        active.status = Set(TripStatus::InProgress);
        active.started_at = Set(Some(Utc::now().into()));
        match &first {
            Stop::Point(p) => active.current_boarding_point_id = Set(Some(p.id.clone())),
            Stop::University(u) => active.current_university = Set(Some(u.clone())),
        }

        let trip = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(trip_id = %trip.id, stop = %first.id(), "Trip started");

        let students = self
            .resolver
            .students_at_stop(&poll_id, &trip_type, &first)
            .await?;

        Ok(StopReached {
            trip,
            stop: first,
            students,
        })
    }

    /// Advance an in-progress trip to the next stop, completing it when the
    /// current stop was the last.
    pub async fn advance(&self, trip_id: &str) -> AppResult<AdvanceOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let trip = Self::lock_trip(&txn, trip_id).await?;

        if trip.status != TripStatus::InProgress {
            return Err(AppError::InvalidState("trip is not in progress".to_string()));
        }

        let current = current_stop_id(&trip).ok_or_else(|| {
            AppError::MissingPointer(match trip.trip_type {
                TripType::Outbound => "no current boarding point set".to_string(),
                TripType::Return => "no current university set".to_string(),
            })
        })?;

        // Recompute from the live votes; the list may have changed since the
        // last transition.
        let mut stops = self
            .resolver
            .resolve_stops(&trip.poll_id, &trip.trip_type)
            .await?;

        let index = position_of(&stops, &current).ok_or_else(|| {
            AppError::StopNotFound(format!(
                "current stop {current} is no longer in the resolved stop list"
            ))
        })?;

        if index + 1 >= stops.len() {
            // Last stop served: complete, provisioning the return trip for
            // outbound runs.
            let completed = self.finish(txn, trip).await?;
            return Ok(AdvanceOutcome::Completed(completed));
        }

        let next = stops.remove(index + 1);
        let poll_id = trip.poll_id.clone();
        let trip_type = trip.trip_type.clone();

        let mut active: trip::ActiveModel = trip.into();
        match &next {
            Stop::Point(p) => active.current_boarding_point_id = Set(Some(p.id.clone())),
            Stop::University(u) => active.current_university = Set(Some(u.clone())),
        }

        let trip = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(trip_id = %trip.id, stop = %next.id(), "Trip advanced");

        let students = self
            .resolver
            .students_at_stop(&poll_id, &trip_type, &next)
            .await?;

        Ok(AdvanceOutcome::Moved(StopReached {
            trip,
            stop: next,
            students,
        }))
    }

    /// Complete an in-progress trip directly (administrators may end a trip
    /// before every stop is served).
    pub async fn complete(&self, trip_id: &str) -> AppResult<TripCompleted> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let trip = Self::lock_trip(&txn, trip_id).await?;

        if trip.status != TripStatus::InProgress {
            return Err(AppError::InvalidState("trip is not in progress".to_string()));
        }

        self.finish(txn, trip).await
    }

    /// Full per-stop breakdown of a trip, in visiting order, regardless of
    /// trip status.
    pub async fn detail(&self, trip_id: &str) -> AppResult<TripDetail> {
        let trip = self.trip_repo.get_by_id(trip_id).await?;
        let stops = self
            .resolver
            .breakdown(&trip.poll_id, &trip.trip_type)
            .await?;

        let current_index = current_stop_id(&trip)
            .and_then(|id| stops.iter().position(|r| r.stop.id() == id));

        let progress = TripProgress {
            total_stops: stops.len(),
            current_index,
        };

        Ok(TripDetail {
            trip,
            stops,
            progress,
        })
    }

    /// Position of a trip within its (freshly resolved) stop list.
    pub async fn progress(&self, trip: &trip::Model) -> AppResult<TripProgress> {
        let stops = self
            .resolver
            .resolve_stops(&trip.poll_id, &trip.trip_type)
            .await?;
        let current_index = current_stop_id(trip).and_then(|id| position_of(&stops, &id));
        Ok(TripProgress {
            total_stops: stops.len(),
            current_index,
        })
    }

    /// Read-only status: the trip, its progress, and (when in progress) the
    /// students at the current stop.
    pub async fn status(&self, trip_id: &str) -> AppResult<TripStatusView> {
        let trip = self.trip_repo.get_by_id(trip_id).await?;
        let progress = self.progress(&trip).await?;

        let current_students = if trip.status == TripStatus::InProgress {
            match (&trip.trip_type, &trip.current_boarding_point_id, &trip.current_university) {
                (TripType::Outbound, Some(point_id), _) => Some(
                    self.resolver
                        .students_at_point(&trip.poll_id, &trip.trip_type, point_id)
                        .await?,
                ),
                (TripType::Return, _, Some(university)) => Some(
                    self.resolver
                        .students_at_university(&trip.poll_id, &trip.trip_type, university)
                        .await?,
                ),
                _ => None,
            }
        } else {
            None
        };

        Ok(TripStatusView {
            trip,
            progress,
            current_students,
        })
    }

    /// Re-read a trip inside the transaction, taking a row lock.
    async fn lock_trip(txn: &DatabaseTransaction, trip_id: &str) -> AppResult<trip::Model> {
        Trip::find_by_id(trip_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::TripNotFound(trip_id.to_string()))
    }

    /// Complete the (locked) trip and commit. Outbound completion
    /// get-or-creates the paired pending return trip in the same
    /// transaction, so it is provisioned exactly once.
    async fn finish(&self, txn: DatabaseTransaction, trip: trip::Model) -> AppResult<TripCompleted> {
        let poll_id = trip.poll_id.clone();
        let is_outbound = trip.trip_type == TripType::Outbound;

        let mut active: trip::ActiveModel = trip.into();
        active.status = Set(TripStatus::Completed);
        active.completed_at = Set(Some(Utc::now().into()));
        active.current_boarding_point_id = Set(None);
        active.current_university = Set(None);

        let trip = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let return_trip = if is_outbound {
            Some(self.get_or_create_return(&txn, &poll_id).await?)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            trip_id = %trip.id,
            return_trip = return_trip.as_ref().map(|t| t.id.as_str()),
            "Trip completed"
        );

        Ok(TripCompleted { trip, return_trip })
    }

    /// Find or provision the return trip for a poll.
    async fn get_or_create_return(
        &self,
        txn: &DatabaseTransaction,
        poll_id: &str,
    ) -> AppResult<trip::Model> {
        let existing = Trip::find()
            .filter(trip::Column::PollId.eq(poll_id))
            .filter(trip::Column::TripType.eq(TripType::Return))
            .one(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(found) = existing {
            return Ok(found);
        }

        let model = trip::ActiveModel {
            id: Set(self.id_gen.generate()),
            poll_id: Set(poll_id.to_string()),
            trip_type: Set(TripType::Return),
            status: Set(TripStatus::Pending),
            current_boarding_point_id: Set(None),
            current_university: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        model
            .insert(txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use univan_db::entities::{
        poll::{self, PollStatus},
        student::{ClassShift, University},
        vote::{self, VoteOption},
    };
    use univan_db::repositories::{
        BoardingPointRepository, StudentRepository, VoteRepository,
    };

    fn mock_trip(id: &str, trip_type: TripType, status: TripStatus) -> trip::Model {
        trip::Model {
            id: id.to_string(),
            poll_id: "poll1".to_string(),
            trip_type,
            status,
            current_boarding_point_id: None,
            current_university: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn mock_poll() -> poll::Model {
        poll::Model {
            id: "poll1".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            status: PollStatus::Open,
        }
    }

    fn mock_vote(id: &str, student_id: &str, option: VoteOption) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            student_id: student_id.to_string(),
            poll_id: "poll1".to_string(),
            option,
            voted_at: Utc::now().into(),
        }
    }

    fn mock_student(id: &str, name: &str, university: University) -> student::Model {
        student::Model {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            name: name.to_string(),
            phone: None,
            class_shift: ClassShift::Morning,
            university,
            boarding_point_id: None,
            registered_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> TripService {
        let db = Arc::new(db);
        let resolver = StopResolver::new(
            VoteRepository::new(Arc::clone(&db)),
            StudentRepository::new(Arc::clone(&db)),
            BoardingPointRepository::new(Arc::clone(&db)),
        );
        TripService::new(
            Arc::clone(&db),
            TripRepository::new(Arc::clone(&db)),
            PollRepository::new(Arc::clone(&db)),
            resolver,
        )
    }

    #[tokio::test]
    async fn test_start_rejects_non_pending_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Outbound,
                TripStatus::InProgress,
            )]])
            .into_connection();

        let err = service(db).start("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_start_fails_with_no_stops_when_nobody_voted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Return,
                TripStatus::Pending,
            )]])
            .append_query_results([Vec::<vote::Model>::new()])
            .into_connection();

        let err = service(db).start("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::NoStops(_)));
    }

    #[tokio::test]
    async fn test_start_return_trip_points_at_highest_priority_university() {
        let started = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::InProgress);
            t.current_university = Some(University::Ifpi);
            t.started_at = Some(Utc::now().into());
            t
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // lock + resolve
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Return,
                TripStatus::Pending,
            )]])
            .append_query_results([vec![
                mock_vote("v1", "s1", VoteOption::RoundTrip),
                mock_vote("v2", "s2", VoteOption::OneWayReturn),
            ]])
            .append_query_results([vec![
                mock_student("s1", "Ana Silva", University::Uespi),
                mock_student("s2", "Carla Dias", University::Ifpi),
            ]])
            // update .. returning
            .append_query_results([[started]])
            // students_at_stop re-resolution
            .append_query_results([vec![
                mock_vote("v1", "s1", VoteOption::RoundTrip),
                mock_vote("v2", "s2", VoteOption::OneWayReturn),
            ]])
            .append_query_results([vec![
                mock_student("s1", "Ana Silva", University::Uespi),
                mock_student("s2", "Carla Dias", University::Ifpi),
            ]])
            .into_connection();

        let reached = service(db).start("trip1").await.unwrap();

        assert_eq!(reached.trip.status, TripStatus::InProgress);
        assert_eq!(reached.stop.id(), "IFPI");
        assert_eq!(reached.students.len(), 1);
        assert_eq!(reached.students[0].name, "Carla Dias");
    }

    #[tokio::test]
    async fn test_advance_rejects_pending_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Outbound,
                TripStatus::Pending,
            )]])
            .into_connection();

        let err = service(db).advance("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_advance_requires_position_pointer() {
        // In progress but with a null pointer: defensive MissingPointer.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Outbound,
                TripStatus::InProgress,
            )]])
            .into_connection();

        let err = service(db).advance("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::MissingPointer(_)));
    }

    #[tokio::test]
    async fn test_advance_surfaces_vanished_stop() {
        let in_progress = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::InProgress);
            t.current_university = Some(University::Uespi);
            t
        };

        // The only remaining qualifying vote is from an IFPI student, so the
        // UESPI pointer no longer resolves.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[in_progress]])
            .append_query_results([vec![mock_vote("v2", "s2", VoteOption::OneWayReturn)]])
            .append_query_results([vec![mock_student("s2", "Carla Dias", University::Ifpi)]])
            .into_connection();

        let err = service(db).advance("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::StopNotFound(_)));
    }

    #[tokio::test]
    async fn test_advance_moves_to_next_university() {
        let at_first = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::InProgress);
            t.current_university = Some(University::Ifpi);
            t
        };
        let at_second = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::InProgress);
            t.current_university = Some(University::Uespi);
            t
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // lock + resolve
            .append_query_results([[at_first]])
            .append_query_results([vec![
                mock_vote("v1", "s1", VoteOption::RoundTrip),
                mock_vote("v2", "s2", VoteOption::OneWayReturn),
            ]])
            .append_query_results([vec![
                mock_student("s1", "Ana Silva", University::Uespi),
                mock_student("s2", "Carla Dias", University::Ifpi),
            ]])
            // update .. returning
            .append_query_results([[at_second]])
            // students_at_stop re-resolution
            .append_query_results([vec![
                mock_vote("v1", "s1", VoteOption::RoundTrip),
                mock_vote("v2", "s2", VoteOption::OneWayReturn),
            ]])
            .append_query_results([vec![
                mock_student("s1", "Ana Silva", University::Uespi),
                mock_student("s2", "Carla Dias", University::Ifpi),
            ]])
            .into_connection();

        let outcome = service(db).advance("trip1").await.unwrap();

        let AdvanceOutcome::Moved(reached) = outcome else {
            panic!("expected Moved outcome");
        };
        assert_eq!(reached.stop.id(), "UESPI");
        assert_eq!(reached.students.len(), 1);
        assert_eq!(reached.students[0].name, "Ana Silva");
    }

    #[tokio::test]
    async fn test_advance_past_last_stop_completes_return_trip() {
        let at_last = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::InProgress);
            t.current_university = Some(University::Ifpi);
            t
        };
        let completed = {
            let mut t = mock_trip("trip1", TripType::Return, TripStatus::Completed);
            t.completed_at = Some(Utc::now().into());
            t
        };

        // Only one resolvable university, and the trip is already on it.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[at_last]])
            .append_query_results([vec![mock_vote("v2", "s2", VoteOption::OneWayReturn)]])
            .append_query_results([vec![mock_student("s2", "Carla Dias", University::Ifpi)]])
            .append_query_results([[completed]])
            .into_connection();

        let outcome = service(db).advance("trip1").await.unwrap();

        let AdvanceOutcome::Completed(done) = outcome else {
            panic!("expected Completed outcome");
        };
        assert_eq!(done.trip.status, TripStatus::Completed);
        assert!(done.return_trip.is_none());
    }

    #[tokio::test]
    async fn test_completing_outbound_provisions_return_trip() {
        let in_progress = {
            let mut t = mock_trip("trip1", TripType::Outbound, TripStatus::InProgress);
            t.current_boarding_point_id = Some("bp1".to_string());
            t
        };
        let completed = {
            let mut t = mock_trip("trip1", TripType::Outbound, TripStatus::Completed);
            t.completed_at = Some(Utc::now().into());
            t
        };
        let provisioned = mock_trip("trip2", TripType::Return, TripStatus::Pending);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // lock, update .. returning
            .append_query_results([[in_progress], [completed]])
            // no existing return trip, then insert .. returning
            .append_query_results([Vec::<trip::Model>::new()])
            .append_query_results([[provisioned]])
            .into_connection();

        let done = service(db).complete("trip1").await.unwrap();

        assert_eq!(done.trip.status, TripStatus::Completed);
        let return_trip = done.return_trip.unwrap();
        assert_eq!(return_trip.trip_type, TripType::Return);
        assert_eq!(return_trip.status, TripStatus::Pending);
    }

    #[tokio::test]
    async fn test_complete_rejects_pending_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Outbound,
                TripStatus::Pending,
            )]])
            .into_connection();

        let err = service(db).complete("trip1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_pair() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_poll()]])
            .append_query_results([[mock_trip(
                "trip1",
                TripType::Outbound,
                TripStatus::Pending,
            )]])
            .into_connection();

        let err = service(db)
            .create("poll1", TripType::Outbound)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTrip(_)));
    }
}
