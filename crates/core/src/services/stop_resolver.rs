//! Stop resolution.
//!
//! Turns the live vote set of a poll into the ordered stop sequence a trip
//! walks: boarding points (ascending route order) for outbound trips,
//! universities (fixed priority order) for return trips. Resolution is
//! always computed fresh from the votes; callers must not cache a stop list
//! across a trip transition.

use univan_common::AppResult;
use univan_db::{
    entities::{
        boarding_point,
        student::{self, University},
        trip::TripType,
        vote::VoteOption,
    },
    repositories::{BoardingPointRepository, StudentRepository, VoteRepository},
};

/// A stop on a trip's route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    /// An outbound stop: a boarding point.
    Point(boarding_point::Model),
    /// A return stop: a university.
    University(University),
}

impl Stop {
    /// Stop identifier: the boarding point's id, or the university code.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Point(p) => p.id.clone(),
            Self::University(u) => u.code().to_string(),
        }
    }

    /// Human-readable stop name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Point(p) => &p.name,
            Self::University(u) => u.display_name(),
        }
    }
}

/// A stop together with the students waiting at it.
#[derive(Debug, Clone)]
pub struct ResolvedStop {
    pub stop: Stop,
    pub students: Vec<student::Model>,
}

/// Vote options that put a student on a trip of the given direction.
pub(crate) const fn qualifying_options(trip_type: &TripType) -> [VoteOption; 2] {
    match trip_type {
        TripType::Outbound => [VoteOption::RoundTrip, VoteOption::OneWayOutbound],
        TripType::Return => [VoteOption::RoundTrip, VoteOption::OneWayReturn],
    }
}

/// Resolves the stops of a trip from the poll's votes.
#[derive(Clone)]
pub struct StopResolver {
    vote_repo: VoteRepository,
    student_repo: StudentRepository,
    boarding_point_repo: BoardingPointRepository,
}

impl StopResolver {
    /// Create a new stop resolver.
    #[must_use]
    pub const fn new(
        vote_repo: VoteRepository,
        student_repo: StudentRepository,
        boarding_point_repo: BoardingPointRepository,
    ) -> Self {
        Self {
            vote_repo,
            student_repo,
            boarding_point_repo,
        }
    }

    /// Students with a qualifying vote on the poll. Each student appears at
    /// most once (one vote per student per poll).
    async fn qualifying_students(
        &self,
        poll_id: &str,
        trip_type: &TripType,
    ) -> AppResult<Vec<student::Model>> {
        let votes = self
            .vote_repo
            .find_for_poll_with_options(poll_id, &qualifying_options(trip_type))
            .await?;
        let student_ids: Vec<String> = votes.into_iter().map(|v| v.student_id).collect();
        self.student_repo.find_by_ids(&student_ids).await
    }

    /// Every resolved stop with its students, in visiting order.
    pub async fn breakdown(
        &self,
        poll_id: &str,
        trip_type: &TripType,
    ) -> AppResult<Vec<ResolvedStop>> {
        let students = self.qualifying_students(poll_id, trip_type).await?;

        match trip_type {
            TripType::Outbound => {
                let point_ids: Vec<String> = students
                    .iter()
                    .filter_map(|s| s.boarding_point_id.clone())
                    .collect();
                let points = self.boarding_point_repo.find_by_ids(&point_ids).await?;
                Ok(group_by_boarding_point(points, &students))
            }
            TripType::Return => Ok(group_by_university(students)),
        }
    }

    /// The ordered, de-duplicated stop sequence for a trip.
    pub async fn resolve_stops(&self, poll_id: &str, trip_type: &TripType) -> AppResult<Vec<Stop>> {
        Ok(self
            .breakdown(poll_id, trip_type)
            .await?
            .into_iter()
            .map(|r| r.stop)
            .collect())
    }

    /// Students boarding at the given point.
    pub async fn students_at_point(
        &self,
        poll_id: &str,
        trip_type: &TripType,
        point_id: &str,
    ) -> AppResult<Vec<student::Model>> {
        let students = self.qualifying_students(poll_id, trip_type).await?;
        Ok(students
            .into_iter()
            .filter(|s| s.boarding_point_id.as_deref() == Some(point_id))
            .collect())
    }

    /// Students leaving from the given university, alphabetically.
    pub async fn students_at_university(
        &self,
        poll_id: &str,
        trip_type: &TripType,
        university: &University,
    ) -> AppResult<Vec<student::Model>> {
        let mut students: Vec<student::Model> = self
            .qualifying_students(poll_id, trip_type)
            .await?
            .into_iter()
            .filter(|s| s.university == *university)
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    /// Students present at a resolved stop.
    pub async fn students_at_stop(
        &self,
        poll_id: &str,
        trip_type: &TripType,
        stop: &Stop,
    ) -> AppResult<Vec<student::Model>> {
        match stop {
            Stop::Point(p) => self.students_at_point(poll_id, trip_type, &p.id).await,
            Stop::University(u) => self.students_at_university(poll_id, trip_type, u).await,
        }
    }
}

/// Group students by boarding point, keeping the points' route order.
///
/// `points` must already be sorted ascending by `route_order` (the
/// repository query guarantees it). Points nobody boards at are dropped, as
/// are students without a boarding point.
fn group_by_boarding_point(
    points: Vec<boarding_point::Model>,
    students: &[student::Model],
) -> Vec<ResolvedStop> {
    let mut stops = Vec::new();
    for point in points {
        let at_point: Vec<student::Model> = students
            .iter()
            .filter(|s| s.boarding_point_id.as_deref() == Some(point.id.as_str()))
            .cloned()
            .collect();
        if !at_point.is_empty() {
            stops.push(ResolvedStop {
                stop: Stop::Point(point),
                students: at_point,
            });
        }
    }
    stops
}

/// Group students by university in return-priority order, each roster
/// alphabetical. Ties in priority keep insertion order (stable sort).
fn group_by_university(students: Vec<student::Model>) -> Vec<ResolvedStop> {
    let mut groups: Vec<(University, Vec<student::Model>)> = Vec::new();
    for s in students {
        if let Some(idx) = groups.iter().position(|(u, _)| *u == s.university) {
            groups[idx].1.push(s);
        } else {
            groups.push((s.university.clone(), vec![s]));
        }
    }

    groups.sort_by_key(|(u, _)| u.return_priority());
    for (_, members) in &mut groups {
        members.sort_by(|a, b| a.name.cmp(&b.name));
    }

    groups
        .into_iter()
        .map(|(u, students)| ResolvedStop {
            stop: Stop::University(u),
            students,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use univan_db::entities::student::ClassShift;

    fn mock_point(id: &str, name: &str, route_order: i32) -> boarding_point::Model {
        boarding_point::Model {
            id: id.to_string(),
            name: name.to_string(),
            address_reference: None,
            route_order,
        }
    }

    fn mock_student(id: &str, name: &str, university: University, point: Option<&str>) -> student::Model {
        student::Model {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            name: name.to_string(),
            phone: None,
            class_shift: ClassShift::Morning,
            university,
            boarding_point_id: point.map(ToString::to_string),
            registered_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_outbound_grouping_follows_route_order() {
        let points = vec![mock_point("x", "Ponto A", 0), mock_point("y", "Ponto B", 1)];
        let students = vec![
            mock_student("c", "Carla Dias", University::Ifpi, Some("y")),
            mock_student("a", "Ana Silva", University::Uespi, Some("x")),
            mock_student("b", "Bruno Costa", University::Ifpi, Some("x")),
        ];

        let stops = group_by_boarding_point(points, &students);

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].stop.id(), "x");
        assert_eq!(stops[0].students.len(), 2);
        assert_eq!(stops[1].stop.id(), "y");
        assert_eq!(stops[1].students.len(), 1);
        assert_eq!(stops[1].students[0].name, "Carla Dias");
    }

    #[test]
    fn test_outbound_grouping_drops_empty_points_and_unplaced_students() {
        let points = vec![mock_point("x", "Ponto A", 0)];
        let students = vec![
            mock_student("a", "Ana Silva", University::Uespi, Some("x")),
            mock_student("d", "Duda Lima", University::Etc, None),
        ];

        let stops = group_by_boarding_point(points, &students);

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].students.len(), 1);
        assert_eq!(stops[0].students[0].name, "Ana Silva");
    }

    #[test]
    fn test_return_grouping_follows_university_priority() {
        // Insertion order deliberately scrambled; IFPI must still come first.
        let students = vec![
            mock_student("a", "Ana Silva", University::Uespi, None),
            mock_student("e", "Edu Ramos", University::Etc, None),
            mock_student("c", "Carla Dias", University::Ifpi, None),
            mock_student("f", "Fabi Nunes", University::Chrisfapi, None),
        ];

        let stops = group_by_university(students);

        let order: Vec<String> = stops.iter().map(|s| s.stop.id()).collect();
        assert_eq!(order, vec!["IFPI", "CHRISFAPI", "UESPI", "ETC"]);
    }

    #[test]
    fn test_return_rosters_are_alphabetical_and_deduplicated() {
        let students = vec![
            mock_student("z", "Zeca Mota", University::Ifpi, None),
            mock_student("c", "Carla Dias", University::Ifpi, None),
            mock_student("a", "Ana Silva", University::Uespi, None),
        ];

        let stops = group_by_university(students);

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].stop.id(), "IFPI");
        let names: Vec<&str> = stops[0].students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Carla Dias", "Zeca Mota"]);
    }

    #[test]
    fn test_qualifying_options_per_direction() {
        assert_eq!(
            qualifying_options(&TripType::Outbound),
            [VoteOption::RoundTrip, VoteOption::OneWayOutbound]
        );
        assert_eq!(
            qualifying_options(&TripType::Return),
            [VoteOption::RoundTrip, VoteOption::OneWayReturn]
        );
    }

    #[test]
    fn test_stop_identity_and_name() {
        let point = Stop::Point(mock_point("x", "Praça Central", 0));
        assert_eq!(point.id(), "x");
        assert_eq!(point.name(), "Praça Central");

        let uni = Stop::University(University::Ifpi);
        assert_eq!(uni.id(), "IFPI");
        assert_eq!(uni.name(), "Instituto Federal do Piauí");
    }
}
