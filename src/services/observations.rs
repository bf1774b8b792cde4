use crate::{
    db::DatabaseAccess,
    entities::{predict_data, raw_data},
    errors::ServiceError,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;
use utoipa::ToSchema;

/// Which of the two disjoint visitor series to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Raw,
    Predicted,
}

impl Series {
    fn operation(self) -> &'static str {
        match self {
            Series::Raw => "query_raw_data",
            Series::Predicted => "query_predict_data",
        }
    }
}

/// One (facility, time, visitor-count) sample
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Roller Coaster",
    "record_time": "2024-05-01T10:00:00Z",
    "visitor": 132
}))]
pub struct Observation {
    pub name: String,
    pub record_time: DateTime<Utc>,
    pub visitor: i32,
}

/// Validated filter for a series range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    names: BTreeSet<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ObservationQuery {
    /// Builds a filter; blank names are dropped and at least one must remain.
    pub fn new<I, S>(names: I, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "at least one facility name is required".to_string(),
            ));
        }

        Ok(Self { names, start, end })
    }

    /// Parses the comma-joined facility list and the two bounds of the window
    pub fn parse(facilities: &str, start: &str, end: &str) -> Result<Self, ServiceError> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Self::new(facilities.split(','), start, end)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// An inverted window matches nothing
    pub fn is_empty_window(&self) -> bool {
        self.start > self.end
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        self.names.contains(&observation.name)
            && self.start <= observation.record_time
            && observation.record_time <= self.end
    }
}

/// Parses RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]` or `YYYY-MM-DD`. Offset-less input is UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ServiceError::InvalidArgument(format!("unparsable timestamp '{}'", raw)))
}

/// Time-series store over `raw_data` and `predict_data`
#[derive(Clone)]
pub struct ObservationService {
    db: DatabaseAccess,
}

impl ObservationService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    /// Returns every sample of the named facilities inside `[start, end]`,
    /// ordered by `record_time` then name.
    #[instrument(skip(self))]
    pub async fn query_observations(
        &self,
        series: Series,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, ServiceError> {
        if query.is_empty_window() {
            return Ok(Vec::new());
        }

        let conn = self.db.conn();
        match series {
            Series::Raw => {
                self.db
                    .run(
                        series.operation(),
                        select_window::<raw_data::Entity, _>(
                            conn,
                            raw_data::Column::Name,
                            raw_data::Column::RecordTime,
                            query,
                        ),
                    )
                    .await
            }
            Series::Predicted => {
                self.db
                    .run(
                        series.operation(),
                        select_window::<predict_data::Entity, _>(
                            conn,
                            predict_data::Column::Name,
                            predict_data::Column::RecordTime,
                            query,
                        ),
                    )
                    .await
            }
        }
    }
}

async fn select_window<E, C>(
    conn: &C,
    name: E::Column,
    record_time: E::Column,
    query: &ObservationQuery,
) -> Result<Vec<Observation>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find()
        .filter(name.is_in(query.names.iter().cloned()))
        .filter(record_time.between(query.start, query.end))
        .order_by_asc(record_time)
        .order_by_asc(name)
        .into_model::<Observation>()
        .all(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-05-01T10:30:00Z", 10, 30)]
    #[case("2024-05-01T12:30:00+02:00", 10, 30)]
    #[case("2024-05-01 10:30:00", 10, 30)]
    #[case("2024-05-01T10:30", 10, 30)]
    #[case("2024-05-01 10:30", 10, 30)]
    #[case("2024-05-01", 0, 0)]
    fn parses_supported_timestamp_shapes(
        #[case] raw: &str,
        #[case] hour: u32,
        #[case] minute: u32,
    ) {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap();
        assert_eq!(parse_timestamp(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2024-13-01")]
    #[case("01/05/2024")]
    fn rejects_garbage_timestamps(#[case] raw: &str) {
        assert_matches!(parse_timestamp(raw), Err(ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn empty_facility_list_is_invalid() {
        let err = ObservationQuery::parse(" , ,", "2024-05-01", "2024-05-02").unwrap_err();
        assert_matches!(err, ServiceError::InvalidArgument(_));
    }

    #[test]
    fn facility_list_is_trimmed_and_deduplicated() {
        let query =
            ObservationQuery::parse("Coaster, Ferris Wheel,Coaster", "2024-05-01", "2024-05-02")
                .unwrap();
        let names: Vec<&str> = query.names().collect();
        assert_eq!(names, vec!["Coaster", "Ferris Wheel"]);
    }

    #[test]
    fn inverted_window_is_empty_not_an_error() {
        let query = ObservationQuery::parse("Coaster", "2024-05-02", "2024-05-01").unwrap();
        assert!(query.is_empty_window());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let query = ObservationQuery::parse(
            "Coaster",
            "2024-05-01T10:00:00Z",
            "2024-05-01T11:00:00Z",
        )
        .unwrap();
        let at = |h| Observation {
            name: "Coaster".into(),
            record_time: Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap(),
            visitor: 1,
        };
        assert!(query.matches(&at(10)));
        assert!(query.matches(&at(11)));
        assert!(!query.matches(&at(12)));
    }
}
