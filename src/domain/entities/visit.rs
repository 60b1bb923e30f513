//! Visit entities recorded after successful redirects.

/// Input data for recording a visit.
///
/// The timestamp is set by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub short_code: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Visit count aggregated per short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitTally {
    pub short_code: String,
    pub total: i64,
}
