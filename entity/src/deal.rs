use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Rep, Stage};

/// High-level outcome of a deal, derived from its stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Status {
    Open,
    Won,
    Lost,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::Won, Status::Lost];

    pub fn for_stage(stage: Stage) -> Self {
        if stage.is_won() {
            Status::Won
        } else if stage.is_lost() {
            Status::Lost
        } else {
            Status::Open
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Won => "Won",
            Status::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic sales-pipeline record.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deal {
    pub rep: Rep,
    pub stage: Stage,
    pub time_in_stage: u32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Whole currency units.
    pub value: i64,
    pub status: Status,
}

impl Deal {
    /// Builds a deal whose `updated` and `status` follow from the other fields.
    pub fn new(
        rep: Rep,
        stage: Stage,
        time_in_stage: u32,
        created: DateTime<Utc>,
        value: i64,
    ) -> Self {
        Self {
            rep,
            stage,
            time_in_stage,
            created,
            updated: created + Duration::days(i64::from(time_in_stage)),
            value,
            status: Status::for_stage(stage),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_follows_stage() {
        assert_eq!(Status::for_stage(Stage::ClosedWon), Status::Won);
        assert_eq!(Status::for_stage(Stage::ClosedLost), Status::Lost);
        for stage in [
            Stage::Prospecting,
            Stage::Qualification,
            Stage::Proposal,
            Stage::Negotiation,
        ] {
            assert_eq!(Status::for_stage(stage), Status::Open);
        }
    }

    #[test]
    fn new_derives_updated_and_status() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let deal = Deal::new(Rep::Carol, Stage::ClosedWon, 12, created, 4_200);
        assert_eq!(deal.updated, Utc.with_ymd_and_hms(2025, 3, 13, 9, 30, 0).unwrap());
        assert_eq!(deal.status, Status::Won);
        assert!(!deal.is_open());
    }

    #[test]
    fn serializes_with_readable_enums() {
        let created = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let deal = Deal::new(Rep::Bob, Stage::Proposal, 3, created, 1_000);
        let json = serde_json::to_value(&deal).unwrap();
        assert_eq!(json["rep"], "Bob");
        assert_eq!(json["stage"], "PROPOSAL");
        assert_eq!(json["status"], "Open");
    }
}
