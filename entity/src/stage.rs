use serde::{Deserialize, Serialize};

/// A step in the sales process. Declaration order is the pipeline order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

/// (stage, display name, sampling weight, is_won, is_lost)
const STAGE_META: [(Stage, &str, f64, bool, bool); 6] = [
    (Stage::Prospecting, "Prospecting", 0.2, false, false),
    (Stage::Qualification, "Qualification", 0.2, false, false),
    (Stage::Proposal, "Proposal", 0.2, false, false),
    (Stage::Negotiation, "Negotiation", 0.2, false, false),
    (Stage::ClosedWon, "Closed Won", 0.1, true, false),
    (Stage::ClosedLost, "Closed Lost", 0.1, false, true),
];

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Prospecting,
        Stage::Qualification,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::ClosedWon,
        Stage::ClosedLost,
    ];

    /// Position in the fixed pipeline order.
    pub fn sort_order(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        STAGE_META[self.sort_order()].1
    }

    /// Probability of drawing this stage when fabricating a deal.
    pub fn sampling_weight(self) -> f64 {
        STAGE_META[self.sort_order()].2
    }

    pub fn is_won(self) -> bool {
        STAGE_META[self.sort_order()].3
    }

    pub fn is_lost(self) -> bool {
        STAGE_META[self.sort_order()].4
    }

    pub fn weights() -> [f64; 6] {
        Self::ALL.map(Stage::sampling_weight)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_rows_line_up_with_variants() {
        for (idx, (stage, ..)) in STAGE_META.iter().enumerate() {
            assert_eq!(stage.sort_order(), idx);
            assert_eq!(Stage::ALL[idx], *stage);
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = Stage::weights().iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {total}");
    }

    #[test]
    fn exactly_one_won_and_one_lost_stage() {
        assert_eq!(Stage::ALL.iter().filter(|s| s.is_won()).count(), 1);
        assert_eq!(Stage::ALL.iter().filter(|s| s.is_lost()).count(), 1);
        assert!(Stage::ClosedWon.is_won());
        assert!(Stage::ClosedLost.is_lost());
    }
}
