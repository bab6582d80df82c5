use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Live attendance counters for the dashboard poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: i64,
    pub checked_in: i64,
    pub not_checked_in: i64,
    pub checked_in_percentage: i64,
}

impl DashboardStats {
    pub fn from_counts(total: i64, checked_in: i64) -> Self {
        let percentage = if total > 0 {
            ((checked_in as f64 / total as f64) * 100.0).round() as i64
        } else {
            0
        };

        Self {
            total,
            checked_in,
            not_checked_in: total - checked_in,
            checked_in_percentage: percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_reports_zero_percent() {
        let stats = DashboardStats::from_counts(0, 0);
        assert_eq!(stats.checked_in_percentage, 0);
        assert_eq!(stats.not_checked_in, 0);
    }

    #[test]
    fn three_of_four_is_seventy_five_percent() {
        let stats = DashboardStats::from_counts(4, 3);
        assert_eq!(stats.checked_in_percentage, 75);
        assert_eq!(stats.not_checked_in, 1);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(DashboardStats::from_counts(3, 1).checked_in_percentage, 33);
        assert_eq!(DashboardStats::from_counts(3, 2).checked_in_percentage, 67);
    }

    #[test]
    fn counts_always_balance() {
        for total in 0..20 {
            for checked_in in 0..=total {
                let stats = DashboardStats::from_counts(total, checked_in);
                assert_eq!(stats.checked_in + stats.not_checked_in, stats.total);
            }
        }
    }
}
