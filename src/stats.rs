#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub total: f64,
    pub stddev: f64,
}

impl GroupStats {
    pub const ZERO: GroupStats = GroupStats {
        total: 0.0,
        stddev: 0.0,
    };
}

/// Sum and population standard deviation (N denominator) of a group.
///
/// Groups with fewer than two values, or with every value equal, report a
/// stddev of exactly 0.0.
pub fn group_stats(values: &[f64]) -> GroupStats {
    let Some(first) = values.first() else {
        return GroupStats::ZERO;
    };
    let total = values.iter().sum::<f64>();
    // total / n can miss the shared value by one ulp, leaving a residue
    if values.iter().all(|v| v == first) {
        return GroupStats { total, stddev: 0.0 };
    }

    let n = values.len() as f64;
    let mean = total / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    GroupStats {
        total,
        stddev: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_group_is_zero() {
        assert_eq!(group_stats(&[]), GroupStats::ZERO);
    }

    #[test]
    fn single_value_has_zero_stddev() {
        let s = group_stats(&[321.5]);
        assert_eq!(s.total, 321.5);
        assert_eq!(s.stddev, 0.0);
    }

    #[test]
    fn identical_values_have_zero_stddev() {
        let s = group_stats(&[75.0, 75.0, 75.0]);
        assert_eq!(s.total, 225.0);
        assert_eq!(s.stddev, 0.0);
    }

    #[test]
    fn identical_inexact_values_have_zero_stddev() {
        assert_eq!(group_stats(&[0.1, 0.1, 0.1]).stddev, 0.0);
        assert_eq!(group_stats(&[999.99; 4]).stddev, 0.0);
        assert_eq!(group_stats(&[123.456; 7]).stddev, 0.0);
    }

    #[test]
    fn textbook_population_stddev() {
        let s = group_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.total, 40.0);
        assert!((s.stddev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn divides_by_n_not_n_minus_one() {
        // sample stddev of [1, 3] would be sqrt(2)
        let s = group_stats(&[1.0, 3.0]);
        assert!((s.stddev - 1.0).abs() < 1e-12);
    }
}
