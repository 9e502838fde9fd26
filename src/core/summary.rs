use super::types::{BetterOption, ProjectionResult, ProjectionSummary, YearRecord};

/// Reduces a projection to its headline numbers. `None` for an empty projection.
pub fn summarize(result: &ProjectionResult) -> Option<ProjectionSummary> {
    let last = result.final_year()?;
    let difference = last.rent_minus_sell();
    Some(ProjectionSummary {
        final_year: last.year,
        rent_net_worth: last.simple_rental_net_worth,
        sell_net_worth: last.sell_year0_total,
        difference,
        better_option: if difference > 0.0 {
            BetterOption::Rent
        } else {
            BetterOption::Sell
        },
        crossover_year: crossover_year(&result.years),
    })
}

/// First year in which keep-renting and sell-now swap ranking.
///
/// A zero gap counts as "sell ahead", so touching zero and bouncing back is not
/// a crossover.
pub fn crossover_year(years: &[YearRecord]) -> Option<u32> {
    years
        .windows(2)
        .find(|pair| (pair[0].rent_minus_sell() > 0.0) != (pair[1].rent_minus_sell() > 0.0))
        .map(|pair| pair[1].year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(gaps: &[(f64, f64)]) -> Vec<YearRecord> {
        gaps.iter()
            .enumerate()
            .map(|(year, &(simple, sell))| YearRecord {
                year: year as u32,
                simple_rental_net_worth: simple,
                sell_year0_total: sell,
                ..YearRecord::default()
            })
            .collect()
    }

    #[test]
    fn crossover_reports_year_of_sign_change() {
        let years = records(&[
            (0.0, 100.0),
            (50.0, 105.0),
            (108.0, 110.0),
            (130.0, 116.0),
            (150.0, 122.0),
        ]);
        assert_eq!(crossover_year(&years), Some(3));
    }

    #[test]
    fn crossover_is_none_without_sign_change() {
        let years = records(&[(0.0, 100.0), (50.0, 105.0), (80.0, 110.0)]);
        assert_eq!(crossover_year(&years), None);

        let always_ahead = records(&[(10.0, 0.0), (20.0, 0.0)]);
        assert_eq!(crossover_year(&always_ahead), None);
    }

    #[test]
    fn crossover_detects_rent_falling_behind() {
        let years = records(&[(200.0, 100.0), (150.0, 110.0), (90.0, 120.0)]);
        assert_eq!(crossover_year(&years), Some(2));
    }

    #[test]
    fn crossover_with_single_year_is_none() {
        assert_eq!(crossover_year(&records(&[(0.0, 1.0)])), None);
        assert_eq!(crossover_year(&[]), None);
    }

    #[test]
    fn summarize_uses_final_year() {
        let result = ProjectionResult {
            years: records(&[(0.0, 100.0), (90.0, 105.0), (140.0, 110.0)]),
        };
        let summary = summarize(&result).expect("non-empty projection");
        assert_eq!(summary.final_year, 2);
        assert_eq!(summary.rent_net_worth, 140.0);
        assert_eq!(summary.sell_net_worth, 110.0);
        assert_eq!(summary.difference, 30.0);
        assert_eq!(summary.better_option, BetterOption::Rent);
        assert_eq!(summary.crossover_year, Some(2));
    }

    #[test]
    fn summarize_empty_projection_is_none() {
        assert!(summarize(&ProjectionResult::default()).is_none());
    }
}
