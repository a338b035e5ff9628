//! Tests for the Report Builder.

#[cfg(test)]
mod tests {
    use crate::grouping::{CategoryDimension, SkipReason, SkipRecord};
    use crate::irr::IrrResult;
    use crate::report::{build_report, RowAccounting};
    use rust_decimal_macros::dec;

    #[test]
    fn test_tables_are_sorted_alphabetically() {
        let deals = vec![
            IrrResult::deal("D-9", Some(dec!(0.2))),
            IrrResult::deal("D-1", Some(dec!(0.1))),
            IrrResult::deal("D-5", None),
        ];
        let categories = vec![
            IrrResult::category(CategoryDimension::Region, "Europe", Some(dec!(0.08))),
            IrrResult::category(CategoryDimension::Industry, "Tech", Some(dec!(0.12))),
            IrrResult::category(CategoryDimension::Industry, "Energy", None),
        ];
        let skipped = vec![
            SkipRecord::for_group("industry:Energy", SkipReason::SolverNonConvergence),
            SkipRecord::for_row(3, SkipReason::MissingAmount),
        ];

        let report = build_report(deals, categories, skipped, RowAccounting::default());

        let deal_ids: Vec<_> = report.deal_irr.iter().map(|r| r.deal_id.as_str()).collect();
        assert_eq!(deal_ids, vec!["D-1", "D-5", "D-9"]);

        let category_keys: Vec<_> = report
            .category_irr
            .iter()
            .map(|r| (r.dimension.as_str(), r.group_value.as_str()))
            .collect();
        assert_eq!(
            category_keys,
            vec![
                ("industry", "Energy"),
                ("industry", "Tech"),
                ("region", "Europe")
            ]
        );

        let identifiers: Vec<_> = report
            .skipped
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(identifiers, vec!["industry:Energy", "row 3"]);
    }

    #[test]
    fn test_chart_uses_solved_deal_rates_in_table_order() {
        let deals = vec![
            IrrResult::deal("D-2", None),
            IrrResult::deal("D-3", Some(dec!(0.15))),
            IrrResult::deal("D-1", Some(dec!(0.05))),
        ];

        let report = build_report(deals, Vec::new(), Vec::new(), RowAccounting::default());

        let labels: Vec<_> = report.chart.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["D-1", "D-3"]);
        assert_eq!(report.chart[0].value, dec!(0.05));
    }

    #[test]
    fn test_average_deal_irr_ignores_unsolved() {
        let deals = vec![
            IrrResult::deal("D-1", Some(dec!(0.1))),
            IrrResult::deal("D-2", Some(dec!(0.3))),
            IrrResult::deal("D-3", None),
        ];

        let report = build_report(deals, Vec::new(), Vec::new(), RowAccounting::default());

        assert_eq!(report.summary.average_deal_irr, Some(dec!(0.2)));
    }

    #[test]
    fn test_average_deal_irr_none_when_nothing_solved() {
        let deals = vec![IrrResult::deal("D-1", None)];

        let report = build_report(deals, Vec::new(), Vec::new(), RowAccounting::default());

        assert_eq!(report.summary.average_deal_irr, None);
        assert!(report.chart.is_empty());
    }

    #[test]
    fn test_summary_carries_row_accounting() {
        let skipped = vec![SkipRecord::for_row(2, SkipReason::MissingDate)];
        let accounting = RowAccounting {
            total_rows: 10,
            included_rows: 7,
            excluded_by_filter: 2,
        };

        let report = build_report(Vec::new(), Vec::new(), skipped, accounting);

        assert_eq!(report.summary.total_rows, 10);
        assert_eq!(report.summary.included_rows, 7);
        assert_eq!(report.summary.excluded_by_filter, 2);
        assert_eq!(report.summary.skipped_rows, 1);
    }

    #[test]
    fn test_run_ids_are_unique_per_report() {
        let a = build_report(Vec::new(), Vec::new(), Vec::new(), RowAccounting::default());
        let b = build_report(Vec::new(), Vec::new(), Vec::new(), RowAccounting::default());
        assert_ne!(a.run_id, b.run_id);
    }
}
