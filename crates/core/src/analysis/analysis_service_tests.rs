//! End-to-end tests for the analysis pipeline.

#[cfg(test)]
mod tests {
    use crate::analysis::{AnalysisRequest, AnalysisService, AnalysisServiceTrait};
    use crate::cashflows::{CashFlowImport, LiquidationStatus};
    use crate::grouping::{CategoryDimension, DateRange, FilterSelection, SkipReason};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn import(
        line: usize,
        deal: &str,
        d: Option<NaiveDate>,
        amount: Option<Decimal>,
    ) -> CashFlowImport {
        CashFlowImport {
            line_number: line,
            deal_id: deal.to_string(),
            date: d,
            amount,
            raw_date: d.map(|x| x.to_string()).unwrap_or_default(),
            raw_amount: amount.map(|x| x.to_string()).unwrap_or_default(),
            industry: "Tech".to_string(),
            region: "Europe".to_string(),
            fund: "Fund I".to_string(),
            status: LiquidationStatus::Active,
        }
    }

    fn industry_only() -> AnalysisRequest {
        AnalysisRequest {
            selection: FilterSelection::default(),
            dimensions: vec![CategoryDimension::Industry],
        }
    }

    fn ten_percent_rows() -> Vec<CashFlowImport> {
        vec![
            import(2, "D-1", Some(date(2020, 1, 1)), Some(dec!(-1000))),
            import(3, "D-1", Some(date(2021, 1, 1)), Some(dec!(1100))),
        ]
    }

    #[test]
    fn test_one_year_ten_percent_deal() {
        let report = AnalysisService::new()
            .analyze(ten_percent_rows(), &industry_only())
            .unwrap();

        assert_eq!(report.deal_irr.len(), 1);
        let rate = report.deal_irr[0].rate.unwrap();
        // 366 elapsed days under actual/365 put the rate a shade under 10%.
        assert!((rate - dec!(0.0997)).abs() < dec!(0.001), "rate was {rate}");
        assert!(report.skipped.is_empty());

        // The single-deal industry group carries the same flows.
        assert_eq!(report.category_irr.len(), 1);
        assert_eq!(report.category_irr[0].dimension, "industry");
        assert_eq!(report.category_irr[0].group_value, "Tech");
        assert_eq!(report.category_irr[0].rate, Some(rate));
    }

    #[test]
    fn test_single_row_group_is_skipped_not_solved() {
        let rows = vec![import(2, "D-1", Some(date(2020, 1, 1)), Some(dec!(500)))];

        let report = AnalysisService::new().analyze(rows, &industry_only()).unwrap();

        assert!(report.deal_irr.is_empty());
        assert!(report.category_irr.is_empty());
        // One record per group: the deal and its industry bucket.
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::NoSignChange));
        assert!(report.skipped.iter().any(|s| s.identifier == "D-1"));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.identifier == "industry:Tech"));
    }

    #[test]
    fn test_blank_date_skips_row_but_not_the_rest() {
        let mut rows = ten_percent_rows();
        rows.push(import(4, "D-1", None, Some(dec!(50))));

        let report = AnalysisService::new().analyze(rows, &industry_only()).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].identifier, "row 4");
        assert_eq!(report.skipped[0].reason, SkipReason::MissingDate);
        // The valid pair still solves.
        assert_eq!(report.deal_irr.len(), 1);
        assert!(report.deal_irr[0].rate.is_some());
    }

    #[test]
    fn test_empty_selection_only_date_range_applies() {
        let mut rows = ten_percent_rows();
        rows.push(import(4, "D-2", Some(date(2025, 1, 1)), Some(dec!(-100))));
        let request = AnalysisRequest {
            selection: FilterSelection {
                date_range: DateRange {
                    start: None,
                    end: Some(date(2022, 1, 1)),
                },
                ..FilterSelection::default()
            },
            dimensions: vec![CategoryDimension::Industry],
        };

        let report = AnalysisService::new().analyze(rows, &request).unwrap();

        assert_eq!(report.summary.included_rows, 2);
        assert_eq!(report.summary.excluded_by_filter, 1);
        assert_eq!(report.deal_irr.len(), 1);
        assert_eq!(report.deal_irr[0].deal_id, "D-1");
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let request = AnalysisRequest {
            selection: FilterSelection {
                industries: vec!["Tech".to_string()],
                ..FilterSelection::default()
            },
            dimensions: vec![CategoryDimension::Industry, CategoryDimension::Fund],
        };

        let first = AnalysisService::new()
            .analyze(ten_percent_rows(), &request)
            .unwrap();
        let second = AnalysisService::new()
            .analyze(ten_percent_rows(), &request)
            .unwrap();

        assert_eq!(first.category_irr, second.category_irr);
        assert_eq!(first.deal_irr, second.deal_irr);
        assert_eq!(first.skipped, second.skipped);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_solver_failure_keeps_na_row_and_skip_record() {
        // A 30-day billion-fold return has no root inside the bracket.
        let rows = vec![
            import(2, "D-X", Some(date(2020, 1, 1)), Some(dec!(-1))),
            import(3, "D-X", Some(date(2020, 1, 31)), Some(dec!(1000000000))),
        ];

        let report = AnalysisService::new().analyze(rows, &industry_only()).unwrap();

        assert_eq!(report.deal_irr.len(), 1);
        assert_eq!(report.deal_irr[0].rate, None);
        assert!(report.chart.is_empty());
        assert!(report
            .skipped
            .iter()
            .any(|s| s.identifier == "D-X" && s.reason == SkipReason::SolverNonConvergence));
        assert_eq!(report.summary.average_deal_irr, None);
    }

    #[test]
    fn test_multi_deal_category_aggregation() {
        // Two deals in one industry; the category rate is solved over the
        // union of their flows, not averaged from the deal rates.
        let mut rows = ten_percent_rows();
        rows.push(import(4, "D-2", Some(date(2019, 1, 1)), Some(dec!(-1000))));
        rows.push(import(5, "D-2", Some(date(2020, 1, 1)), Some(dec!(1200))));

        let report = AnalysisService::new().analyze(rows, &industry_only()).unwrap();

        assert_eq!(report.deal_irr.len(), 2);
        assert_eq!(report.category_irr.len(), 1);
        let category_rate = report.category_irr[0].rate.unwrap();
        let d1 = report.deal_irr[0].rate.unwrap();
        let d2 = report.deal_irr[1].rate.unwrap();
        assert!(category_rate > d1.min(d2) && category_rate < d1.max(d2));
        assert_eq!(
            report.summary.average_deal_irr,
            Some(((d1 + d2) / dec!(2)).round_dp(6))
        );
    }

    #[test]
    fn test_reversed_date_range_is_rejected() {
        let request = AnalysisRequest {
            selection: FilterSelection {
                date_range: DateRange {
                    start: Some(date(2022, 1, 1)),
                    end: Some(date(2020, 1, 1)),
                },
                ..FilterSelection::default()
            },
            dimensions: Vec::new(),
        };

        let err = AnalysisService::new()
            .analyze(ten_percent_rows(), &request)
            .unwrap_err();

        assert!(matches!(err, crate::Error::Validation(_)));
    }

    #[test]
    fn test_csv_end_to_end() {
        let content = b"Deal Code,Date,Amount,Industry,Region,Fund,Liquidation Status\n\
                        D-1,2020-01-01,-1000,Tech,Europe,Fund I,Active\n\
                        D-1,2021-01-01,1100,Tech,Europe,Fund I,Active";

        let report = AnalysisService::new()
            .analyze_csv(content, &industry_only())
            .unwrap();

        assert_eq!(report.deal_irr.len(), 1);
        assert!(report.deal_irr[0].rate.is_some());
    }

    #[test]
    fn test_workbook_end_to_end() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = [
            "Deal Code",
            "Date",
            "Amount",
            "Industry",
            "Region",
            "Fund",
            "Liquidation Status",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let data = [
            ["D-1", "2020-01-01", "-1000", "Tech", "Europe", "Fund I", "Active"],
            ["D-1", "2021-01-01", "1100", "Tech", "Europe", "Fund I", "Active"],
        ];
        for (r, row) in data.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string((r + 1) as u32, c as u16, *value).unwrap();
            }
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let report = AnalysisService::new()
            .analyze_workbook(&bytes, &industry_only())
            .unwrap();

        assert_eq!(report.deal_irr.len(), 1);
        assert_eq!(report.summary.total_rows, 2);
    }

    #[test]
    fn test_row_accounting_balances() {
        let mut rows = ten_percent_rows();
        rows.push(import(4, "D-1", None, Some(dec!(1))));
        rows.push(import(5, "D-2", Some(date(2020, 1, 1)), Some(dec!(-10))));
        rows.push(import(6, "D-2", Some(date(2021, 1, 1)), Some(dec!(12))));
        let request = AnalysisRequest {
            selection: FilterSelection {
                date_range: DateRange {
                    start: Some(date(2020, 1, 1)),
                    end: Some(date(2021, 12, 31)),
                },
                ..FilterSelection::default()
            },
            dimensions: vec![CategoryDimension::Region],
        };

        let report = AnalysisService::new().analyze(rows, &request).unwrap();

        let row_level_skips = report
            .skipped
            .iter()
            .filter(|s| s.identifier.starts_with("row "))
            .count();
        assert_eq!(
            report.summary.total_rows,
            report.summary.included_rows + report.summary.excluded_by_filter + row_level_skips
        );
    }
}
