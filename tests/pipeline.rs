mod pipeline {
    use hygiene_eda::analysis::IntervalSettings;
    use hygiene_eda::chart::HygieneVisualizer;
    use hygiene_eda::config::{BarrierCategory, Indicator, Record, Response};
    use hygiene_eda::file::SurveyTable;
    use hygiene_eda::state::{Pipeline, Section, SectionView, ViewQuery};

    use std::sync::Arc;

    fn company(id: &str, product: &str, training: &str, answer: Response) -> Record {
        let mut record = Record::new(id);
        record.product_type = product.to_string();
        record.staff_size = "10 à 20".to_string();
        record.training_received = training.to_string();
        record.other_obstacles = Some("Manque d'eau".to_string());
        for indicator in Indicator::ALL {
            record = record.with_practice(indicator, answer);
        }
        record.with_barrier(BarrierCategory::Financial, Response::Yes)
    }

    fn pipeline() -> Pipeline {
        let table = SurveyTable::from_records(vec![
            company("E1", "Jus", "BPH", Response::Yes),
            company("E2", "Jus", "Aucune", Response::No),
            company("E3", "Farine", "BPH, HACCP", Response::Yes),
        ]);
        Pipeline::new(Arc::new(table), IntervalSettings::default(), HygieneVisualizer::default())
    }

    #[test]
    fn test_repeated_query_hits_cache() {
        let mut pipeline = pipeline();
        let first = pipeline.view(&ViewQuery::Obstacles).unwrap();
        let second = pipeline.view(&ViewQuery::Obstacles).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pipeline.computed(), 1);
    }

    #[test]
    fn test_company_selection_is_part_of_key() {
        let mut pipeline = pipeline();
        pipeline.view(&ViewQuery::Companies(vec!["E1".into()])).unwrap();
        pipeline.view(&ViewQuery::Companies(vec!["E1".into(), "E2".into()])).unwrap();
        pipeline.view(&ViewQuery::Companies(vec!["E1".into(), "E2".into()])).unwrap();
        assert_eq!(pipeline.computed(), 2);
    }

    #[test]
    fn test_only_latest_company_selection_is_cached() {
        let mut pipeline = pipeline();
        pipeline.view(&ViewQuery::Overview).unwrap();
        for ids in [vec!["E1"], vec!["E1", "E2"], vec!["E2"], vec!["E3", "E1"]] {
            let ids = ids.into_iter().map(String::from).collect();
            pipeline.view(&ViewQuery::Companies(ids)).unwrap();
        }

        assert_eq!(pipeline.computed(), 5);
        assert_eq!(pipeline.cached(), 2);

        pipeline.view(&ViewQuery::Companies(vec!["E3".into(), "E1".into()])).unwrap();
        assert_eq!(pipeline.computed(), 5);
    }

    #[test]
    fn test_overview_carries_raw_records() {
        let mut pipeline = pipeline();
        match pipeline.view(&ViewQuery::Overview).unwrap().as_ref() {
            SectionView::Overview { records, .. } => {
                let ids: Vec<&str> = records.iter().map(|r| r.company_id.as_str()).collect();
                assert_eq!(ids, ["E1", "E2", "E3"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_every_section_renders_charts() {
        let mut pipeline = pipeline();
        let selected = vec!["E1".to_string(), "E3".to_string()];

        for section in Section::ALL {
            let view = pipeline.view(&section.query(&selected)).unwrap();
            for chart in view.charts() {
                assert!(!chart.is_empty(), "{:?} rendered an empty chart", section);
            }
        }
    }

    #[test]
    fn test_unknown_company_yields_empty_radar() {
        let mut pipeline = pipeline();
        let view = pipeline.view(&ViewQuery::Companies(vec!["E99".into()])).unwrap();
        match view.as_ref() {
            SectionView::Companies { profiles, details, radar } => {
                assert_eq!(profiles.len(), 1);
                assert!(!profiles[0].is_found());
                assert!(details.is_empty());
                assert!(radar.is_empty());
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_overview_counts() {
        let mut pipeline = pipeline();
        match pipeline.view(&ViewQuery::Overview).unwrap().as_ref() {
            SectionView::Overview { overview, .. } => {
                assert_eq!(overview.companies, 3);
                assert_eq!(overview.product_types, 2);
                assert_eq!(overview.locations, 1);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
