mod loader {
    use hygiene_eda::analysis::{proportions, Proportions};
    use hygiene_eda::config::{BarrierCategory, Indicator, Response};
    use hygiene_eda::file::{load_survey, SurveySource};
    use hygiene_eda::HygieneError;

    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn header() -> String {
        let mut columns = vec![
            "ID_entreprise".to_string(),
            "Localisation".to_string(),
            "Type _de_produit".to_string(),
            "Effectif_du_personnel".to_string(),
            "Formation_reçue".to_string(),
        ];
        columns.extend(Indicator::ALL.iter().map(|i| i.column().to_string()));
        columns.extend(BarrierCategory::ALL.iter().map(|b| b.column().to_string()));
        columns.push("Autres_obstacles".to_string());
        columns.join(",")
    }

    fn row(id: &str, location: &str, haccp: &str) -> String {
        let mut cells = vec![
            id.to_string(),
            location.to_string(),
            "Jus".to_string(),
            "10 à 20".to_string(),
            "BPH".to_string(),
        ];
        for indicator in Indicator::ALL {
            cells.push(if indicator == Indicator::Haccp { haccp } else { "Oui" }.to_string());
        }
        cells.extend(std::iter::repeat("Non".to_string()).take(4));
        cells.push("Inconnu".to_string());
        cells.join(",")
    }

    fn write_csv(content: &[u8]) -> std::io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load__three_way_split() -> TestResult {
        let content = [header(), row("E1", "Dakar", "Oui"), row("E2", "Thiès", "Non"), row("E3", "Dakar", "Peut-être")]
            .join("\n");
        let file = write_csv(content.as_bytes())?;

        let table = load_survey(file.path(), "utf-8")?;
        assert_eq!(table.records().len(), 3);
        assert_eq!(table.column_count(), 19);

        match proportions(table.records(), Indicator::Haccp) {
            Proportions::Observed(shares) => {
                for response in Response::ALL {
                    assert!((shares.share(response) - 1.0 / 3.0).abs() < 1e-9);
                }
            }
            Proportions::NoData => panic!("expected observed proportions"),
        }
        assert_eq!(table.records()[2].practice(Indicator::Haccp), Response::Unknown);
        Ok(())
    }

    #[test]
    fn test_load__missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_survey(&dir.path().join("nope.csv"), "utf-8").unwrap_err();
        assert!(matches!(err, HygieneError::FileNotFound(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_load__missing_columns_is_schema_error() -> TestResult {
        let file = write_csv(b"ID_entreprise,Localisation\nE1,Dakar\n")?;
        let err = load_survey(file.path(), "utf-8").unwrap_err();
        assert!(err.is_schema_error());
        assert!(!err.is_load_error());
        Ok(())
    }

    #[test]
    fn test_load__empty_file() -> TestResult {
        let file = write_csv(b"")?;
        assert!(matches!(load_survey(file.path(), "utf-8"), Err(HygieneError::EmptyFile(_))));
        Ok(())
    }

    #[test]
    fn test_load__bom_is_stripped() -> TestResult {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice([header(), row("E1", "Dakar", "Oui")].join("\n").as_bytes());
        let file = write_csv(&bytes)?;

        let table = load_survey(file.path(), "utf-8-sig")?;
        assert_eq!(table.records()[0].company_id, "E1");
        Ok(())
    }

    #[test]
    fn test_load__declared_single_byte_encoding() -> TestResult {
        let text = [header(), row("E1", "Thiès", "Oui")].join("\n");
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(&text);
        assert!(!had_errors);
        let file = write_csv(&bytes)?;

        let table = load_survey(file.path(), "windows-1252")?;
        let record = &table.records()[0];
        assert_eq!(record.location, "Thiès");
        assert_eq!(record.staff_size, "10 à 20");
        assert_eq!(table.encoding(), "windows-1252");
        Ok(())
    }

    #[test]
    fn test_load__undecodable_bytes() -> TestResult {
        let mut bytes = header().into_bytes();
        bytes.extend_from_slice(b"\nE1,\xFF\xFE\xFD");
        let file = write_csv(&bytes)?;

        assert!(matches!(
            load_survey(file.path(), "utf-8"),
            Err(HygieneError::Undecodable { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load__unknown_encoding_label() -> TestResult {
        let file = write_csv(header().as_bytes())?;
        let err = load_survey(file.path(), "not-an-encoding").unwrap_err();
        assert!(matches!(err, HygieneError::UnknownEncoding(_)));
        Ok(())
    }

    #[test]
    fn test_source__reuses_unchanged_file() -> TestResult {
        let file = write_csv([header(), row("E1", "Dakar", "Oui")].join("\n").as_bytes())?;
        let mut source = SurveySource::new();

        let first = source.load(file.path(), "utf-8")?;
        let second = source.load(file.path(), "utf-8")?;
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads(), 1);
        Ok(())
    }

    #[test]
    fn test_source__reloads_after_change() -> TestResult {
        let file = write_csv([header(), row("E1", "Dakar", "Oui")].join("\n").as_bytes())?;
        let mut source = SurveySource::new();
        source.load(file.path(), "utf-8")?;

        fs::write(
            file.path(),
            [header(), row("E1", "Dakar", "Oui"), row("E2", "Thiès", "Non")].join("\n"),
        )?;
        let table = source.load(file.path(), "utf-8")?;
        assert_eq!(table.records().len(), 2);
        assert_eq!(source.reads(), 2);
        Ok(())
    }

    #[test]
    fn test_source__encoding_is_part_of_key() -> TestResult {
        let file = write_csv([header(), row("E1", "Dakar", "Oui")].join("\n").as_bytes())?;
        let mut source = SurveySource::new();
        source.load(file.path(), "utf-8")?;
        source.load(file.path(), "latin1")?;
        assert_eq!(source.reads(), 2);
        Ok(())
    }
}
