//! Tests for FileStream implementation

#[cfg(feature = "stream-file")]
mod tests {
    use fallsense_core::{
        dataset::{Dataset, FALL, NO_FALL},
        fields::SensorField,
        stream::{FileFormat, FileStream, Stream, StreamError},
        InvalidInputError,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "TIMESTAMP,ACC_X,ACC_Y,ACC_Z,JERK_X,JERK_Y,JERK_Z,GYRO_X,GYRO_Y,GYRO_Z,PITCH,ROLL,SVM,ACC_MAG,JERK_MAG,GYRO_MAG";

    fn row(ts: u64, base: f32, jerk_mag: f32) -> String {
        let mut cells = vec![ts.to_string()];
        cells.extend((0..12).map(|i| format!("{:.2}", base + i as f32 * 0.1)));
        cells.push(format!("{:.2}", base));
        cells.push(format!("{:.2}", jerk_mag));
        cells.push(format!("{:.2}", base * 2.0));
        cells.join(",")
    }

    #[test]
    fn test_csv_parsing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", HEADER).unwrap();
        writeln!(temp_file, "{}", row(1000, 0.5, 0.3)).unwrap();
        writeln!(temp_file, "{}", row(1020, 0.6, 7.5)).unwrap();
        temp_file.flush().unwrap();

        let mut stream = FileStream::from_csv(temp_file.path()).unwrap();
        assert_eq!(stream.columns().len(), 15);
        assert!(!stream.has_labels());

        let first = stream.poll_next().unwrap();
        assert_eq!(first.sample.timestamp, Some(1000));
        assert_eq!(first.sample.get(SensorField::AccX), 0.5);
        assert_eq!(first.sample.get(SensorField::JerkMag), 0.3);
        assert_eq!(first.label, None);

        let second = stream.poll_next().unwrap();
        assert_eq!(second.sample.get(SensorField::JerkMag), 7.5);

        match stream.poll_next() {
            Err(nb::Error::Other(StreamError::EndOfStream)) => {}
            _ => panic!("Expected EndOfStream"),
        }
        assert_eq!(stream.stats().rows_read, 2);
    }

    #[test]
    fn test_label_column_and_column_order() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "label,jerk_mag,Notes,svm").unwrap();
        writeln!(temp_file, "0,0.2,walking,1.0").unwrap();
        writeln!(temp_file, "1,9.4,fell,3.1").unwrap();
        writeln!(temp_file, "1.0,0.1,,1.1").unwrap();
        temp_file.flush().unwrap();

        let dataset = FileStream::read_dataset(temp_file.path(), FileFormat::Csv).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.labels(), Some(&[NO_FALL, FALL, FALL][..]));
        assert_eq!(dataset.fields(), vec![SensorField::Svm, SensorField::JerkMag]);
        assert_eq!(dataset.column(SensorField::Svm).unwrap(), vec![1.0, 3.1, 1.1]);
        assert_eq!(
            dataset.column(SensorField::AccX),
            Err(InvalidInputError::MissingField { field: SensorField::AccX })
        );
    }

    #[test]
    fn test_csv_with_errors() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "JERK_MAG,SVM,LABEL").unwrap();
        writeln!(temp_file, "0.5,1.0,0").unwrap();
        writeln!(temp_file, "0.7").unwrap(); // Too few cells
        writeln!(temp_file, "0.9,1.2,maybe").unwrap(); // Bad label
        writeln!(temp_file, "n/a,1.3,0").unwrap(); // Missing value, row kept
        writeln!(temp_file, "0.4,1.1,1").unwrap();
        temp_file.flush().unwrap();

        let mut stream = FileStream::from_csv(temp_file.path()).unwrap();
        let columns = stream.columns();
        let dataset = Dataset::from_stream(&mut stream, &columns).unwrap();

        assert_eq!(dataset.len(), 3);
        let stats = stream.stats();
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.parse_errors, 2);
        assert_eq!(stats.missing_cells, 1);

        // The missing cell surfaces when the column is used
        assert_eq!(
            dataset.column(SensorField::JerkMag),
            Err(InvalidInputError::NonFiniteValue { field: SensorField::JerkMag, row: 1 })
        );
    }

    #[test]
    fn test_tsv_parsing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ACC_MAG\tGYRO_MAG").unwrap();
        writeln!(temp_file, "1.01\t3.5").unwrap();
        temp_file.flush().unwrap();

        let dataset = FileStream::read_dataset(temp_file.path(), FileFormat::Tsv).unwrap();
        assert_eq!(dataset.column(SensorField::GyroMag).unwrap(), vec![3.5]);
        assert!(dataset.labels().is_none());
    }

    #[test]
    fn test_header_without_sensor_columns() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "timestamp,temperature").unwrap();
        writeln!(temp_file, "1,20.5").unwrap();
        temp_file.flush().unwrap();

        match FileStream::from_csv(temp_file.path()) {
            Err(StreamError::Format(_)) => {}
            _ => panic!("Expected format error"),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileStream::from_csv("/nonexistent/recording.csv"),
            Err(StreamError::Transport(_))
        ));
    }
}
