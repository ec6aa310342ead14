use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use edfio::{header_size, EdfError, EdfFile, FormatVariant, Signal};

fn cleanup_test_file(filename: &str) {
    let _ = std::fs::remove_file(filename);
}

fn test_start() -> NaiveDateTime {
    NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2021, 7, 3).unwrap(),
        NaiveTime::from_hms_opt(9, 30, 15).unwrap(),
    )
}

fn create_test_eeg_signal(variant: FormatVariant) -> Signal {
    Signal::new_full(
        variant,
        "EEG Fpz-Cz",
        "AgAgCl cup electrodes",
        "uV",
        -440.0,
        510.0,
        -2048,
        2047,
        "HP:0.1Hz LP:75Hz N:50Hz",
        4,
    )
    .unwrap()
}

fn create_test_resp_signal(variant: FormatVariant) -> Signal {
    Signal::new_full(
        variant,
        "Resp oro-nasal",
        "thermistor",
        "degC",
        20.0,
        40.0,
        0,
        1023,
        "LP:0.5Hz",
        2,
    )
    .unwrap()
}

#[test]
fn test_write_read_cycle_edf() {
    let filename = "test_roundtrip_cycle.edf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new(filename);
    file.header_mut().set_patient("P001 F 01-JAN-1990 Doe").unwrap();
    file.header_mut()
        .set_recording("Startdate 03-JUL-2021 PSG")
        .unwrap();
    file.header_mut().set_start(test_start());
    file.header_mut().set_record_duration(0.5).unwrap();

    let mut eeg = create_test_eeg_signal(FormatVariant::Edf);
    let mut resp = create_test_resp_signal(FormatVariant::Edf);
    let eeg_samples = [0, 100, -100, 2047, -2048, 17, -17, 3];
    let resp_samples = [0, 1023, 512, 256];
    for value in eeg_samples {
        eeg.append_digital(value).unwrap();
    }
    for value in resp_samples {
        resp.append_digital(value).unwrap();
    }
    file.add_signal(eeg).unwrap();
    file.add_signal(resp).unwrap();

    file.create().unwrap();

    let mut copy = EdfFile::new(filename);
    let nread = copy.read().unwrap();
    // header + 2 records x (4 + 2) samples x 2 bytes
    assert_eq!(nread, header_size(2) + 2 * 6 * 2);

    let header = copy.header();
    assert!(header.is_edf());
    assert_eq!(header.patient(), "P001 F 01-JAN-1990 Doe");
    assert_eq!(header.recording(), "Startdate 03-JUL-2021 PSG");
    assert_eq!(header.start(), test_start());
    assert_eq!(header.num_records(), 2);
    assert_eq!(header.record_duration(), 0.5);

    assert_eq!(copy.signals().len(), 2);
    let eeg = &copy.signals()[0];
    assert_eq!(eeg.label(), "EEG Fpz-Cz");
    assert_eq!(eeg.transducer(), "AgAgCl cup electrodes");
    assert_eq!(eeg.physical_dimension(), "uV");
    assert_eq!(eeg.physical_min(), -440.0);
    assert_eq!(eeg.physical_max(), 510.0);
    assert_eq!(eeg.digital_min(), -2048);
    assert_eq!(eeg.digital_max(), 2047);
    assert_eq!(eeg.prefiltering(), "HP:0.1Hz LP:75Hz N:50Hz");
    assert_eq!(eeg.samples_per_record(), 4);
    assert_eq!(eeg.digital_values(), eeg_samples.to_vec());

    let resp = &copy.signals()[1];
    assert_eq!(resp.label(), "Resp oro-nasal");
    assert_eq!(resp.digital_values(), resp_samples.to_vec());

    // decoded physical sequence matches the calibration
    let values = resp.values();
    assert!((values[0] - 20.0).abs() < 1e-9);
    assert!((values[1] - 40.0).abs() < 1e-9);

    cleanup_test_file(filename);
}

#[test]
fn test_write_read_cycle_bdf() {
    let filename = "test_roundtrip_cycle.bdf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new_bdf(filename);
    file.header_mut().set_patient("B001").unwrap();
    file.header_mut().set_start(test_start());

    let mut signal = Signal::new_full(
        FormatVariant::Bdf,
        "EEG A1",
        "active electrode",
        "uV",
        -262144.0,
        262143.0,
        -8_388_608,
        8_388_607,
        "",
        3,
    )
    .unwrap();
    let samples = [-8_388_608, 8_388_607, 0, -1, 1, 123_456];
    for value in samples {
        signal.append_digital(value).unwrap();
    }
    file.add_signal(signal).unwrap();
    file.create().unwrap();

    let mut copy = EdfFile::new_bdf(filename);
    let nread = copy.read().unwrap();
    assert_eq!(nread, header_size(1) + 2 * 3 * 3);

    assert_eq!(copy.header().version(), -255);
    assert_eq!(copy.header().reserved(), "24BIT");
    assert_eq!(copy.signals()[0].digital_values(), samples.to_vec());

    cleanup_test_file(filename);
}

#[test]
fn test_create_fails_when_file_exists() {
    let filename = "test_roundtrip_exists.edf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new(filename);
    file.create().unwrap();

    let err = file.create().unwrap_err();
    assert!(matches!(err, EdfError::FileExists(_)));

    // replace truncates and succeeds where create refuses
    file.add_signal(create_test_eeg_signal(FormatVariant::Edf))
        .unwrap();
    file.replace().unwrap();

    let mut copy = EdfFile::new(filename);
    copy.read().unwrap();
    assert_eq!(copy.signals().len(), 1);

    cleanup_test_file(filename);
}

#[test]
fn test_out_of_sync_signals_abort_after_header() {
    let filename = "test_roundtrip_out_of_sync.edf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new(filename);
    let mut a = create_test_eeg_signal(FormatVariant::Edf);
    let mut b = create_test_eeg_signal(FormatVariant::Edf);
    for value in 0..60 * 4 {
        a.append_digital(value % 100).unwrap();
    }
    for value in 0..59 * 4 {
        b.append_digital(value % 100).unwrap();
    }
    file.add_signal(a).unwrap();
    file.add_signal(b).unwrap();

    let err = file.create().unwrap_err();
    assert!(matches!(
        err,
        EdfError::RecordsOutOfSync {
            signal: 1,
            expected: 60,
            actual: 59,
        }
    ));

    // the header went out, no record bytes followed
    let on_disk = std::fs::metadata(filename).unwrap().len();
    assert_eq!(on_disk, header_size(2) as u64);

    cleanup_test_file(filename);
}

#[test]
fn test_read_missing_file() {
    let mut file = EdfFile::new("test_roundtrip_no_such_file.edf");
    assert!(matches!(file.read(), Err(EdfError::FileNotFound(_))));
}

#[test]
fn test_partial_tail_record_is_zero_padded() {
    let filename = "test_roundtrip_tail.edf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new(filename);
    let mut signal = create_test_eeg_signal(FormatVariant::Edf);
    // 6 samples with 4 per record: 2 records, tail half full
    for value in [5, 6, 7, 8, 9, 10] {
        signal.append_digital(value).unwrap();
    }
    assert_eq!(signal.num_records(), 2);
    file.add_signal(signal).unwrap();
    file.create().unwrap();

    let mut copy = EdfFile::new(filename);
    copy.read().unwrap();
    assert_eq!(copy.header().num_records(), 2);
    assert_eq!(
        copy.signals()[0].digital_values(),
        vec![5, 6, 7, 8, 9, 10, 0, 0]
    );

    cleanup_test_file(filename);
}

#[test]
fn test_add_signal_format_must_match() {
    let mut file = EdfFile::new("test_roundtrip_mismatch.edf");
    let err = file
        .add_signal(Signal::new(FormatVariant::Bdf))
        .unwrap_err();
    assert!(matches!(err, EdfError::FormatMismatch));
    assert!(file.signals().is_empty());
}

#[test]
fn test_add_signal_count_upper_bound() {
    let mut file = EdfFile::new("test_roundtrip_max_signals.edf");
    for _ in 0..9998 {
        file.add_signal(Signal::new(FormatVariant::Edf)).unwrap();
    }
    let err = file
        .add_signal(Signal::new(FormatVariant::Edf))
        .unwrap_err();
    assert!(matches!(err, EdfError::InvalidSignalCount(9999)));
    assert_eq!(file.signals().len(), 9998);
}

#[test]
fn test_set_path_retargets_file() {
    let first = "test_roundtrip_retarget_a.edf";
    let second = "test_roundtrip_retarget_b.edf";
    cleanup_test_file(first);
    cleanup_test_file(second);

    let mut file = EdfFile::new(first);
    file.create().unwrap();
    file.set_path(second);
    file.create().unwrap();

    assert!(std::path::Path::new(first).exists());
    assert!(std::path::Path::new(second).exists());

    cleanup_test_file(first);
    cleanup_test_file(second);
}

#[test]
fn test_empty_file_roundtrip() {
    let filename = "test_roundtrip_empty.edf";
    cleanup_test_file(filename);

    let mut file = EdfFile::new(filename);
    file.create().unwrap();

    let mut copy = EdfFile::new(filename);
    let nread = copy.read().unwrap();
    assert_eq!(nread, header_size(0));
    assert!(copy.signals().is_empty());
    assert_eq!(copy.header().num_records(), -1);

    cleanup_test_file(filename);
}
