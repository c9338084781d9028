use inkkey_core::*;

fn levels_from(zones: &[Cmyk]) -> InkLevels {
    let mut levels = InkLevels::with_capacity(zones.len());
    for &zone in zones {
        levels.push(zone);
    }
    levels
}

#[test]
fn test_summary_empty_levels() {
    let result = calculate_summary(&InkLevels::default());
    assert!(result.is_err());
    match result {
        Err(InkError::Config(msg)) => assert!(msg.contains("No ink keys")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_summary_means_and_peaks() {
    let levels = levels_from(&[
        Cmyk::new(10, 0, 50, 0),
        Cmyk::new(30, 80, 50, 0),
        Cmyk::new(20, 40, 50, 9),
    ]);
    let summary = calculate_summary(&levels).unwrap();

    assert_eq!(summary.num_keys, 3);
    assert_eq!(summary.channels.len(), 4);

    let cyan = &summary.channels[0];
    assert_eq!(cyan.channel, Channel::Cyan);
    assert!((cyan.mean - 20.0).abs() < 1e-5);
    assert_eq!(cyan.peak_zone, 2);
    assert_eq!(cyan.peak_value, 30);

    let magenta = &summary.channels[1];
    assert!((magenta.mean - 40.0).abs() < 1e-5);
    assert_eq!(magenta.peak_zone, 2);
    assert_eq!(magenta.peak_value, 80);

    // Ties resolve to the first zone
    let yellow = &summary.channels[2];
    assert_eq!(yellow.peak_zone, 1);
    assert_eq!(yellow.peak_value, 50);

    let black = &summary.channels[3];
    assert!((black.mean - 3.0).abs() < 1e-5);
    assert_eq!(black.peak_zone, 3);

    assert!((summary.total_coverage - 113.0).abs() < 1e-4);
}

#[test]
fn test_summary_of_blank_plate() {
    let levels = levels_from(&[Cmyk::WHITE; 5]);
    let summary = calculate_summary(&levels).unwrap();
    assert_eq!(summary.total_coverage, 0.0);
    for channel in &summary.channels {
        assert_eq!(channel.peak_zone, 1);
        assert_eq!(channel.peak_value, 0);
    }
}
