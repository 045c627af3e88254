// Tests for DMS <-> decimal degree conversion through the public API
use image_inspector::geo::{
    Axis, GeoError, Hemisphere, Rational, decimal_to_dms, dms_to_decimal, dms_to_decimal_str,
    parse_dms,
};

fn exif_parts(parts: [(u32, u32); 3]) -> [Rational; 3] {
    parts.map(|(num, den)| Rational::from_u32(num, den).expect("non-zero denominator"))
}

#[test]
fn empire_state_latitude() {
    let decimal = dms_to_decimal(exif_parts([(40, 1), (26, 1), (46, 1)]), Hemisphere::North);
    assert!((decimal - 40.446111).abs() < 1e-6);
}

#[test]
fn western_longitude_is_negative() {
    let decimal = dms_to_decimal_str(exif_parts([(73, 1), (59, 1), (11, 1)]), "W").unwrap();
    assert!((decimal + 73.986389).abs() < 1e-6);
}

#[test]
fn camera_style_fractional_seconds() {
    // 常见相机写法：秒以 1/100 为单位
    let decimal = dms_to_decimal(exif_parts([(51, 1), (30, 1), (2634, 100)]), Hemisphere::North);
    assert!((decimal - (51.0 + 30.0 / 60.0 + 26.34 / 3600.0)).abs() < 1e-12);
    assert_eq!(decimal_to_dms(decimal, Axis::Latitude), "51° 30' 26.34\" N");
}

#[test]
fn tiny_negative_latitude_points_south() {
    let rendered = decimal_to_dms(-0.0001, Axis::Latitude);
    assert!(rendered.ends_with('S'), "{rendered}");
    assert!(rendered.starts_with("0° 0' "));
}

#[test]
fn readable_string_parses_back() {
    let text = decimal_to_dms(-33.868820, Axis::Latitude);
    let parsed = parse_dms(&text).unwrap();
    assert_eq!(parsed.reference, Hemisphere::South);
    assert!((parsed.to_decimal() + 33.868820).abs() <= 4e-6);
}

#[test]
fn invalid_inputs_are_errors() {
    assert!(matches!(Rational::from_u32(1, 0), Err(GeoError::ZeroDenominator)));
    assert!(matches!(
        dms_to_decimal_str(exif_parts([(1, 1), (0, 1), (0, 1)]), "Q"),
        Err(GeoError::InvalidCoordinateRef(_))
    ));
    assert!(matches!(parse_dms("north-ish"), Err(GeoError::InvalidDms(_))));
}
