// Tests for EXIF GPS extraction from synthetic JPEG / PNG / TIFF containers
use image_inspector::geo::{GeoError, Hemisphere, read_gps};

type Dms = [(u32, u32); 3];

struct GpsTiff {
    little_endian: bool,
    lat_ref: &'static str,
    lat: Dms,
    lon_ref: &'static str,
    lon: Dms,
}

impl GpsTiff {
    fn new_york() -> Self {
        Self {
            little_endian: true,
            lat_ref: "N",
            lat: [(40, 1), (26, 1), (46, 1)],
            lon_ref: "W",
            lon: [(73, 1), (59, 1), (11, 1)],
        }
    }

    fn u16(&self, out: &mut Vec<u8>, value: u16) {
        if self.little_endian {
            out.extend(value.to_le_bytes());
        } else {
            out.extend(value.to_be_bytes());
        }
    }

    fn u32(&self, out: &mut Vec<u8>, value: u32) {
        if self.little_endian {
            out.extend(value.to_le_bytes());
        } else {
            out.extend(value.to_be_bytes());
        }
    }

    fn ascii_entry(&self, out: &mut Vec<u8>, tag: u16, text: &str) {
        self.u16(out, tag);
        self.u16(out, 2);
        self.u32(out, text.len() as u32 + 1);
        let mut inline = [0u8; 4];
        inline[..text.len()].copy_from_slice(text.as_bytes());
        out.extend(inline);
    }

    fn rational_entry(&self, out: &mut Vec<u8>, tag: u16, offset: u32) {
        self.u16(out, tag);
        self.u16(out, 5);
        self.u32(out, 3);
        self.u32(out, offset);
    }

    /// header(8) | IFD0 @8 (18) | GPS IFD @26 (54) | lat @80 (24) | lon @104 (24)
    fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(if self.little_endian { b"II" } else { b"MM" });
        self.u16(&mut out, 42);
        self.u32(&mut out, 8);

        self.u16(&mut out, 1);
        self.u16(&mut out, 0x8825);
        self.u16(&mut out, 4);
        self.u32(&mut out, 1);
        self.u32(&mut out, 26);
        self.u32(&mut out, 0);

        self.u16(&mut out, 4);
        self.ascii_entry(&mut out, 1, self.lat_ref);
        self.rational_entry(&mut out, 2, 80);
        self.ascii_entry(&mut out, 3, self.lon_ref);
        self.rational_entry(&mut out, 4, 104);
        self.u32(&mut out, 0);

        for (num, den) in self.lat.iter().chain(self.lon.iter()) {
            self.u32(&mut out, *num);
            self.u32(&mut out, *den);
        }
        assert_eq!(out.len(), 128);
        out
    }
}

fn wrap_in_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8];
    // 先放一个 APP0，确认扫描会跳过无关段
    jpeg.extend([0xFF, 0xE0, 0x00, 0x07, b'J', b'F', b'I', b'F', 0x00]);
    let length = (2 + 6 + tiff.len()) as u16;
    jpeg.extend([0xFF, 0xE1]);
    jpeg.extend(length.to_be_bytes());
    jpeg.extend(b"Exif\0\0");
    jpeg.extend(tiff);
    jpeg.extend([0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
    jpeg
}

fn wrap_in_png(tiff: &[u8]) -> Vec<u8> {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend((tiff.len() as u32).to_be_bytes());
    png.extend(b"eXIf");
    png.extend(tiff);
    png.extend([0, 0, 0, 0]);
    png.extend(0u32.to_be_bytes());
    png.extend(b"IEND");
    png.extend([0, 0, 0, 0]);
    png
}

#[test]
fn reads_gps_from_jpeg_app1() {
    let fix = read_gps(&wrap_in_jpeg(&GpsTiff::new_york().build())).expect("gps");
    let (lat, lon) = fix.to_decimal();

    assert!((lat - 40.446111).abs() < 1e-6);
    assert!((lon + 73.986389).abs() < 1e-6);
    assert_eq!(fix.latitude.reference, Hemisphere::North);
    assert_eq!(
        fix.readable(),
        ("40° 26' 46.00\" N".to_string(), "73° 59' 11.00\" W".to_string())
    );
}

#[test]
fn reads_big_endian_tiff() {
    let tiff = GpsTiff {
        little_endian: false,
        lat_ref: "S",
        lat: [(33, 1), (5206, 100), (0, 1)],
        lon_ref: "E",
        lon: [(151, 1), (12, 1), (3000, 100)],
    }
    .build();

    let (lat, lon) = read_gps(&tiff).expect("gps").to_decimal();
    assert!((lat + (33.0 + 52.06 / 60.0)).abs() < 1e-9);
    assert!((lon - (151.0 + 12.0 / 60.0 + 30.0 / 3600.0)).abs() < 1e-9);
}

#[test]
fn reads_gps_from_png_exif_chunk() {
    let fix = read_gps(&wrap_in_png(&GpsTiff::new_york().build())).expect("gps");
    assert_eq!(fix.longitude.reference, Hemisphere::West);
}

#[test]
fn zero_denominator_is_rejected() {
    let tiff = GpsTiff {
        lat: [(40, 0), (26, 1), (46, 1)],
        ..GpsTiff::new_york()
    }
    .build();
    assert!(matches!(read_gps(&tiff), Err(GeoError::ZeroDenominator)));
}

#[test]
fn swapped_reference_is_rejected() {
    let tiff = GpsTiff {
        lat_ref: "E",
        ..GpsTiff::new_york()
    }
    .build();
    assert!(matches!(read_gps(&tiff), Err(GeoError::InvalidCoordinateRef(_))));
}

#[test]
fn truncated_exif_is_malformed() {
    let tiff = GpsTiff::new_york().build();
    assert!(matches!(read_gps(&tiff[..90]), Err(GeoError::MalformedExif(_))));
}

#[test]
fn image_without_exif_reports_no_exif() {
    let mut png = Vec::new();
    image::DynamicImage::new_rgb8(2, 2)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode png");
    assert!(matches!(read_gps(&png), Err(GeoError::NoExif)));
}
