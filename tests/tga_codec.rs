//! Integration tests for the TGA codec and format registry

use rfimage::{
    Bitmap, Bitmap32, Bitmap8, CodecConfig, ColorFormat, Endian, Error, ImageFormat, ImageFormats, ImageFrame, Rgba, Tga,
};
use std::io::Cursor;

/// Build a bottom-up 24-bit TGA with an image ID, as most tools write them.
fn bottom_up_rgb(width: u16, height: u16, rows: &[Vec<Rgba>]) -> Vec<u8> {
    let id = b"rfimage";
    let mut out = vec![0u8; 18];
    out[0] = id.len() as u8;
    out[2] = 2;
    out[12..14].copy_from_slice(&width.to_le_bytes());
    out[14..16].copy_from_slice(&height.to_le_bytes());
    out[16] = 24;
    out.extend_from_slice(id);
    for row in rows.iter().rev() {
        out.extend(ColorFormat::BGR.encode(row, Endian::Little));
    }
    out
}

#[test]
fn decodes_bottom_up_24_bit_with_image_id() {
    let top = vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 255, 0)];
    let bottom = vec![Rgba::rgb(0, 0, 255), Rgba::rgb(10, 20, 30)];
    let data = bottom_up_rgb(2, 2, &[top.clone(), bottom.clone()]);

    let formats = ImageFormats::default();
    let (format, info) = formats.sniff(&data).expect("sniff");
    assert_eq!(format.name(), "tga");
    assert_eq!((info.width, info.height, info.bits_per_pixel), (2, 2, 24));

    let bmp = formats.read_bitmap(&data).unwrap().to_bitmap32();
    assert_eq!(bmp.get(0, 0), Some(top[0]));
    assert_eq!(bmp.get(1, 0), Some(top[1]));
    assert_eq!(bmp.get(0, 1), Some(bottom[0]));
    assert_eq!(bmp.get(1, 1), Some(bottom[1]));
}

#[test]
fn round_trip_preserves_alpha() {
    let mut bmp = Bitmap32::new(3, 2);
    bmp.set(0, 0, Rgba::pack(1, 2, 3, 4));
    bmp.set(2, 1, Rgba::pack(200, 100, 50, 0));
    let formats = ImageFormats::default();
    let bytes = formats.encode("TGA", &[ImageFrame::new(bmp.clone())]).unwrap();
    assert_eq!(formats.read_bitmap(&bytes).unwrap(), Bitmap::Rgba32(bmp));
}

#[test]
fn truncated_pixels_are_reported() {
    let data = bottom_up_rgb(2, 2, &[vec![Rgba::rgb(1, 1, 1); 2], vec![Rgba::rgb(2, 2, 2); 2]]);
    let cut = &data[..data.len() - 1];
    let err = ImageFormats::default().read_frames(cut).unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { .. }), "{:?}", err);
}

#[test]
fn rle_and_indexed_are_rejected() {
    let mut rle = bottom_up_rgb(1, 1, &[vec![Rgba::rgb(0, 0, 0)]]);
    rle[2] = 10;
    assert!(matches!(Tga.read_frames(&mut Cursor::new(&rle)), Err(Error::UnsupportedFeature(_))));
    // the registry only sees a header nobody accepts
    let formats = ImageFormats::default();
    assert!(formats.sniff(&rle).is_none());
    assert!(matches!(formats.read_frames(&rle), Err(Error::UnsupportedFormat(_))));

    let indexed = Bitmap8::new(2, 2);
    assert!(matches!(
        formats.encode("tga", &[ImageFrame::new(indexed)]),
        Err(Error::UnsupportedFeature(_))
    ));
}

#[test]
fn empty_frame_list_cannot_be_encoded() {
    assert!(matches!(ImageFormats::default().encode("tga", &[]), Err(Error::NoFrames)));
}

#[test]
fn config_limits_apply_to_registry_decodes() {
    let cfg = CodecConfig::from_json_str(r#"{"max_width": 1, "max_height": 1}"#).unwrap();
    let formats = ImageFormats::with_config(cfg).unwrap();
    let data = bottom_up_rgb(2, 1, &[vec![Rgba::rgb(0, 0, 0); 2]]);
    assert!(matches!(formats.read_frames(&data), Err(Error::LimitExceeded { width: 2, height: 1 })));
}
