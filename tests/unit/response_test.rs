//! Unit tests for result encoding

use render_sweep_gateway::response::{base64, encode_image};

#[test]
fn test_base64_encode_decode() {
    let original = b"Hello, World!";
    let encoded = base64::encode(original);
    let decoded = base64::decode(&encoded).unwrap();

    assert_eq!(original.as_slice(), decoded.as_slice());
}

#[test]
fn test_base64_decode_data_url() {
    let data_url = "data:image/png;base64,SGVsbG8sIFdvcmxkIQ==";
    let decoded = base64::decode(data_url).unwrap();

    assert_eq!(b"Hello, World!", decoded.as_slice());
}

#[test]
fn test_base64_decode_rejects_garbage() {
    assert!(base64::decode("not valid base64!!!").is_err());
}

#[test]
fn test_encode_image_round_trip() {
    // PNG signature followed by every byte value
    let mut frame = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    frame.extend(0..=255u8);

    let payload = encode_image(&frame);
    assert!(payload.starts_with("data:image/png;base64,"));
    assert_eq!(base64::get_format_from_data_url(&payload), Some("png"));
    assert_eq!(base64::decode(&payload).unwrap(), frame);
}

#[test]
fn test_create_data_url_other_format() {
    let data_url = base64::create_data_url(b"test data", "webp");

    assert!(data_url.starts_with("data:image/webp;base64,"));
    assert_eq!(base64::decode(&data_url).unwrap(), b"test data");
}
