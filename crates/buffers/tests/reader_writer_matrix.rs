//! Writer/Reader matrix for the big-endian primitives.

use imod_buffers::{BufferError, Reader, Writer};
use proptest::prelude::*;

#[test]
fn roundtrip_signed_matrix() {
    let mut w = Writer::new();
    w.i8(i8::MIN);
    w.i16(-1000);
    w.i32(i32::MIN);
    w.i32(-25);
    w.i32(i32::MAX);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.i8().unwrap(), i8::MIN);
    assert_eq!(r.i16().unwrap(), -1000);
    assert_eq!(r.i32().unwrap(), i32::MIN);
    assert_eq!(r.i32().unwrap(), -25);
    assert_eq!(r.i32().unwrap(), i32::MAX);
    assert!(r.is_empty());
}

#[test]
fn float_sequences_roundtrip() {
    let points = vec![[64.333336f32, 64.666664, 80.0], [47.0, 77.333336, 80.0]];
    let mut w = Writer::new();
    for p in &points {
        w.f32x3(*p);
    }
    w.f32(0.5);
    let data = w.flush();
    assert_eq!(data.len(), 28);
    let mut r = Reader::new(&data);
    assert_eq!(r.f32x3_seq(2).unwrap(), points);
    assert_eq!(r.f32_seq(1).unwrap(), vec![0.5]);
}

#[test]
fn i32_sequence_reports_shortfall() {
    let mut w = Writer::new();
    w.i32(1);
    w.i32(2);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(
        r.i32_seq(3),
        Err(BufferError::EndOfBuffer {
            offset: 0,
            needed: 12,
            available: 8,
        })
    );
}

#[test]
fn patch_back_fills_size() {
    let mut w = Writer::new();
    w.buf(b"SIZE");
    let at = w.len();
    w.u32(0);
    w.f32(1.0);
    w.f32(2.0);
    let body = (w.len() - at - 4) as u32;
    w.patch_u32(at, body);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.buf(4).unwrap(), b"SIZE");
    assert_eq!(r.u32().unwrap(), 8);
}

proptest! {
    #[test]
    fn any_short_read_fails_cleanly(data in proptest::collection::vec(any::<u8>(), 0..3)) {
        let mut r = Reader::new(&data);
        prop_assert!(r.u32().is_err());
        prop_assert_eq!(r.x, 0);
    }

    #[test]
    fn fixed_str_roundtrip(text in "[a-zA-Z0-9 _-]{0,32}") {
        let mut w = Writer::new();
        w.fixed_str(&text, 32).unwrap();
        let data = w.flush();
        prop_assert_eq!(data.len(), 32);
        prop_assert_eq!(&data[..text.len()], text.as_bytes());
        prop_assert!(data[text.len()..].iter().all(|&b| b == 0));
    }
}
