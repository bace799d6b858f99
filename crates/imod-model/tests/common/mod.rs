#![allow(dead_code)]

//! Hand-assembled model files.
//!
//! Everything here writes raw bytes with the buffers crate directly, so the
//! fixtures do not depend on the encoder under test.

use imod_buffers::Writer;

pub const END: i32 = -1;
pub const BGNTRI: i32 = -4;
pub const ENDTRI: i32 = -5;
pub const BGNPOLY: i32 = -21;
pub const ENDPOLY: i32 = -22;
pub const BGNPOLYNORM2: i32 = -25;

/// First five points of the documented two-contour example.
pub const EXAMPLE_POINTS: [[f32; 3]; 5] = [
    [64.333336, 64.666664, 80.0],
    [47.0, 77.333336, 80.0],
    [51.333332, 45.666668, 80.0],
    [87.333336, 49.666668, 80.0],
    [76.0, 82.0, 80.0],
];

pub fn header(w: &mut Writer, dims: [i32; 3], objects: i32) {
    w.buf(b"IMODV1.2");
    w.fixed_str("IMOD-NewModel", 128).unwrap();
    for d in dims {
        w.i32(d);
    }
    w.i32(objects);
    w.u32(0x0000_f000); // flags
    w.i32(1); // drawmode
    w.i32(2); // mousemode
    w.i32(0);
    w.i32(255);
    w.f32x3([0.0, 0.0, 0.0]);
    w.f32x3([1.0, 1.0, 1.0]);
    w.i32(0);
    w.i32(1);
    w.i32(-1);
    w.i32(3);
    w.i32(128);
    w.f32(1.0);
    w.i32(-9);
    w.i32(0);
    w.f32(0.0);
    w.f32(0.0);
    w.f32(0.0);
}

/// A file made of the given chunks, closed with `IEOF`.
pub fn file(dims: [i32; 3], objects: i32, chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut w = Writer::new();
    header(&mut w, dims, objects);
    for chunk in chunks {
        w.buf(chunk);
    }
    w.buf(b"IEOF");
    w.flush()
}

pub fn objt(name: &str, contours: i32, meshes: i32) -> Vec<u8> {
    let mut w = Writer::new();
    w.buf(b"OBJT");
    w.fixed_str(name, 64).unwrap();
    for i in 0..16u32 {
        w.u32(i * 3);
    }
    w.i32(contours);
    w.u32(0x0000_0402);
    w.i32(0);
    w.i32(1);
    w.f32x3([0.0, 1.0, 0.5]);
    w.i32(0);
    w.buf(&[1, 3, 1, 1, 0, 0, 0, 0]);
    w.i32(meshes);
    w.i32(0);
    w.flush()
}

pub fn cont(points: &[[f32; 3]]) -> Vec<u8> {
    let mut w = Writer::new();
    w.buf(b"CONT");
    w.i32(points.len() as i32);
    w.u32(0);
    w.i32(0);
    w.i32(0);
    for p in points {
        w.f32x3(*p);
    }
    w.flush()
}

pub fn mesh(vertices: &[[f32; 3]], tokens: &[i32]) -> Vec<u8> {
    let mut w = Writer::new();
    w.buf(b"MESH");
    w.i32(vertices.len() as i32);
    w.i32(tokens.len() as i32);
    w.u32(0);
    w.i16(0);
    w.i16(0);
    for v in vertices {
        w.f32x3(*v);
    }
    for t in tokens {
        w.i32(*t);
    }
    w.flush()
}

pub fn sized(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.buf(tag);
    w.u32(body.len() as u32);
    w.buf(body);
    w.flush()
}

pub fn size_chunk(sizes: &[f32]) -> Vec<u8> {
    let mut w = Writer::new();
    for s in sizes {
        w.f32(*s);
    }
    sized(b"SIZE", &w.flush())
}

/// Storage body of type-10 records with an i32 index and an f32 value.
pub fn value_records(pairs: &[(i32, f32)]) -> Vec<u8> {
    let mut w = Writer::new();
    for (index, value) in pairs {
        w.i16(10);
        w.i16(4);
        w.i32(*index);
        w.f32(*value);
    }
    w.flush()
}

pub fn slan(time: i32, angles: [f32; 3], center: [f32; 3], label: &str) -> Vec<u8> {
    let mut w = Writer::new();
    w.i32(time);
    w.f32x3(angles);
    w.f32x3(center);
    w.fixed_str(label, 32).unwrap();
    sized(b"SLAN", &w.flush())
}

pub fn minx() -> Vec<u8> {
    let mut w = Writer::new();
    for v in [
        [1.0, 1.0, 1.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [2.0, 2.0, 1.0],
        [5.5, -3.0, 0.0],
        [0.0, 0.0, 90.0],
    ] {
        w.f32x3(v);
    }
    sized(b"MINX", &w.flush())
}

/// One object holding one contour of [`EXAMPLE_POINTS`].
pub fn contour_example() -> Vec<u8> {
    file(
        [956, 924, 300],
        1,
        &[objt("", 1, 0), cont(&EXAMPLE_POINTS)],
    )
}

pub fn two_slan_example() -> Vec<u8> {
    file(
        [512, 512, 100],
        0,
        &[
            slan(0, [0.0, 30.0, -12.5], [256.0, 256.0, 50.0], "tilt axis"),
            slan(3, [90.0, 0.0, 4.25], [100.0, 120.5, 75.0], ""),
        ],
    )
}

pub const RICH_OBJECTS: i32 = 2;

/// Top-level chunk sequence exercising every chunk kind the codec knows
/// plus unknown ones.
pub fn rich_chunks() -> Vec<Vec<u8>> {
    let quad = [
        [0.0, 0.0, 10.0],
        [1.0, 0.0, 10.0],
        [0.0, 1.0, 10.0],
        [1.0, 1.0, 10.0],
    ];
    vec![
        objt("Membrane", 2, 1),
        cont(&EXAMPLE_POINTS[..3]),
        size_chunk(&[1.0, 2.5, 4.0]),
        sized(b"COST", &value_records(&[(0, 0.5)])),
        cont(&EXAMPLE_POINTS[3..]),
        mesh(&quad, &[BGNTRI, 0, 1, 2, 3, ENDTRI, END]),
        sized(b"MEST", &value_records(&[(0, 0.125), (1, 0.25)])),
        sized(
            b"IMAT",
            &[102, 255, 127, 0, 255, 0, 0, 1, 0, 0, 0, 0, 0, 255, 0, 0],
        ),
        sized(b"OBST", &[0, 2, 0, 0b1000, 0, 0, 0, 7, 0, 1, 0, 2]),
        sized(b"OGRP", &[0, 0, 0, 1]),
        objt("Vesicle", 0, 1),
        mesh(&quad[..3], &[BGNPOLYNORM2, 0, 1, 2, ENDPOLY, END]),
        sized(b"MEST", &value_records(&[(1, 0.7), (2, 0.8), (3, 0.9)])),
        sized(b"VIEW", &[0x3f, 0x80, 0, 0, 0, 0, 0, 0]),
        slan(1, [10.0, 20.0, 30.0], [1.0, 2.0, 3.0], "first"),
        slan(2, [-10.0, 0.0, 0.0], [4.0, 5.0, 6.0], "second"),
        minx(),
        sized(b"MOST", &[0, 1, 0, 0b1100, 0, 0, 0, 2, b'r', b'g', b'b', b'a']),
    ]
}

pub fn rich_model() -> Vec<u8> {
    file([1024, 1024, 200], RICH_OBJECTS, &rich_chunks())
}

/// Same as [`rich_model`] with `extra` spliced in before chunk `at`.
pub fn rich_model_with(at: usize, extra: &[u8]) -> Vec<u8> {
    let mut chunks = rich_chunks();
    chunks.insert(at, extra.to_vec());
    file([1024, 1024, 200], RICH_OBJECTS, &chunks)
}
