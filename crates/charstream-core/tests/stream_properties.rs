//! End-to-end behavior of the stream stack over in-memory buffers.

use charstream_core::sstream::{input_string, output_string, string_stream};
use charstream_core::{
    FmtFlags, InputStream, Manip, OpenMode, OutputStream, ReadStream, StreamBase, StreamBuf,
    StringBuf, WriteStream,
};

#[test]
fn bump_then_unget_restores_the_cursor() {
    let mut sb = StringBuf::reader(b"xyz");
    let first = sb.sbumpc();
    assert_eq!(first, Some(b'x'));
    assert_eq!(sb.sungetc(), Some(b'x'));
    assert_eq!(sb.sgetc(), first);
    assert_eq!(sb.sbumpc(), first);
}

#[test]
fn write_seek_read_round_trips_byte_for_byte() {
    let (mut s, _) = string_stream(b"", OpenMode::IN | OpenMode::OUT);
    let payload = b"the quick brown fox, 0x2a, \x00\xff tail";
    s.write(payload);
    s.seekg(0);
    let mut back = vec![0u8; payload.len()];
    s.read(&mut back);
    assert!(s.ios().good());
    assert_eq!(back.as_slice(), payload.as_slice());
}

#[test]
fn auto_base_sniffing() {
    let (mut is, _) = input_string("0x1A 017 42 ");
    is.ios_mut().setf_mask(FmtFlags::empty(), FmtFlags::BASEFIELD);
    let mut a = 0i32;
    let mut b = 0i32;
    let mut c = 0i32;
    is.extract(&mut a).extract(&mut b).extract(&mut c);
    assert_eq!((a, b, c), (26, 15, 42));
    assert!(is.ios().good());
}

#[test]
fn overflow_clamps_and_fails() {
    let (mut is, _) = input_string("99999999999999999999 ");
    let mut v = 0i32;
    is.extract(&mut v);
    assert_eq!(v, i32::MAX);
    assert!(is.ios().fail());
    assert!(!is.ios().eof());
}

#[test]
fn internal_adjustment_places_fill_after_sign() {
    let (mut os, sb) = output_string();
    os.insert(&Manip::Internal)
        .insert(&Manip::SetFill(b'0'))
        .insert(&Manip::SetW(6))
        .insert(&-42i32);
    assert_eq!(sb.borrow().contents(), b"-00042");
}

#[test]
fn hex_showbase_uppercase() {
    let (mut os, sb) = output_string();
    os.insert(&Manip::Hex)
        .insert(&Manip::Showbase(true))
        .insert(&Manip::Uppercase(true))
        .insert(&255u32);
    assert_eq!(sb.borrow().contents(), b"0XFF");
}

#[test]
fn format_then_parse_round_trips() {
    let values: &[i64] = &[
        0,
        1,
        -1,
        42,
        -42,
        255,
        4096,
        i64::from(i32::MAX),
        i64::from(i32::MIN),
        i64::MAX,
    ];
    for manip in [Manip::Dec, Manip::Hex, Manip::Oct] {
        for &v in values {
            // hex and oct render the bit pattern, so round-trip through u64
            if manip != Manip::Dec && v < 0 {
                continue;
            }
            let (mut os, sb) = output_string();
            os.insert(&manip).insert(&v);
            let text = String::from_utf8(sb.borrow().contents().to_vec()).unwrap();

            let (mut is, _) = input_string(&text);
            let mut back = 0i64;
            is.apply(manip).extract(&mut back);
            assert_eq!(back, v, "base {manip:?}, text {text:?}");
        }
    }
}

#[test]
fn getline_consumes_and_counts_the_delimiter() {
    let (mut is, _) = input_string("ab\ncd");
    let mut line = [0u8; 8];
    is.getline(&mut line, b'\n');
    assert_eq!(&line[..2], b"ab");
    assert_eq!(line[2], 0);
    assert_eq!(is.gcount(), 3);

    let mut rest = [0u8; 8];
    is.getline(&mut rest, b'\n');
    assert_eq!(&rest[..2], b"cd");
    assert_eq!(is.gcount(), 2);
    assert!(is.ios().eof());
}

#[test]
fn failed_stream_touches_neither_operand_nor_buffer() {
    let (mut is, sbin) = input_string("123");
    is.ios_mut().setstate(charstream_core::Iostate::FAIL);
    let mut v = 777i32;
    is.extract(&mut v);
    assert_eq!(v, 777);
    // nothing was consumed
    assert_eq!(sbin.borrow_mut().in_avail(), 3);

    let (mut os, sbout) = output_string();
    os.ios_mut().setstate(charstream_core::Iostate::FAIL);
    os.insert(&5i32).write(b"x").put(b'y');
    assert_eq!(sbout.borrow().contents(), b"");
}

#[test]
fn eof_and_fail_coexist_on_exhausted_extraction() {
    let (mut is, _) = input_string("");
    let mut v = 0i32;
    is.extract(&mut v);
    assert!(is.ios().eof());
    assert!(is.ios().fail());

    // a complete value ending at end of input: EOF without FAIL
    let (mut is, _) = input_string("123");
    let mut v = 0i32;
    is.extract(&mut v);
    assert_eq!(v, 123);
    assert!(is.ios().eof());
    assert!(!is.ios().fail());
}

#[test]
fn shared_buffer_pipes_writer_to_reader() {
    let sb = StringBuf::from_bytes(b"", OpenMode::IN | OpenMode::OUT).shared();
    let wh: charstream_core::ios::BufHandle = sb.clone();
    let rh: charstream_core::ios::BufHandle = sb.clone();
    let mut writer = OutputStream::new(wh);
    let mut reader = InputStream::new(rh);

    writer.insert(&7i32).insert(" items");
    let mut n = 0i32;
    let mut word = String::new();
    reader.extract(&mut n).extract(&mut word);
    assert_eq!(n, 7);
    assert_eq!(word, "items");
}

#[test]
fn float_formatting_follows_floatfield() {
    let (mut os, sb) = output_string();
    os.insert(&Manip::Fixed)
        .insert(&Manip::SetPrecision(2))
        .insert(&3.14159f64)
        .insert(" ")
        .insert(&Manip::Scientific)
        .insert(&1500.0f64);
    assert_eq!(sb.borrow().contents(), b"3.14 1.50e+03");
}

#[test]
fn float_parse_round_trip() {
    for v in [0.0f64, 1.5, -2.25, 1.0e10, -3.125e-4] {
        let (mut os, sb) = output_string();
        os.insert(&Manip::SetPrecision(17)).insert(&v);
        let text = String::from_utf8(sb.borrow().contents().to_vec()).unwrap();
        let (mut is, _) = input_string(&text);
        let mut back = 0.0f64;
        is.extract(&mut back);
        assert_eq!(back, v, "text {text:?}");
    }
}

#[test]
fn serial_stream_passes_straight_through() {
    use charstream_core::serial::{LoopbackPort, serial_stream};

    let (mut s, sb) = serial_stream(LoopbackPort::new(b"10 20\n"));
    let mut a = 0i32;
    let mut b = 0i32;
    s.extract(&mut a).extract(&mut b);
    assert_eq!((a, b), (10, 20));

    s.insert(&Manip::SetW(4)).insert(&(a + b)).insert(&Manip::Endl);
    assert_eq!(sb.borrow().port().transmitted(), b"  30\n");
}
