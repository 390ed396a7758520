//! End-to-end decoding of synthetic transport files.

use std::io::{Cursor, Write};
use std::path::Path;

use xpt_reader::{
    MissingValue, NumericValue, Section, Value, VarType, XptError, XptReader, decode_xpt, read_xpt,
};

const RECORD_LEN: usize = 80;

fn header_record(prefix: &str, digits: &str) -> Vec<u8> {
    let mut record = prefix.as_bytes().to_vec();
    record.extend_from_slice(digits.as_bytes());
    record.resize(RECORD_LEN, b' ');
    record
}

fn pad_to_record(buf: &mut Vec<u8>) {
    let rem = buf.len() % RECORD_LEN;
    if rem != 0 {
        buf.resize(buf.len() + RECORD_LEN - rem, b' ');
    }
}

struct Var {
    ntype: i16,
    length: i16,
    varnum: i16,
    name: &'static str,
}

fn char_var(name: &'static str, length: i16, varnum: i16) -> Var {
    Var {
        ntype: 2,
        length,
        varnum,
        name,
    }
}

fn num_var(name: &'static str, varnum: i16) -> Var {
    Var {
        ntype: 1,
        length: 8,
        varnum,
        name,
    }
}

/// Build a transport file: library, member and NAMESTR headers, the
/// descriptor records, the OBS header and `observations` verbatim.
fn build_xpt(size_token: &str, vars: &[Var], observations: &[u8]) -> Vec<u8> {
    let namestr_len: usize = if size_token == "136" { 136 } else { 140 };
    let mut buf = Vec::new();

    buf.extend(header_record(
        "HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!",
        "000000000000000000000000000000",
    ));
    buf.extend(header_record("SAS     SAS     SASLIB  9.4", ""));
    buf.extend(header_record("01JAN24:00:00:00", ""));
    buf.extend(header_record(
        "HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!",
        &format!("000000000000000001600000000{size_token}"),
    ));
    buf.extend(header_record(
        "HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!",
        "000000000000000000000000000000",
    ));
    buf.extend(header_record("SAS     TEST    SASDATA 9.4", ""));
    buf.extend(header_record("01JAN24:00:00:00", ""));
    buf.extend(header_record(
        "HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!",
        &format!("000000{:04}00000000000000000000", vars.len()),
    ));

    for var in vars {
        let mut record = vec![0u8; namestr_len];
        record[0..2].copy_from_slice(&var.ntype.to_be_bytes());
        record[4..6].copy_from_slice(&var.length.to_be_bytes());
        record[6..8].copy_from_slice(&var.varnum.to_be_bytes());
        record[8..16].fill(b' ');
        record[8..8 + var.name.len()].copy_from_slice(var.name.as_bytes());
        record[16..56].fill(b' ');
        buf.extend(record);
    }
    pad_to_record(&mut buf);

    buf.extend(header_record(
        "HEADER RECORD*******OBS     HEADER RECORD!!!!!!!",
        "000000000000000000000000000000",
    ));
    buf.extend_from_slice(observations);
    buf
}

const IBM_ONE: [u8; 8] = [0x41, 0x10, 0, 0, 0, 0, 0, 0];
const IBM_HUNDRED: [u8; 8] = [0x42, 0x64, 0, 0, 0, 0, 0, 0];
const IBM_NEG_118_625: [u8; 8] = [0xc2, 0x76, 0xa0, 0, 0, 0, 0, 0];

#[test]
fn decodes_single_character_column() {
    let data = build_xpt("136", &[char_var("AB", 3, 1)], b"XYZ");
    let table = decode_xpt(&data).expect("decode");

    assert_eq!(
        table.clone().into_rows(),
        vec![vec![Value::from("AB")], vec![Value::from("XYZ")]]
    );
    assert_eq!(table.trailing_bytes, 0);
}

#[test]
fn missing_obs_header_is_fatal() {
    let mut data = build_xpt("140", &[char_var("AB", 3, 1)], b"XYZ");
    let obs = data.len() - 3 - RECORD_LEN;
    data.truncate(obs);

    let err = decode_xpt(&data).unwrap_err();
    assert!(matches!(
        err,
        XptError::MissingSection {
            section: Section::Obs
        }
    ));
}

#[test]
fn missing_namestr_header_is_fatal() {
    let mut data = build_xpt("140", &[char_var("AB", 3, 1)], b"XYZ");
    let namestr = 7 * RECORD_LEN;
    data[namestr..namestr + 20].fill(b'-');

    let err = decode_xpt(&data).unwrap_err();
    assert!(matches!(
        err,
        XptError::MissingSection {
            section: Section::Namestr
        }
    ));
}

#[test]
fn missing_member_header_is_fatal() {
    let mut data = build_xpt("140", &[char_var("AB", 3, 1)], b"XYZ");
    let member = 3 * RECORD_LEN;
    data[member..member + 20].fill(b'-');

    let err = decode_xpt(&data).unwrap_err();
    assert!(matches!(
        err,
        XptError::MissingSection {
            section: Section::Member
        }
    ));
}

#[test]
fn latin1_cells_are_preserved() {
    let cell = [b'Q', b'u', 0xe9, b'b', b'e', b'c'];
    let data = build_xpt("140", &[char_var("CITY", 6, 1)], &cell);
    let table = decode_xpt(&data).expect("decode");
    assert_eq!(table.rows, vec![vec![Value::from("Qu\u{e9}bec")]]);
}

#[test]
fn malformed_variable_count_is_fatal() {
    let mut data = build_xpt("140", &[char_var("AB", 3, 1)], b"XYZ");
    let count = 7 * RECORD_LEN + 54;
    data[count..count + 4].copy_from_slice(b"00 1");

    let err = decode_xpt(&data).unwrap_err();
    assert!(matches!(err, XptError::MalformedCount { .. }));
}

#[test]
fn columns_follow_varnum_order() {
    let vars = [
        num_var("THIRD", 3),
        char_var("FIRST", 4, 1),
        num_var("SECOND", 2),
    ];
    let mut obs = Vec::new();
    obs.extend_from_slice(b"S001");
    obs.extend_from_slice(&IBM_HUNDRED);
    obs.extend_from_slice(&IBM_NEG_118_625);
    obs.extend_from_slice(b"S002");
    obs.extend_from_slice(&[b'.', 0, 0, 0, 0, 0, 0, 0]);
    obs.extend_from_slice(&IBM_ONE);

    let table = decode_xpt(&build_xpt("140", &vars, &obs)).expect("decode");

    assert_eq!(table.header(), vec!["FIRST", "SECOND", "THIRD"]);
    assert_eq!(table.variables[0].var_type, VarType::Character);
    assert_eq!(table.variables[1].varnum, 2);
    assert_eq!(
        table.rows,
        vec![
            vec![Value::from("S001"), Value::from(100.0), Value::from(-118.625)],
            vec![
                Value::from("S002"),
                Value::Num(NumericValue::Missing(MissingValue::Standard)),
                Value::from(1.0)
            ],
        ]
    );
}

#[test]
fn trailing_padding_is_discarded() {
    let vars = [char_var("A", 2, 1), char_var("B", 3, 2)];
    let mut obs = b"abcdefghij".to_vec();
    obs.extend_from_slice(b"  ");

    let table = decode_xpt(&build_xpt("140", &vars, &obs)).expect("decode");
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.trailing_bytes, 2);
}

#[test]
fn zero_stride_yields_header_only() {
    let data = build_xpt("140", &[], b"whatever is here");
    let rows = decode_xpt(&data).expect("decode").into_rows();
    assert_eq!(rows, vec![Vec::<Value>::new()]);
}

#[test]
fn duplicate_names_pass_through() {
    let vars = [char_var("X", 1, 1), char_var("X", 1, 2)];
    let table = decode_xpt(&build_xpt("140", &vars, b"ab")).expect("decode");
    assert_eq!(table.header(), vec!["X", "X"]);
    assert_eq!(table.rows, vec![vec![Value::from("a"), Value::from("b")]]);
}

#[test]
fn unknown_descriptor_size_falls_back_to_standard() {
    // Records are written 140 wide, the header declares an unknown width.
    let mut data = build_xpt("140", &[char_var("AB", 3, 1)], b"XYZ");
    let token = 3 * RECORD_LEN + 75;
    data[token..token + 3].copy_from_slice(b"999");

    let table = decode_xpt(&data).expect("decode");
    assert_eq!(table.header(), vec!["AB"]);
    assert_eq!(table.rows, vec![vec![Value::from("XYZ")]]);
}

#[test]
fn vax_descriptors_are_136_bytes() {
    let vars = [char_var("A", 1, 1), char_var("B", 1, 2)];
    let table = decode_xpt(&build_xpt("136", &vars, b"12")).expect("decode");
    assert_eq!(table.header(), vec!["A", "B"]);
    assert_eq!(table.rows, vec![vec![Value::from("1"), Value::from("2")]]);
}

#[test]
fn decoding_is_idempotent() {
    let vars = [char_var("ID", 4, 1), num_var("VAL", 2)];
    let mut obs = b"S001".to_vec();
    obs.extend_from_slice(&IBM_ONE);
    let data = build_xpt("140", &vars, &obs);

    let first = decode_xpt(&data).expect("first");
    let second = decode_xpt(&data).expect("second");
    assert_eq!(first, second);
}

#[test]
fn reader_over_cursor() {
    let data = build_xpt("136", &[char_var("AB", 3, 1)], b"XYZ");
    let table = XptReader::new(Cursor::new(data)).read_table().expect("read");
    assert_eq!(table.rows, vec![vec![Value::from("XYZ")]]);
}

#[test]
fn read_xpt_from_file() {
    let data = build_xpt("140", &[num_var("N", 1)], &IBM_HUNDRED);
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&data).expect("write");
    file.flush().expect("flush");

    let table = read_xpt(file.path()).expect("read");
    assert_eq!(table.rows, vec![vec![Value::from(100.0)]]);
}

#[test]
fn read_xpt_missing_file() {
    let err = read_xpt(Path::new("/nonexistent/dir/none.xpt")).unwrap_err();
    assert!(matches!(err, XptError::FileNotFound { .. }));
}
