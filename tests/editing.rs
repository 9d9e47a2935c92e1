//! Editing decoded values through the public API.

use casn::{AsnType, ErrorKind, Tree};

#[test]
fn decode_edit_reencode() {
    // SEQUENCE { SEQUENCE { BIT STRING, 2 bits 10 }, INTEGER 5 }
    let data: &[u8] = &[
        0x30, 0x09,
            0x30, 0x04,
                0x03, 0x02, 0x06, 0x80,
            0x02, 0x01, 0x05,
    ];
    let mut tree = Tree::decode(data).unwrap();
    assert_eq!(tree.to_der().as_ref(), data);

    let inner = tree.child(tree.root(), 0).unwrap();
    let bits = tree.child(inner, 0).unwrap();
    let int = tree.child(tree.root(), 1).unwrap();
    assert_eq!(tree.asn_type(bits), Some(AsnType::BitString));
    assert_eq!(tree.read_int(int).unwrap(), 5);

    let value = tree.read_bits(bits).unwrap();
    assert_eq!(value.octets().as_ref(), &[0x80][..]);
    assert_eq!(value.unused(), 6);

    // Setting a far bit grows the bit string and every length above it.
    let probe = tree.add_bit(bits, 17).unwrap();
    tree.write_bit(probe, true).unwrap();
    let first = tree.add_bit(bits, 0).unwrap();
    assert!(tree.read_bit(first).unwrap());

    let reencoded = tree.to_der();
    assert_eq!(
        reencoded.as_ref(),
        &[
            0x30, 0x0b,
                0x30, 0x06,
                    0x03, 0x04, 0x06, 0x80, 0x00, 0x40,
                0x02, 0x01, 0x05,
        ][..]
    );
    let reparsed = Tree::decode(reencoded.as_ref()).unwrap();
    assert_eq!(reparsed.to_der(), reencoded);
}

#[test]
fn growing_across_the_long_length_boundary() {
    let data: &[u8] = &[
        0x30, 0x05,
            0x30, 0x03,
                0x04, 0x01, 0xaa,
    ];
    let mut tree = Tree::decode(data).unwrap();
    let inner = tree.child(tree.root(), 0).unwrap();
    let octets = tree.child(inner, 0).unwrap();

    // 200 octets of content need long-form lengths on the whole chain.
    let fresh = vec![0x5a; 200];
    tree.write_octets(octets, &fresh).unwrap();

    let reencoded = tree.to_der();
    let mut reparsed = Tree::decode(reencoded.as_ref()).unwrap();
    assert_eq!(reparsed.to_der(), reencoded);

    let octets = reparsed.child(
        reparsed.child(reparsed.root(), 0).unwrap(), 0
    ).unwrap();
    assert_eq!(reparsed.read_octets(octets).unwrap().as_ref(), &fresh[..]);
}

#[test]
fn recorded_errors_are_visible_from_outside() {
    let mut tree = Tree::decode(&[0x02, 0x01, 0x2a]).unwrap();
    let root = tree.root();
    assert!(tree.read_bits(root).is_err());
    assert_eq!(tree.error(root), Some(ErrorKind::Type));
    assert_eq!(tree.read_int(root).unwrap(), 42);
    assert_eq!(tree.error(root), None);
}
