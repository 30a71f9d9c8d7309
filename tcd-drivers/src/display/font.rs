//! Segment font tables
//!
//! Both tables cover printable ASCII (`' '..='~'`). Anything outside that
//! range renders blank.
//!
//! 7-segment bit order is the usual `a..g` in bits 0..6 with the decimal
//! point in bit 7. 14-segment bits follow the HT16K33 alphanumeric backpack
//! wiring, decimal point in bit 14.
//!
//! The plain "6" has no top segment on either table. With the correction
//! flag set it gets one, which reads better next to a 14-segment "6".

/// First character in the tables
const FIRST: u8 = b' ';

/// Last character in the tables
const LAST: u8 = b'~';

/// Top segment, added to "6" when corrected
const SEG7_TOP: u8 = 0x01;
const SEG14_TOP: u16 = 0x0001;

/// Decimal point bit of a 7-segment digit
pub const SEG7_DP: u8 = 0x80;

#[rustfmt::skip]
static SEVEN_SEGMENT: [u8; 95] = [
    0x00, 0x86, 0x22, 0x7E, 0x6D, 0xD2, 0x46, 0x20, // ' ' ! " # $ % & '
    0x29, 0x0B, 0x21, 0x70, 0x10, 0x40, 0x80, 0x52, // ( ) * + , - . /
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7C, 0x07, // 0 1 2 3 4 5 6 7
    0x7F, 0x6F, 0x09, 0x0D, 0x61, 0x48, 0x43, 0xD3, // 8 9 : ; < = > ?
    0x5F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71, 0x3D, // @ A B C D E F G
    0x76, 0x30, 0x1E, 0x75, 0x38, 0x15, 0x37, 0x3F, // H I J K L M N O
    0x73, 0x6B, 0x33, 0x6D, 0x78, 0x3E, 0x3E, 0x2A, // P Q R S T U V W
    0x76, 0x6E, 0x5B, 0x39, 0x64, 0x0F, 0x23, 0x08, // X Y Z [ \ ] ^ _
    0x02, 0x5F, 0x7C, 0x58, 0x5E, 0x7B, 0x71, 0x6F, // ` a b c d e f g
    0x74, 0x10, 0x0C, 0x75, 0x30, 0x14, 0x54, 0x5C, // h i j k l m n o
    0x73, 0x67, 0x50, 0x6D, 0x78, 0x1C, 0x1C, 0x14, // p q r s t u v w
    0x76, 0x6E, 0x5B, 0x46, 0x30, 0x70, 0x01,       // x y z { | } ~
];

#[rustfmt::skip]
static FOURTEEN_SEGMENT: [u16; 95] = [
    0b0000000000000000, // ' '
    0b0000000000000110, // !
    0b0000001000100000, // "
    0b0001001011001110, // #
    0b0001001011101101, // $
    0b0000110000100100, // %
    0b0010001101011101, // &
    0b0000010000000000, // '
    0b0010010000000000, // (
    0b0000100100000000, // )
    0b0011111111000000, // *
    0b0001001011000000, // +
    0b0000100000000000, // ,
    0b0000000011000000, // -
    0b0100000000000000, // .
    0b0000110000000000, // /
    0b0000110000111111, // 0
    0b0000000000000110, // 1
    0b0000000011011011, // 2
    0b0000000010001111, // 3
    0b0000000011100110, // 4
    0b0010000001101001, // 5
    0b0000000011111100, // 6
    0b0000000000000111, // 7
    0b0000000011111111, // 8
    0b0000000011101111, // 9
    0b0001001000000000, // :
    0b0000101000000000, // ;
    0b0010010000000000, // <
    0b0000000011001000, // =
    0b0000100100000000, // >
    0b0001000010000011, // ?
    0b0000001010111011, // @
    0b0000000011110111, // A
    0b0001001010001111, // B
    0b0000000000111001, // C
    0b0001001000001111, // D
    0b0000000011111001, // E
    0b0000000001110001, // F
    0b0000000010111101, // G
    0b0000000011110110, // H
    0b0001001000001001, // I
    0b0000000000011110, // J
    0b0010010001110000, // K
    0b0000000000111000, // L
    0b0000010100110110, // M
    0b0010000100110110, // N
    0b0000000000111111, // O
    0b0000000011110011, // P
    0b0010000000111111, // Q
    0b0010000011110011, // R
    0b0000000011101101, // S
    0b0001001000000001, // T
    0b0000000000111110, // U
    0b0000110000110000, // V
    0b0010100000110110, // W
    0b0010110100000000, // X
    0b0001010100000000, // Y
    0b0000110000001001, // Z
    0b0000000000111001, // [
    0b0010000100000000, // \
    0b0000000000001111, // ]
    0b0000110000000011, // ^
    0b0000000000001000, // _
    0b0000000100000000, // `
    0b0001000001011000, // a
    0b0010000001111000, // b
    0b0000000011011000, // c
    0b0000100010001110, // d
    0b0000100001011000, // e
    0b0000000001110001, // f
    0b0000010010001110, // g
    0b0001000001110000, // h
    0b0001000000000000, // i
    0b0000000000001110, // j
    0b0011011000000000, // k
    0b0000000000110000, // l
    0b0001000011010100, // m
    0b0001000001010000, // n
    0b0000000011011100, // o
    0b0000000101110000, // p
    0b0000010010000110, // q
    0b0000000001010000, // r
    0b0010000010001000, // s
    0b0000000001111000, // t
    0b0000000000011100, // u
    0b0010000000000100, // v
    0b0010100000010100, // w
    0b0010100011000000, // x
    0b0010000000001100, // y
    0b0000100001001000, // z
    0b0000100101001001, // {
    0b0001001000000000, // |
    0b0010010010001001, // }
    0b0000010100100000, // ~
];

fn index(c: u8) -> Option<usize> {
    (FIRST..=LAST).contains(&c).then(|| usize::from(c - FIRST))
}

/// 7-segment pattern for an ASCII character
pub fn seven_segment(c: u8, corr6: bool) -> u8 {
    let Some(i) = index(c) else {
        return 0;
    };
    let seg = SEVEN_SEGMENT[i];
    if corr6 && c == b'6' {
        seg | SEG7_TOP
    } else {
        seg
    }
}

/// 7-segment pattern for a digit value 0..=9 (or its ASCII form)
pub fn seven_segment_digit(d: u8, corr6: bool) -> u8 {
    match d {
        0..=9 => seven_segment(b'0' + d, corr6),
        b'0'..=b'9' => seven_segment(d, corr6),
        _ => 0,
    }
}

/// 14-segment pattern for an ASCII character
pub fn fourteen_segment(c: u8, corr6: bool) -> u16 {
    let Some(i) = index(c) else {
        return 0;
    };
    let seg = FOURTEEN_SEGMENT[i];
    if corr6 && c == b'6' {
        seg | SEG14_TOP
    } else {
        seg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        assert_eq!(seven_segment_digit(0, false), 0x3F);
        assert_eq!(seven_segment_digit(8, false), 0x7F);
        assert_eq!(seven_segment_digit(b'1', false), 0x06);
        assert_eq!(seven_segment_digit(10, false), 0);
    }

    #[test]
    fn test_out_of_range_is_blank() {
        assert_eq!(seven_segment(0x1F, false), 0);
        assert_eq!(seven_segment(0x7F, false), 0);
        assert_eq!(fourteen_segment(b'\n', false), 0);
        assert_eq!(fourteen_segment(200, false), 0);
    }

    #[test]
    fn test_correct_six_on_both_tables() {
        assert_eq!(seven_segment(b'6', false) & SEG7_TOP, 0);
        assert_eq!(seven_segment(b'6', true), 0x7D);
        assert_eq!(fourteen_segment(b'6', false) & SEG14_TOP, 0);
        assert_eq!(fourteen_segment(b'6', true), 0b0000000011111101);
        // other characters unaffected
        assert_eq!(seven_segment(b'5', true), seven_segment(b'5', false));
    }

    #[test]
    fn test_month_letters() {
        assert_eq!(fourteen_segment(b'O', false), 0b0000000000111111);
        assert_eq!(fourteen_segment(b'C', false), 0b0000000000111001);
        assert_eq!(fourteen_segment(b'T', false), 0b0001001000000001);
    }
}
