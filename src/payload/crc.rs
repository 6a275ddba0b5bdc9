/// CRC16/CCITT-FALSE, the variant the BACEN Pix manual mandates for the
/// trailing checksum field.
///
/// Parameters:
/// - Poly:   0x1021
/// - Init:   0xFFFF
/// - RefIn:  false
/// - RefOut: false
/// - XorOut: 0x0000
const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INIT;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// Renders the checksum the way it appears in the payload: four uppercase
/// hex digits, zero-padded.
pub fn checksum_hex(data: &[u8]) -> String {
    format!("{:04X}", crc16_ccitt(data))
}
