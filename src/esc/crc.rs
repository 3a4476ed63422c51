//! # CRC-16/XMODEM Implementation
//!
//! CRC-16/XMODEM checksum calculation for ESC telemetry frames.
//!
//! **Polynomial**: 0x1021 (x^16 + x^12 + x^5 + 1)
//! **Initial Value**: 0x0000
//! **Reflection**: none (input and output)

/// CRC-16/XMODEM polynomial
const CRC16_POLY: u16 = 0x1021;

/// Precomputed CRC16 lookup table for fast calculation
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC-16/XMODEM checksum using lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for (Length through the end of the channel block)
///
/// # Returns
///
/// * `u16` - Calculated CRC16 checksum
///
/// # Examples
///
/// ```
/// use esc_telemetry::esc::crc::crc16_xmodem;
///
/// assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
/// ```
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        let index = ((crc >> 8) ^ byte as u16) & 0xFF;
        crc = (crc << 8) ^ CRC16_TABLE[index as usize];
    }

    crc
}

/// Calculate CRC-16/XMODEM checksum bit by bit (slow, for verification)
#[allow(dead_code)]
fn crc16_xmodem_slow(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= (byte as u16) << 8;

        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16_xmodem(&[]), 0x0000);
    }

    #[test]
    fn test_crc16_check_value() {
        // Published CRC-16/XMODEM check value
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
        assert_eq!(crc16_xmodem_slow(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_crc16_table_entries() {
        assert_eq!(CRC16_TABLE[0], 0x0000);
        assert_eq!(CRC16_TABLE[1], 0x1021);
        assert_eq!(CRC16_TABLE[2], 0x2042);
        assert_eq!(CRC16_TABLE[16], 0x1231);
        assert_eq!(CRC16_TABLE[128], 0x9188);
        assert_eq!(CRC16_TABLE[255], 0x1EF0);
    }

    #[test]
    fn test_crc16_single_byte() {
        // A single byte b yields table[b] since the accumulator starts at zero
        for byte in [0x00u8, 0x01, 0x7F, 0xFF] {
            assert_eq!(crc16_xmodem(&[byte]), CRC16_TABLE[byte as usize]);
        }
    }

    #[test]
    fn test_crc16_lookup_table_matches_slow() {
        let test_data = [
            vec![0x01, 0x02, 0x03],
            vec![0xFF, 0xFE, 0xFD],
            vec![0x9E, 0x01, 0x02, 0x00, 0x00],
            vec![0x00; 161],
            vec![0xFF; 37],
        ];

        for data in test_data.iter() {
            assert_eq!(
                crc16_xmodem(data),
                crc16_xmodem_slow(data),
                "CRC mismatch for data: {:?}",
                data
            );
        }
    }

    #[test]
    fn test_crc16_is_deterministic() {
        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(crc16_xmodem(&data), crc16_xmodem(&data));
    }

    #[test]
    fn test_crc16_changes_with_data() {
        let data1 = [0x9E, 0x01, 0x02, 0x04];
        let data2 = [0x9E, 0x01, 0x02, 0x05];

        assert_ne!(crc16_xmodem(&data1), crc16_xmodem(&data2), "CRC should change when data changes");
    }
}
