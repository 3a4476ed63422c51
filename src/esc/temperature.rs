//! # Temperature Decoder
//!
//! Maps raw 8-bit NTC sensor codes to degrees Celsius using the ESC's
//! calibration curve. Raw codes fall as temperature rises.
//!
//! A raw code of 0 means no sensor is attached and decodes to 0. A nonzero
//! code below the lowest calibrated threshold decodes to the table ceiling
//! ([`TEMPERATURE_CEILING`]).

/// Temperature returned for raw codes below every calibrated threshold
pub const TEMPERATURE_CEILING: u8 = 130;

/// Calibration breakpoints: (minimum raw code, degrees), raw codes descending
pub const TEMPERATURE_TABLE: [(u8, u8); 130] = [
    (241, 0), (240, 1), (239, 2), (238, 3), (237, 4), (236, 5), (235, 6), (234, 7), (233, 8), (232, 9),
    (231, 10), (230, 11), (229, 12), (228, 13), (227, 14), (226, 15), (224, 16), (223, 17), (222, 18), (220, 19),
    (219, 20), (217, 21), (216, 22), (214, 23), (213, 24), (211, 25), (209, 26), (208, 27), (206, 28), (204, 29),
    (202, 30), (201, 31), (199, 32), (197, 33), (195, 34), (193, 35), (191, 36), (189, 37), (187, 38), (185, 39),
    (183, 40), (181, 41), (179, 42), (177, 43), (174, 44), (172, 45), (170, 46), (168, 47), (166, 48), (164, 49),
    (161, 50), (159, 51), (157, 52), (154, 53), (152, 54), (150, 55), (148, 56), (146, 57), (143, 58), (141, 59),
    (139, 60), (136, 61), (134, 62), (132, 63), (130, 64), (128, 65), (125, 66), (123, 67), (121, 68), (119, 69),
    (117, 70), (115, 71), (113, 72), (111, 73), (109, 74), (106, 75), (105, 76), (103, 77), (101, 78), (99, 79),
    (97, 80), (95, 81), (93, 82), (91, 83), (90, 84), (88, 85), (85, 86), (84, 87), (82, 88), (81, 89),
    (79, 90), (77, 91), (76, 92), (74, 93), (73, 94), (72, 95), (69, 96), (68, 97), (66, 98), (65, 99),
    (64, 100), (62, 101), (62, 102), (61, 103), (59, 104), (58, 105), (56, 106), (54, 107), (54, 108), (53, 109),
    (51, 110), (51, 111), (50, 112), (48, 113), (48, 114), (46, 115), (46, 116), (44, 117), (43, 118), (43, 119),
    (41, 120), (41, 121), (39, 122), (39, 123), (39, 124), (37, 125), (37, 126), (35, 127), (35, 128), (33, 129),
];

/// Direct lookup indexed by raw code, built from the breakpoint scan
const TEMPERATURE_LUT: [u8; 256] = generate_temperature_lut();

/// Generate the 256-entry lookup table at compile time
const fn generate_temperature_lut() -> [u8; 256] {
    let mut lut = [0u8; 256];
    let mut raw = 0;

    while raw < 256 {
        lut[raw] = scan_temperature_table(raw as u8);
        raw += 1;
    }

    lut
}

/// Decode a raw code by scanning the breakpoint table
///
/// Returns the degrees of the first entry whose threshold is at or below
/// `raw`. Duplicate thresholds resolve to the earlier entry.
const fn scan_temperature_table(raw: u8) -> u8 {
    if raw == 0 {
        return 0;
    }

    let mut i = 0;
    while i < TEMPERATURE_TABLE.len() {
        let (threshold, degrees) = TEMPERATURE_TABLE[i];
        if threshold <= raw {
            return degrees;
        }
        i += 1;
    }

    TEMPERATURE_CEILING
}

/// Decode a raw temperature sensor code into degrees Celsius
///
/// # Examples
///
/// ```
/// use esc_telemetry::esc::temperature::decode_temperature;
///
/// assert_eq!(decode_temperature(0), 0);    // sensor absent
/// assert_eq!(decode_temperature(240), 1);
/// assert_eq!(decode_temperature(30), 130); // below the table
/// ```
pub fn decode_temperature(raw: u8) -> u8 {
    TEMPERATURE_LUT[raw as usize]
}
