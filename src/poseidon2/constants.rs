//! Poseidon2 parameters for BabyBear, width 16
//!
//! Round constants are the canonical residues of the standard BabyBear
//! width-16 instance (Xoroshiro128+ seeded with 1; eight full-round vectors
//! followed by thirteen partial-round scalars, each sample read in Montgomery
//! form).

use crate::field::BABYBEAR_MODULUS;

pub const WIDTH: usize = 16;
pub const NUM_EXTERNAL_ROUNDS: usize = 8;
pub const NUM_INTERNAL_ROUNDS: usize = 13;
pub const SBOX_DEGREE: u64 = 7;

/// Diagonal of the internal matrix `1 + diag(INTERNAL_DIAGONAL)`.
pub const INTERNAL_DIAGONAL: [u32; WIDTH] = [
    BABYBEAR_MODULUS - 2,
    1,
    1 << 1,
    1 << 2,
    1 << 3,
    1 << 4,
    1 << 5,
    1 << 6,
    1 << 7,
    1 << 8,
    1 << 9,
    1 << 10,
    1 << 11,
    1 << 12,
    1 << 13,
    1 << 15,
];

/// 2^-32 mod p; every output of the internal layer is scaled by it.
pub const MONTY_INVERSE: u32 = 943718400;

pub const EXTERNAL_ROUND_CONSTANTS: [[u32; WIDTH]; NUM_EXTERNAL_ROUNDS] = [
    [
        1321363468, 285374923, 858595076, 131742120, 550898981, 109281027, 1548327248, 299186948,
        1198120888, 1302311359, 568137078, 1484856917, 1301979945, 725688886, 941758026, 323341913,
    ],
    [
        1049323172, 822409348, 1406080127, 1279024384, 214862539, 904628921, 1320747287, 11578228,
        1036373712, 1474430466, 1430509860, 111174484, 1124450171, 85382027, 679880882, 243277213,
    ],
    [
        1338495990, 1523013347, 1841068573, 578194469, 47683837, 1790441672, 1628061601, 1716216090,
        1635810049, 1115145248, 1117524270, 678640014, 1962751651, 1367401392, 11688709, 1950824358,
    ],
    [
        528649031, 1937116923, 1460949223, 1193074357, 1221801411, 1183923117, 433505619,
        1928933309, 505759755, 285671663, 1047265910, 909281502, 1258966486, 864761693, 307024510,
        504858517,
    ],
    [
        1467478033, 1754565867, 432187324, 1452390672, 881974300, 550050336, 1447309270, 939419487,
        1783112406, 1166910332, 107514714, 580516863, 2003318760, 854475946, 934896823, 994783668,
    ],
    [
        1841107561, 438269126, 1550523825, 913322122, 600932628, 583000098, 1262690949, 105797869,
        277542016, 170491952, 365854467, 1479645308, 1457660602, 1635879552, 499155053, 741227047,
    ],
    [
        651389942, 464828001, 89696107, 360044673, 230330371, 1773129416, 1380150763, 745014723,
        793475694, 1361274828, 1443741698, 51616650, 731414218, 1087554954, 1273943885, 311581717,
    ],
    [
        702702762, 1473247301, 132108357, 1348260424, 476775430, 1438949459, 2434448, 1349232398,
        1954471898, 1762138591, 1271221795, 1593266476, 864488771, 139147729, 1053373910, 422842363,
    ],
];

pub const INTERNAL_ROUND_CONSTANTS: [u32; NUM_INTERNAL_ROUNDS] = [
    402771160, 320708227, 1122772462, 100431997, 202594011, 1226485372, 1088619034, 64118538,
    109828860, 724723599, 1662837151, 797753907, 1075635743,
];

/// Conformance fixture: one permutation maps this input...
pub const KNOWN_ANSWER_INPUT: [u32; WIDTH] = [
    894848333, 1437655012, 1200606629, 1690012884, 71131202, 1749206695, 1717947831, 120589055,
    19776022, 42382981, 1831865506, 724844064, 171220207, 1299207443, 227047920, 1783754913,
];

/// ...to this output.
pub const KNOWN_ANSWER_OUTPUT: [u32; WIDTH] = [
    512585766, 975869435, 1921378527, 1238606951, 899635794, 132650430, 1426417547, 1734425242,
    57415409, 67173027, 1535042492, 1318033394, 1070659233, 17258943, 856719028, 1500534995,
];
