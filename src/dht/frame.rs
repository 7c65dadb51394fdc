use thiserror::Error;

pub const FRAME_LEN: usize = 5;

/// A checksum-verified sensor response:
/// `[humidity_high, humidity_low, temperature_high, temperature_low, checksum]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("checksum mismatch: expected 0x{expected:02x}, got 0x{actual:02x}")]
pub struct ChecksumMismatch {
    pub expected: u8,
    pub actual: u8,
}

impl Frame {
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Result<Self, ChecksumMismatch> {
        let expected = checksum(&[bytes[0], bytes[1], bytes[2], bytes[3]]);
        let actual = bytes[4];
        if expected != actual {
            return Err(ChecksumMismatch { expected, actual });
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn humidity_high(&self) -> u8 {
        self.0[0]
    }

    pub fn humidity_low(&self) -> u8 {
        self.0[1]
    }

    pub fn temperature_high(&self) -> u8 {
        self.0[2]
    }

    pub fn temperature_low(&self) -> u8 {
        self.0[3]
    }
}

/// Sum of the four data bytes, mod 256.
pub fn checksum(data: &[u8; 4]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_iff_checksum_matches_sum_mod_256() {
        let samples: [[u8; 4]; 5] = [
            [0x00, 0x00, 0x00, 0x00],
            [0x32, 0x00, 0x15, 0x00],
            [0x02, 0x8c, 0x01, 0x02],
            [0xff, 0xff, 0xff, 0xff],
            [0x80, 0x7f, 0x01, 0xa5],
        ];

        for data in samples {
            let sum = data.iter().map(|&b| b as u32).sum::<u32>() % 256;
            for last in 0..=u8::MAX {
                let bytes = [data[0], data[1], data[2], data[3], last];
                let result = Frame::from_bytes(bytes);
                if last as u32 == sum {
                    assert_eq!(result.unwrap().as_bytes(), &bytes);
                } else {
                    assert_eq!(
                        result.unwrap_err(),
                        ChecksumMismatch {
                            expected: sum as u8,
                            actual: last
                        }
                    );
                }
            }
        }
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[0xff, 0x01, 0x00, 0x00]), 0x00);
        assert_eq!(checksum(&[0xff, 0xff, 0xff, 0xff]), 0xfc);
    }
}
