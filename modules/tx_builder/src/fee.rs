//! Linear size-based fee estimate.
//!
//! This is an approximation for previews, not the ledger's fee rule: the size
//! of a transaction is guessed from its input and output counts and priced at
//! 0.155381 ADA per 1000 bytes.

use lookout_common::Lovelace;

pub const BASE_SIZE: u64 = 200;
pub const INPUT_SIZE: u64 = 180;
pub const OUTPUT_SIZE: u64 = 160;

/// 0.155381 ADA per 1000 bytes, i.e. 0.000155381 ADA per byte
pub const FEE_PER_KILOBYTE: Lovelace = 155_381;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearFeeModel {
    pub base_size: u64,
    pub input_size: u64,
    pub output_size: u64,
    pub fee_per_kilobyte: Lovelace,
}

impl Default for LinearFeeModel {
    fn default() -> Self {
        Self {
            base_size: BASE_SIZE,
            input_size: INPUT_SIZE,
            output_size: OUTPUT_SIZE,
            fee_per_kilobyte: FEE_PER_KILOBYTE,
        }
    }
}

impl LinearFeeModel {
    /// Estimated serialised size in bytes
    pub fn estimated_size(&self, inputs: usize, outputs: usize) -> u64 {
        self.base_size + inputs as u64 * self.input_size + outputs as u64 * self.output_size
    }

    /// `ceil(size * fee_per_byte)` in lovelace, computed without floats
    pub fn fee(&self, inputs: usize, outputs: usize) -> Lovelace {
        let scaled = self.estimated_size(inputs, outputs) * self.fee_per_kilobyte;
        scaled.div_ceil(1000)
    }
}
