//! Bit-exact packing of instructions into 6-byte records.

use crate::encoding::{
    extract_payload, extract_tag, pack_record, padding_mask, BinaryRecord, RECORD_SIZE,
};
use crate::error::{Result, UvmError};
use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// Encode an instruction into its record
pub fn encode(instr: &Instruction) -> Result<BinaryRecord> {
    encode_operands(instr.opcode(), &instr.operand_values())
}

/// Encode an opcode and raw operand values, checking every field width
pub fn encode_operands(opcode: Opcode, values: &[u64]) -> Result<BinaryRecord> {
    let fields = opcode.fields();
    if values.len() != fields.len() {
        return Err(UvmError::OperandCount {
            opcode,
            expected: fields.len(),
            found: values.len(),
        });
    }

    let mut payload = 0u64;
    for (field, &value) in fields.iter().zip(values) {
        field.check(value)?;
        payload |= field.insert(value);
    }
    Ok(pack_record(opcode.to_u8(), payload))
}

/// Decode a record; padding bits are ignored
pub fn decode(record: &BinaryRecord) -> Result<Instruction> {
    let tag = extract_tag(record);
    let opcode = Opcode::from_u8(tag).ok_or(UvmError::InvalidOpcode(tag))?;
    let payload = extract_payload(record);

    let values: Vec<u64> = opcode.fields().iter().map(|f| f.extract(payload)).collect();
    Instruction::from_operands(opcode, &values)
}

/// Decode a record, rejecting non-zero padding bits
pub fn decode_strict(record: &BinaryRecord) -> Result<Instruction> {
    let instr = decode(record)?;
    let opcode = instr.opcode();
    let padding = extract_payload(record) & padding_mask(opcode.fields());
    if padding != 0 {
        return Err(UvmError::NonZeroPadding { opcode, padding });
    }
    Ok(instr)
}

/// Number of whole records in a stream and the length of any trailing remainder
#[inline]
pub const fn record_count(stream_len: usize) -> (usize, usize) {
    (stream_len / RECORD_SIZE, stream_len % RECORD_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_const_vector() {
        let record = encode(&Instruction::LoadConst { dst: 5, imm: 803 }).unwrap();
        assert_eq!(record, [0x06, 0x05, 0x00, 0x00, 0x03, 0x23]);
    }

    #[test]
    fn test_read_mem_layout() {
        let record = encode(&Instruction::ReadMem { dst: 1, addr: 0x0164 }).unwrap();
        assert_eq!(record, [0x0A, 0x01, 0x01, 0x64, 0x00, 0x00]);
    }

    #[test]
    fn test_write_mem_layout() {
        let record = encode(&Instruction::WriteMem { addr: 0x0064, src: 0x02 }).unwrap();
        assert_eq!(record, [0x0C, 0x00, 0x64, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_mod_layout() {
        let record = encode(&Instruction::Mod { dst_addr: 0x000A, a_reg: 3, b_reg: 4 }).unwrap();
        assert_eq!(record, [0x0E, 0x00, 0x0A, 0x03, 0x04, 0x00]);
    }

    #[test]
    fn test_decode_vector() {
        let instr = decode(&[0x06, 0x05, 0x00, 0x00, 0x03, 0x23]).unwrap();
        assert_eq!(instr, Instruction::LoadConst { dst: 5, imm: 803 });
    }

    #[test]
    fn test_decode_unknown_tag() {
        assert_eq!(
            decode(&[0xFF, 0, 0, 0, 0, 0]),
            Err(UvmError::InvalidOpcode(0xFF))
        );
        assert_eq!(decode(&[0x00; 6]), Err(UvmError::InvalidOpcode(0x00)));
    }

    #[test]
    fn test_encode_operands_checks_width() {
        assert_eq!(
            encode_operands(Opcode::LoadConst, &[5, 1 << 32]),
            Err(UvmError::Encoding { field: "imm", value: 1 << 32, bits: 32 })
        );
        assert_eq!(
            encode_operands(Opcode::Mod, &[1, 2]),
            Err(UvmError::OperandCount { opcode: Opcode::Mod, expected: 3, found: 2 })
        );
    }

    #[test]
    fn test_padding_ignored_by_decode() {
        let record = [0x0E, 0x00, 0x0A, 0x03, 0x04, 0xFF];
        let instr = decode(&record).unwrap();
        assert_eq!(instr, Instruction::Mod { dst_addr: 10, a_reg: 3, b_reg: 4 });
    }

    #[test]
    fn test_padding_rejected_by_decode_strict() {
        let record = [0x0C, 0x00, 0x64, 0x02, 0x12, 0x34];
        assert_eq!(
            decode_strict(&record),
            Err(UvmError::NonZeroPadding { opcode: Opcode::WriteMem, padding: 0x1234 })
        );

        let clean = [0x0C, 0x00, 0x64, 0x02, 0x00, 0x00];
        assert!(decode_strict(&clean).is_ok());
    }

    #[test]
    fn test_record_count() {
        assert_eq!(record_count(0), (0, 0));
        assert_eq!(record_count(18), (3, 0));
        assert_eq!(record_count(20), (3, 2));
    }
}
