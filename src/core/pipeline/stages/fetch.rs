use log::trace;

use crate::common::constants::{INSTRUCTION_BYTES, NOP_INSTRUCTION};
use crate::core::pe::ProcessingElement;
use crate::core::pipeline::latches::IfId;
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::disassemble;

/// Fetch stage.
///
/// Latches the instruction word sampled for the current PC at the start of
/// the cycle, or a bubble if the server has not answered yet, and selects
/// the next PC: the branch target when a taken branch is in Writeback,
/// otherwise the sequential address.
pub fn fetch_stage(pe: &mut ProcessingElement) {
    pe.if_id_next = match pe.fetched {
        Some(inst) => {
            if pe.trace {
                trace!("PE{} IF  pc={:#x} {}", pe.id, pe.pc, disassemble(inst));
            }
            IfId {
                pc: pe.pc,
                inst,
                valid: true,
            }
        }
        None => IfId::bubble(NOP_INSTRUCTION),
    };

    pe.pc_next = if pe.branch_taken_w {
        pe.mem_wb.alu
    } else {
        pe.pc.wrapping_add(INSTRUCTION_BYTES)
    };
}
