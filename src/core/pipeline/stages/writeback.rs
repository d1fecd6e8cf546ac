use log::trace;

use crate::core::pe::ProcessingElement;
use crate::isa::disassemble;

/// Writeback stage.
///
/// The only point where the register file is mutated. Each successful
/// write is mirrored into the PE's register snapshot. Also reports a taken
/// branch in Writeback, which redirects Fetch.
pub fn wb_stage(pe: &mut ProcessingElement) {
    let wb = pe.mem_wb;
    pe.branch_taken_w = wb.valid && wb.ctrl.pc_src && wb.branch_taken;

    if !wb.valid || !wb.ctrl.reg_write {
        return;
    }

    let val = if wb.ctrl.mem_op { wb.mem_data } else { wb.alu };
    if pe.trace {
        trace!(
            "PE{} WB  pc={:#x} {} r{} <= {:#x}",
            pe.id,
            wb.pc,
            disassemble(wb.inst),
            wb.rd,
            val
        );
    }
    if pe.regs.write(wb.rd, val) {
        pe.shared.pe(pe.id).registers.write_slot(wb.rd, val);
    }
}
