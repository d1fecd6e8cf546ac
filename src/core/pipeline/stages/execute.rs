use log::trace;

use crate::core::pe::ProcessingElement;
use crate::core::pipeline::latches::ExMem;
use crate::core::units::alu::Alu;
use crate::isa::disassemble;

/// Execute stage.
///
/// Runs the ALU on the ID/EX operands against the architectural flags and
/// evaluates the branch condition. The resulting flags only become
/// architectural when the entry is committed into EX/MEM.
pub fn execute_stage(pe: &mut ProcessingElement) {
    let e = pe.id_ex;
    let res = Alu::execute(e.ctrl.alu, e.a, e.b, pe.flags);

    let taken = e.valid && e.ctrl.branch && e.ctrl.branch_cond.holds(pe.flags);
    let flags = if e.valid && e.ctrl.flags_update {
        res.flags
    } else {
        pe.flags
    };

    if pe.trace && e.valid {
        trace!(
            "PE{} EX  pc={:#x} {} -> {:#x} [{}]{}",
            pe.id,
            e.pc,
            disassemble(e.inst),
            res.value,
            flags,
            if taken { " taken" } else { "" }
        );
    }

    pe.branch_taken_e = taken;
    pe.ex_mem_next = ExMem {
        pc: e.pc,
        inst: e.inst,
        valid: e.valid,
        ctrl: e.ctrl,
        rd: e.rd,
        alu: res.value,
        store_data: e.store_data,
        branch_taken: taken,
        flags,
        seq: 0,
    };
}
