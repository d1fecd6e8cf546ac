use std::sync::atomic::Ordering;

use log::{debug, trace, warn};

use crate::core::arch::gpr::RegisterFile;
use crate::core::control::ControlUnit;
use crate::core::pe::ProcessingElement;
use crate::core::pipeline::hazards::HazardInputs;
use crate::core::pipeline::latches::IdEx;
use crate::core::pipeline::signals::{ControlSignals, DataType, OpASrc, OpBSrc};
use crate::core::units::fpu::Fpu;
use crate::isa::{disassemble, Instruction};

/// Extends the 32-bit immediate field according to the operand type.
///
/// Integers are sign-extended; floats are reinterpreted as `f32` and
/// widened to an `f64` bit pattern.
pub fn extend_immediate(inst: Instruction, data_type: DataType) -> u64 {
    match data_type {
        DataType::Integer => inst.imm_signed() as u64,
        DataType::Float => Fpu::widen_f32(inst.imm()),
    }
}

/// Registers read by an instruction, for dependency checks.
///
/// Slot 0 is the operand-A register, slot 1 the operand-B register or the
/// store data register.
pub fn source_registers(inst: Instruction, ctrl: &ControlSignals) -> [Option<usize>; 2] {
    let a = match ctrl.a_src {
        OpASrc::Rn => Some(inst.rn()),
        OpASrc::Rd => Some(inst.rd()),
        OpASrc::Pc => None,
    };
    let b = if ctrl.b_src == OpBSrc::Rm || ctrl.cache_write {
        Some(inst.rm())
    } else {
        None
    };
    [a, b]
}

/// Decode stage.
///
/// Decodes the IF/ID instruction, reads its operands, checks the address
/// it was fetched from against the `[UPPER, LOWER]` window (bubbles never
/// fault, so a prefetch past `LOWER` is harmless) and evaluates the hazard
/// unit, whose signals gate the commit at the end of the cycle. A `SWI`
/// that actually leaves Decode halts the element when the element handles
/// software interrupts.
pub fn decode_stage(pe: &mut ProcessingElement) {
    let d = pe.if_id;
    let inst = Instruction(d.inst);

    let mut ctrl = if d.valid {
        ControlUnit::decode(inst.opcode())
    } else {
        ControlSignals::default()
    };
    if ctrl.reg_write && RegisterFile::is_read_only(inst.rd()) {
        ctrl.reg_write = false;
    }

    if d.valid && !pe.segfault && !pe.regs.pc_in_bounds(d.pc) {
        warn!(
            "PE{} segmentation fault: pc={:#x} outside [{:#x}, {:#x}]",
            pe.id,
            d.pc,
            pe.regs.upper(),
            pe.regs.lower()
        );
        pe.segfault = true;
        pe.shared.pe(pe.id).status.segfault.store(true, Ordering::Release);
    }

    let imm = if ctrl.use_imm {
        extend_immediate(inst, ctrl.data_type)
    } else {
        0
    };
    let a = match ctrl.a_src {
        OpASrc::Rn => pe.regs.read(inst.rn()),
        OpASrc::Rd => pe.regs.read(inst.rd()),
        OpASrc::Pc => d.pc,
    };
    let b = match ctrl.b_src {
        OpBSrc::Rm => pe.regs.read(inst.rm()),
        OpBSrc::Imm => imm,
        OpBSrc::One => 1,
    };
    let sources = if d.valid {
        source_registers(inst, &ctrl)
    } else {
        [None, None]
    };

    pe.id_ex_next = IdEx {
        pc: d.pc,
        inst: d.inst,
        valid: d.valid,
        ctrl,
        rd: inst.rd(),
        a,
        b,
        store_data: pe.regs.read(inst.rm()),
    };

    let inputs = HazardInputs {
        fetch_ready: pe.fetched.is_some(),
        cache_request: pe.cache_request,
        cache_ready: pe.cache_ready,
        segfault: pe.segfault,
        branch_in_decode: d.valid && ctrl.branch,
        branch_taken_e: pe.branch_taken_e,
        branch_taken_w: pe.branch_taken_w,
        sources,
        rd_e: pe.id_ex.rd,
        reg_write_e: pe.id_ex.valid && pe.id_ex.ctrl.reg_write,
        rd_m: pe.ex_mem.rd,
        reg_write_m: pe.ex_mem.valid && pe.ex_mem.ctrl.reg_write,
    };
    pe.signals = pe.hazard.detect(&inputs);

    if pe.trace && d.valid {
        trace!(
            "PE{} ID  pc={:#x} {} {:?}",
            pe.id,
            d.pc,
            disassemble(d.inst),
            pe.signals
        );
    }

    if d.valid && ctrl.swi && !pe.signals.stall_d && pe.caps.swi_halts {
        let shared = pe.shared.pe(pe.id);
        let count = shared.status.swi_count.fetch_add(1, Ordering::AcqRel) + 1;
        shared.control.stop_requested.store(true, Ordering::Release);
        debug!("PE{} software interrupt at pc={:#x} (#{})", pe.id, d.pc, count);
    }
}
