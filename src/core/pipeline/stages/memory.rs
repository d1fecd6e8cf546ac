use log::trace;

use crate::core::pe::ProcessingElement;
use crate::core::pipeline::latches::MemWb;

/// Memory stage.
///
/// For entries with a cache request, publishes the request on the PE's
/// cache channel (once per transaction tag) and picks up the response when
/// the channel answers that tag. `cache_request`/`cache_ready` feed the
/// hazard unit, which stalls the whole pipeline until the answer arrives.
pub fn mem_stage(pe: &mut ProcessingElement) {
    let m = pe.ex_mem;
    let port = &pe.shared.pe(pe.id).cache;

    let mut out = MemWb {
        pc: m.pc,
        inst: m.inst,
        valid: m.valid,
        ctrl: m.ctrl,
        rd: m.rd,
        alu: m.alu,
        mem_data: 0,
        branch_taken: m.branch_taken,
    };

    pe.cache_request = m.valid && m.ctrl.cache_request;
    pe.cache_ready = false;

    if pe.cache_request {
        if pe.published_seq != m.seq {
            if pe.trace {
                trace!(
                    "PE{} MEM {} addr={:#x} seq={}",
                    pe.id,
                    if m.ctrl.cache_write { "store" } else { "load" },
                    m.alu,
                    m.seq
                );
            }
            port.publish(
                m.seq,
                m.alu,
                m.store_data,
                m.ctrl.cache_write,
                m.ctrl.cache_isb,
            );
            pe.published_seq = m.seq;
            pe.request_live = true;
        }
        if let Some(data) = port.response(m.seq) {
            pe.cache_ready = true;
            out.mem_data = data;
        }
    } else if pe.request_live {
        port.withdraw();
        pe.request_live = false;
    }

    pe.mem_wb_next = out;
}
