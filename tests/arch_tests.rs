//! Architecture-specific register file tests.

use cpu_tlp_sim::common::constants::{NUM_REGS, REG_LOWER, REG_PEID, REG_UPPER, REG_ZERO};
use cpu_tlp_sim::core::arch::gpr::RegisterFile;

/// Tests reset values.
#[test]
fn test_reset_values() {
    let rf = RegisterFile::new(3);
    let values = rf.values();
    for (idx, &v) in values.iter().enumerate() {
        match idx {
            REG_PEID => assert_eq!(v, 3),
            REG_LOWER => assert_eq!(v, u64::MAX),
            _ => assert_eq!(v, 0, "register {}", idx),
        }
    }
}

/// Tests that REG0 and PEID ignore every write.
#[test]
fn test_read_only_registers() {
    let mut rf = RegisterFile::new(2);
    let mut x: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..1000 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        assert!(!rf.write(REG_ZERO, x));
        assert!(!rf.write(REG_PEID, x));
        assert_eq!(rf.read(REG_ZERO), 0);
        assert_eq!(rf.read(REG_PEID), 2);
    }
    assert!(RegisterFile::is_read_only(REG_ZERO));
    assert!(RegisterFile::is_read_only(REG_PEID));
    assert!(!RegisterFile::is_read_only(REG_UPPER));
}

/// Tests general-purpose and bound register writes.
#[test]
fn test_writable_registers() {
    let mut rf = RegisterFile::new(0);
    for idx in 1..=8 {
        assert!(rf.write(idx, idx as u64 * 0x1111));
    }
    for idx in 1..=8 {
        assert_eq!(rf.read(idx), idx as u64 * 0x1111);
    }
    assert!(rf.write(REG_UPPER, 0x40));
    assert!(rf.write(REG_LOWER, 0x80));
    assert_eq!(rf.upper(), 0x40);
    assert_eq!(rf.lower(), 0x80);
}

/// Tests out-of-range indices.
#[test]
fn test_out_of_range_index() {
    let mut rf = RegisterFile::new(0);
    assert!(!rf.write(NUM_REGS, 5));
    assert!(!rf.write(15, 5));
    assert_eq!(rf.read(NUM_REGS), 0);
}

/// Tests the inclusive PC window.
#[test]
fn test_pc_window() {
    let mut rf = RegisterFile::new(0);
    assert!(rf.pc_in_bounds(0));
    assert!(rf.pc_in_bounds(u64::MAX));

    rf.write(REG_UPPER, 0x10);
    rf.write(REG_LOWER, 0x20);
    assert!(!rf.pc_in_bounds(0x08));
    assert!(rf.pc_in_bounds(0x10));
    assert!(rf.pc_in_bounds(0x20));
    assert!(!rf.pc_in_bounds(0x28));
}

/// Tests that reset restores everything after writes.
#[test]
fn test_reset_after_writes() {
    let mut rf = RegisterFile::new(1);
    rf.write(4, 44);
    rf.write(REG_LOWER, 0);
    rf.reset();
    assert_eq!(rf, RegisterFile::new(1));
}
