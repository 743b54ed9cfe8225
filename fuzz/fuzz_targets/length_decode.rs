#![no_main]

use libfuzzer_sys::fuzz_target;
use oplen_core::{disassemble, disassemble_bounded, MachineMode};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, and every success must be reproducible
    // from exactly the bytes it claims to span.
    for mode in [
        MachineMode::Virtual8086,
        MachineMode::LongCompatibility,
        MachineMode::LongMode,
    ] {
        if let Ok(insn) = disassemble(data, mode) {
            let length = usize::from(insn.length);
            assert!(length >= 1);
            assert!(length <= data.len());
            assert!(!(insn.is_vex && insn.is_3dnow));

            let again = disassemble_bounded(data, mode, insn.length).expect("re-decode");
            assert_eq!(again, insn);
        }
    }

    // Walk a window instruction by instruction like a scanner would.
    let mut offset = 0;
    let mut steps = 0;
    while offset < data.len() && steps < 100 {
        match disassemble(&data[offset..], MachineMode::LongMode) {
            Ok(insn) => offset += usize::from(insn.length),
            Err(_) => offset += 1,
        }
        steps += 1;
    }
});
