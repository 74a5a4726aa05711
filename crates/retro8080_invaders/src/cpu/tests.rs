use super::{Bus8080, Condition, Cpu8080, Flags, RunState};
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;

struct TestBus {
    mem: Vec<u8>,
    io_in: [u8; 256],
    io_out: Vec<(u8, u8)>,
    finished: bool,
}

impl TestBus {
    fn new() -> Self {
        Self {
            mem: vec![0; 0x10000],
            io_in: [0; 256],
            io_out: Vec::new(),
            finished: false,
        }
    }

    fn with_program(program: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.mem[..program.len()].copy_from_slice(program);
        bus
    }

    fn load_com(&mut self, name: &str) {
        // CP/M programs load at 0x0100.
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("../../assets/roms/8080_tests");
        path.push(name);
        let data = fs::read(&path).expect("failed to read test ROM");

        let start = 0x0100usize;
        assert!(start + data.len() <= self.mem.len());
        self.mem[start..start + data.len()].copy_from_slice(&data);

        // Warm boot at 0x0000 becomes "OUT 0,A" to end the run.
        self.mem[0x0000] = 0xD3;
        self.mem[0x0001] = 0x00;

        // BDOS entry at 0x0005 becomes "OUT 1,A; RET".
        self.mem[0x0005] = 0xD3;
        self.mem[0x0006] = 0x01;
        self.mem[0x0007] = 0xC9;
    }
}

impl Bus8080 for TestBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }

    fn io_read(&mut self, port: u8) -> u8 {
        self.io_in[port as usize]
    }

    fn io_write(&mut self, port: u8, value: u8) {
        if port == 0 {
            self.finished = true;
        }
        self.io_out.push((port, value));
    }
}

fn run_until_halt(cpu: &mut Cpu8080, bus: &mut TestBus) -> u64 {
    let mut cycles = 0u64;
    for _ in 0..10_000 {
        if cpu.is_halted() {
            break;
        }
        cycles += cpu.step(bus) as u64;
    }
    cycles
}

/// Flag values that make `cond` evaluate to `taken`.
fn flags_for(cond: Condition, taken: bool) -> Flags {
    let mut flags = Flags::default();
    match cond {
        Condition::NotZero => flags.zero = !taken,
        Condition::Zero => flags.zero = taken,
        Condition::NoCarry => flags.carry = !taken,
        Condition::Carry => flags.carry = taken,
        Condition::ParityOdd => flags.parity = !taken,
        Condition::ParityEven => flags.parity = taken,
        Condition::Plus => flags.sign = !taken,
        Condition::Minus => flags.sign = taken,
    }
    flags
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

#[test]
fn small_program_runs_to_halt() {
    // LXI SP,0x2400; MVI A,0x0F; ADI 0x01; HLT
    let mut bus = TestBus::with_program(&[0x31, 0x00, 0x24, 0x3E, 0x0F, 0xC6, 0x01, 0x76]);
    let mut cpu = Cpu8080::new();

    let cycles = run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cycles, 31);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.sp, 0x2400);
    assert!(!cpu.flags.zero);
    assert!(cpu.flags.aux_carry);
    assert_eq!(cpu.state(), RunState::Halted);
}

#[test]
fn halted_cpu_reports_zero_cycles() {
    let mut bus = TestBus::with_program(&[0x76, 0x3C]);
    let mut cpu = Cpu8080::new();

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.pc, 1);
    for _ in 0..3 {
        assert_eq!(cpu.step(&mut bus), 0);
    }
    assert_eq!(cpu.regs.pc, 1);
    assert_eq!(cpu.regs.a, 0);

    cpu.request_interrupt(0xCF);
    assert_eq!(cpu.step(&mut bus), 0);

    cpu.reset(0x0001);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.a, 1);
}

#[test]
fn unused_opcodes_are_single_byte_nops() {
    let unused = [
        0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD,
    ];
    let mut bus = TestBus::with_program(&unused);
    let mut cpu = Cpu8080::new();

    for (i, _) in unused.iter().enumerate() {
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.regs.pc as usize, i + 1);
    }
    assert_eq!(cpu.regs, super::Registers { pc: 12, ..Default::default() });
}

#[test]
fn mov_cycles_depend_on_memory_operand() {
    // MOV B,C; MOV M,A; MOV E,M
    let mut bus = TestBus::with_program(&[0x41, 0x77, 0x5E]);
    let mut cpu = Cpu8080::new();
    cpu.regs.c = 0x42;
    cpu.regs.a = 0x99;
    cpu.regs.set_hl(0x2100);

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.b, 0x42);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.mem[0x2100], 0x99);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.e, 0x99);
}

#[test]
fn mvi_to_memory_writes_through_hl() {
    let mut bus = TestBus::with_program(&[0x36, 0xAB]);
    let mut cpu = Cpu8080::new();
    cpu.regs.set_hl(0x2345);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.mem[0x2345], 0xAB);
    assert_eq!(cpu.regs.pc, 2);
}

#[test]
fn add_sets_carry_zero_and_aux_carry() {
    // ADD B
    let mut bus = TestBus::with_program(&[0x80]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0xFF;
    cpu.regs.b = 0x01;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.flags.carry);
    assert!(cpu.flags.zero);
    assert!(cpu.flags.aux_carry);
    assert!(cpu.flags.parity);
    assert!(!cpu.flags.sign);
}

#[test]
fn adc_adds_incoming_carry() {
    // ADC C
    let mut bus = TestBus::with_program(&[0x89]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x10;
    cpu.regs.c = 0x20;
    cpu.flags.carry = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x31);
    assert!(!cpu.flags.carry);
}

#[test]
fn sub_borrow_sets_carry() {
    // SUI 0x01
    let mut bus = TestBus::with_program(&[0xD6, 0x01]);
    let mut cpu = Cpu8080::new();

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(cpu.flags.carry);
    assert!(cpu.flags.sign);
    assert!(!cpu.flags.zero);
}

#[test]
fn cmp_sets_flags_without_storing() {
    // CPI 0x05; CMP B
    let mut bus = TestBus::with_program(&[0xFE, 0x05, 0xB8]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x05;
    cpu.regs.b = 0x06;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x05);
    assert!(cpu.flags.zero);
    assert!(!cpu.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x05);
    assert!(!cpu.flags.zero);
    assert!(cpu.flags.carry);
}

#[test]
fn sbb_folds_borrow_into_subtrahend() {
    // SBB B with B=0xFF and CY=1 subtracts 0x00.
    let mut bus = TestBus::with_program(&[0x98, 0x98]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x10;
    cpu.regs.b = 0xFF;
    cpu.flags.carry = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x10);
    assert!(!cpu.flags.carry);

    // Without the incoming borrow the same instruction wraps.
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x11);
    assert!(cpu.flags.carry);
}

#[test]
fn logical_ops_clear_carry_and_aux_carry() {
    // ANA B; XRA A; ORI 0x81
    let mut bus = TestBus::with_program(&[0xA0, 0xAF, 0xF6, 0x81]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0xF0;
    cpu.regs.b = 0x3C;
    cpu.flags.carry = true;
    cpu.flags.aux_carry = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x30);
    assert!(!cpu.flags.carry);
    assert!(!cpu.flags.aux_carry);

    cpu.flags.carry = true;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.flags.zero);
    assert!(!cpu.flags.carry);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(cpu.flags.sign);
    assert!(cpu.flags.parity);
}

#[test]
fn inr_dcr_leave_carry_untouched() {
    // INR A; DCR B; INR M
    let mut bus = TestBus::with_program(&[0x3C, 0x05, 0x34]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x0F;
    cpu.regs.b = 0x10;
    cpu.regs.set_hl(0x2000);
    bus.mem[0x2000] = 0xFF;
    cpu.flags.carry = true;

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.a, 0x10);
    assert!(cpu.flags.aux_carry);
    assert!(cpu.flags.carry);

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.b, 0x0F);
    assert!(cpu.flags.aux_carry);
    assert!(cpu.flags.carry);

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(bus.mem[0x2000], 0x00);
    assert!(cpu.flags.zero);
    assert!(cpu.flags.carry);
}

#[test]
fn inx_dcx_wrap_around() {
    // INX B; DCX D; INX SP
    let mut bus = TestBus::with_program(&[0x03, 0x1B, 0x33]);
    let mut cpu = Cpu8080::new();
    cpu.regs.set_bc(0xFFFF);
    cpu.regs.set_de(0x0000);
    cpu.regs.sp = 0xFFFF;

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.bc(), 0x0000);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.de(), 0xFFFF);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(cpu.flags, Flags::default());
}

#[test]
fn dad_only_touches_carry() {
    // DAD B
    let mut bus = TestBus::with_program(&[0x09]);
    let mut cpu = Cpu8080::new();
    cpu.regs.set_hl(0xFFFF);
    cpu.regs.set_bc(0x0001);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(cpu.flags.carry);
    assert!(!cpu.flags.zero);
}

#[test]
fn rotates_move_bits_through_carry() {
    // RLC; RRC; RAL; RAR
    let mut bus = TestBus::with_program(&[0x07, 0x0F, 0x17, 0x1F]);
    let mut cpu = Cpu8080::new();

    cpu.regs.a = 0x80;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.flags.carry);

    cpu.regs.a = 0x02;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(!cpu.flags.carry);

    cpu.regs.a = 0x80;
    cpu.flags.carry = false;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.flags.carry);

    cpu.regs.a = 0x01;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.flags.carry);
}

#[test]
fn daa_adjusts_bcd_addition() {
    // MVI A,0x09; ADI 0x08; DAA; ADI 0x83; DAA
    let mut bus = TestBus::with_program(&[0x3E, 0x09, 0xC6, 0x08, 0x27, 0xC6, 0x83, 0x27]);
    let mut cpu = Cpu8080::new();

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x11);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a, 0x17);
    assert!(!cpu.flags.carry);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.flags.carry);
    assert!(cpu.flags.zero);
}

#[test]
fn cma_stc_cmc() {
    let mut bus = TestBus::with_program(&[0x2F, 0x37, 0x3F]);
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x5A;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xA5);
    assert_eq!(cpu.flags, Flags::default());
    cpu.step(&mut bus);
    assert!(cpu.flags.carry);
    cpu.step(&mut bus);
    assert!(!cpu.flags.carry);
}

#[test]
fn push_pop_pair_byte_order() {
    // PUSH B; POP D
    let mut bus = TestBus::with_program(&[0xC5, 0xD1]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;
    cpu.regs.set_bc(0x1234);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.sp, 0x23FE);
    assert_eq!(bus.mem[0x23FF], 0x12);
    assert_eq!(bus.mem[0x23FE], 0x34);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.sp, 0x2400);
}

#[test]
fn push_psw_packs_flag_byte() {
    // PUSH PSW; POP PSW
    let mut bus = TestBus::with_program(&[0xF5, 0xF1]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;
    cpu.regs.a = 0x42;
    cpu.flags = Flags {
        sign: true,
        zero: true,
        aux_carry: true,
        parity: true,
        carry: true,
    };

    cpu.step(&mut bus);
    assert_eq!(bus.mem[0x23FF], 0x42);
    assert_eq!(bus.mem[0x23FE], 0xD7);

    bus.mem[0x23FE] = 0x28 | 0x01;
    cpu.regs.a = 0;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(
        cpu.flags,
        Flags {
            carry: true,
            ..Flags::default()
        }
    );
}

#[test]
fn xthl_swaps_with_stack_top() {
    let mut bus = TestBus::with_program(&[0xE3]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2300;
    cpu.regs.set_hl(0xABCD);
    bus.mem[0x2300] = 0x34;
    bus.mem[0x2301] = 0x12;

    assert_eq!(cpu.step(&mut bus), 18);
    assert_eq!(cpu.regs.hl(), 0x1234);
    assert_eq!(bus.mem[0x2300], 0xCD);
    assert_eq!(bus.mem[0x2301], 0xAB);
    assert_eq!(cpu.regs.sp, 0x2300);
}

#[test]
fn direct_addressing_loads_and_stores() {
    // STA 0x2010; LDA 0x2011; SHLD 0x2020; LHLD 0x2030
    let mut bus = TestBus::with_program(&[
        0x32, 0x10, 0x20, 0x3A, 0x11, 0x20, 0x22, 0x20, 0x20, 0x2A, 0x30, 0x20,
    ]);
    bus.mem[0x2011] = 0x77;
    bus.mem[0x2030] = 0xEF;
    bus.mem[0x2031] = 0xBE;
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x55;
    cpu.regs.set_hl(0x1234);

    assert_eq!(cpu.step(&mut bus), 13);
    assert_eq!(bus.mem[0x2010], 0x55);
    assert_eq!(cpu.step(&mut bus), 13);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.mem[0x2020], 0x34);
    assert_eq!(bus.mem[0x2021], 0x12);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.hl(), 0xBEEF);
    assert_eq!(cpu.regs.pc, 12);
}

#[test]
fn stax_ldax_use_register_pairs() {
    // STAX B; LDAX D
    let mut bus = TestBus::with_program(&[0x02, 0x1A]);
    bus.mem[0x2222] = 0x66;
    let mut cpu = Cpu8080::new();
    cpu.regs.a = 0x11;
    cpu.regs.set_bc(0x2111);
    cpu.regs.set_de(0x2222);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.mem[0x2111], 0x11);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x66);
}

#[test]
fn xchg_sphl_pchl() {
    let mut bus = TestBus::with_program(&[0xEB, 0xF9, 0xE9]);
    let mut cpu = Cpu8080::new();
    cpu.regs.set_hl(0x1111);
    cpu.regs.set_de(0x0200);

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.hl(), 0x0200);
    assert_eq!(cpu.regs.de(), 0x1111);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.sp, 0x0200);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x0200);
}

#[test]
fn call_and_ret_use_stack() {
    let mut bus = TestBus::with_program(&[0xCD, 0x10, 0x00]);
    bus.mem[0x0010] = 0xC9;
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;

    assert_eq!(cpu.step(&mut bus), 17);
    assert_eq!(cpu.regs.pc, 0x0010);
    assert_eq!(cpu.regs.sp, 0x23FE);
    assert_eq!(bus.mem[0x23FE], 0x03);
    assert_eq!(bus.mem[0x23FF], 0x00);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0x2400);
}

#[test]
fn rst_jumps_to_vector() {
    let mut bus = TestBus::new();
    bus.mem[0x0100] = 0xEF; // RST 5
    let mut cpu = Cpu8080::with_pc(0x0100);
    cpu.regs.sp = 0x2400;

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.mem[0x23FE], 0x01);
    assert_eq!(bus.mem[0x23FF], 0x01);
}

#[test]
fn conditional_jumps_calls_and_returns() {
    for code in 0..8u8 {
        let cond = Condition::from_opcode(code << 3);
        for taken in [true, false] {
            let jcc = 0xC2 | (code << 3);
            let mut bus = TestBus::with_program(&[jcc, 0x00, 0x20]);
            let mut cpu = Cpu8080::new();
            cpu.flags = flags_for(cond, taken);
            assert_eq!(cpu.step(&mut bus), 10, "{cond:?} jump");
            assert_eq!(cpu.regs.pc, if taken { 0x2000 } else { 3 }, "{cond:?} jump");

            let ccc = 0xC4 | (code << 3);
            let mut bus = TestBus::with_program(&[ccc, 0x00, 0x20]);
            let mut cpu = Cpu8080::new();
            cpu.regs.sp = 0x2400;
            cpu.flags = flags_for(cond, taken);
            let cycles = cpu.step(&mut bus);
            if taken {
                assert_eq!(cycles, 17, "{cond:?} call");
                assert_eq!(cpu.regs.pc, 0x2000);
                assert_eq!(cpu.regs.sp, 0x23FE);
                assert_eq!(bus.mem[0x23FE], 0x03);
            } else {
                assert_eq!(cycles, 11, "{cond:?} call");
                assert_eq!(cpu.regs.pc, 3);
                assert_eq!(cpu.regs.sp, 0x2400);
            }

            let rcc = 0xC0 | (code << 3);
            let mut bus = TestBus::with_program(&[rcc]);
            bus.mem[0x23FE] = 0x34;
            bus.mem[0x23FF] = 0x12;
            let mut cpu = Cpu8080::new();
            cpu.regs.sp = 0x23FE;
            cpu.flags = flags_for(cond, taken);
            let cycles = cpu.step(&mut bus);
            if taken {
                assert_eq!(cycles, 11, "{cond:?} return");
                assert_eq!(cpu.regs.pc, 0x1234);
                assert_eq!(cpu.regs.sp, 0x2400);
            } else {
                assert_eq!(cycles, 5, "{cond:?} return");
                assert_eq!(cpu.regs.pc, 1);
                assert_eq!(cpu.regs.sp, 0x23FE);
            }
        }
    }
}

#[test]
fn interrupt_injects_opcode_without_consuming_memory() {
    // EI; MVI A,0x01
    let mut bus = TestBus::with_program(&[0xFB, 0x3E, 0x01]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;

    cpu.request_interrupt(0xCF);
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.interrupts_enabled());
    assert_eq!(cpu.interrupt_pending(), Some(0xCF));

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, 0x0008);
    assert!(!cpu.interrupts_enabled());
    assert_eq!(cpu.interrupt_pending(), None);
    // Return address is the instruction that was about to run.
    assert_eq!(bus.mem[0x23FE], 0x01);
    assert_eq!(bus.mem[0x23FF], 0x00);
    assert_eq!(cpu.regs.a, 0);
}

#[test]
fn injected_non_rst_opcode_runs_at_current_pc() {
    // EI; NOP; then the bytes a CALL would take as its operand.
    let mut bus = TestBus::with_program(&[0xFB, 0x00, 0x00, 0x30]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;
    cpu.step(&mut bus);

    cpu.request_interrupt(0x3C);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.regs.pc, 1);
    assert!(!cpu.interrupts_enabled());

    // Back to the EI.
    cpu.regs.pc = 0;
    cpu.step(&mut bus);
    cpu.request_interrupt(0xCD);
    assert_eq!(cpu.step(&mut bus), 17);
    assert_eq!(cpu.regs.pc, 0x3000);
    // The pushed return address is the pc the CALL was injected at.
    assert_eq!(cpu.regs.sp, 0x23FE);
    assert_eq!(bus.mem[0x23FE], 0x01);
    assert_eq!(bus.mem[0x23FF], 0x00);
}

#[test]
fn interrupt_waits_while_disabled() {
    // DI; NOP; EI; NOP
    let mut bus = TestBus::with_program(&[0xF3, 0x00, 0xFB, 0x00]);
    let mut cpu = Cpu8080::new();
    cpu.regs.sp = 0x2400;

    cpu.step(&mut bus);
    cpu.request_interrupt(0xD7);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 2);
    assert_eq!(cpu.interrupt_pending(), Some(0xD7));

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x0010);
}

#[test]
fn in_and_out_reach_the_bus() {
    // IN 1; OUT 3
    let mut bus = TestBus::with_program(&[0xDB, 0x01, 0xD3, 0x03]);
    bus.io_in[1] = 0x8F;
    let mut cpu = Cpu8080::new();

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.a, 0x8F);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(bus.io_out, vec![(0x03, 0x8F)]);
    assert_eq!(cpu.regs.pc, 4);
}

#[test]
fn opcode_hits_count_every_execution() {
    let mut bus = TestBus::with_program(&[0x00, 0x00, 0x3C, 0x76]);
    let mut cpu = Cpu8080::new();
    run_until_halt(&mut cpu, &mut bus);

    let hits = cpu.opcode_hits();
    assert_eq!(hits[0x00], 2);
    assert_eq!(hits[0x3C], 1);
    assert_eq!(hits[0x76], 1);
    assert_eq!(hits.iter().sum::<u64>(), 4);
}

proptest! {
    #[test]
    fn flag_byte_ignores_fixed_bits(byte in any::<u8>()) {
        prop_assert_eq!(Flags::from_byte(byte).to_byte(), (byte & 0xD5) | 0x02);
    }

    #[test]
    fn add_matches_wide_arithmetic(a in any::<u8>(), v in any::<u8>()) {
        let mut bus = TestBus::with_program(&[0xC6, v]);
        let mut cpu = Cpu8080::new();
        cpu.regs.a = a;
        cpu.step(&mut bus);

        let wide = a as u16 + v as u16;
        prop_assert_eq!(cpu.regs.a, wide as u8);
        prop_assert_eq!(cpu.flags.carry, wide > 0xFF);
        prop_assert_eq!(cpu.flags.zero, wide as u8 == 0);
        prop_assert_eq!(cpu.flags.parity, (wide as u8).count_ones() % 2 == 0);
    }

    #[test]
    fn sub_carry_is_borrow(a in any::<u8>(), v in any::<u8>()) {
        let mut bus = TestBus::with_program(&[0x90]);
        let mut cpu = Cpu8080::new();
        cpu.regs.a = a;
        cpu.regs.b = v;
        cpu.step(&mut bus);

        prop_assert_eq!(cpu.regs.a, a.wrapping_sub(v));
        prop_assert_eq!(cpu.flags.carry, a < v);
    }

    #[test]
    fn daa_after_bcd_add_yields_bcd_sum(x in 0u8..100, y in 0u8..100) {
        // ADI y; DAA
        let mut bus = TestBus::with_program(&[0xC6, to_bcd(y), 0x27]);
        let mut cpu = Cpu8080::new();
        cpu.regs.a = to_bcd(x);
        cpu.step(&mut bus);
        cpu.step(&mut bus);

        let sum = x as u16 + y as u16;
        prop_assert_eq!(cpu.regs.a, to_bcd((sum % 100) as u8));
        prop_assert_eq!(cpu.flags.carry, sum >= 100);
    }

    #[test]
    fn push_then_pop_restores_pair(value in any::<u16>(), sp in 0x2100u16..0x4000) {
        // PUSH H; POP B
        let mut bus = TestBus::with_program(&[0xE5, 0xC1]);
        let mut cpu = Cpu8080::new();
        cpu.regs.sp = sp;
        cpu.regs.set_hl(value);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.sp, sp - 2);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.bc(), value);
        prop_assert_eq!(cpu.regs.sp, sp);
    }

    #[test]
    fn push_psw_then_pop_psw_restores_a_and_flags(a in any::<u8>(), bits in 0u8..32) {
        let flags = Flags {
            sign: bits & 0x01 != 0,
            zero: bits & 0x02 != 0,
            aux_carry: bits & 0x04 != 0,
            parity: bits & 0x08 != 0,
            carry: bits & 0x10 != 0,
        };
        // PUSH PSW; POP PSW
        let mut bus = TestBus::with_program(&[0xF5, 0xF1]);
        let mut cpu = Cpu8080::new();
        cpu.regs.sp = 0x2400;
        cpu.regs.a = a;
        cpu.flags = flags;

        cpu.step(&mut bus);
        prop_assert_eq!(bus.mem[0x23FE], flags.to_byte());
        cpu.regs.a = !a;
        cpu.flags = Flags::default();
        cpu.step(&mut bus);

        prop_assert_eq!(cpu.regs.a, a);
        prop_assert_eq!(cpu.flags, flags);
        prop_assert_eq!(cpu.regs.sp, 0x2400);
    }

    #[test]
    fn call_then_ret_resumes_after_call(target in 0x0100u16..0x2000, sp in 0x2100u16..0x4000) {
        let [lo, hi] = target.to_le_bytes();
        let mut bus = TestBus::with_program(&[0xCD, lo, hi]);
        bus.mem[target as usize] = 0xC9;
        let mut cpu = Cpu8080::new();
        cpu.regs.sp = sp;

        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.pc, target);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.pc, 3);
        prop_assert_eq!(cpu.regs.sp, sp);
    }

    #[test]
    fn inx_then_dcx_restores_pair(value in any::<u16>()) {
        let mut bus = TestBus::with_program(&[0x23, 0x2B]);
        let mut cpu = Cpu8080::new();
        cpu.regs.set_hl(value);
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.hl(), value.wrapping_add(1));
        cpu.step(&mut bus);
        prop_assert_eq!(cpu.regs.hl(), value);
    }
}

fn run_exerciser(name: &str) {
    let mut bus = TestBus::new();
    bus.load_com(name);

    let mut cpu = Cpu8080::with_pc(0x0100);

    let mut cycles: u64 = 0;
    while !bus.finished && !cpu.is_halted() {
        cycles = cycles.saturating_add(cpu.step(&mut bus) as u64);
    }

    assert!(bus.finished, "{name} halted after {cycles} cycles");
    assert!(cycles > 0);
}

// The CP/M exercisers take a long time and need ROM files that are not
// checked in. Run them with `cargo test -p retro8080_invaders -- --ignored`.

#[test]
#[ignore]
fn run_tst8080() {
    run_exerciser("TST8080.COM");
}

#[test]
#[ignore]
fn run_cputest() {
    run_exerciser("CPUTEST.COM");
}

#[test]
#[ignore]
fn run_8080pre() {
    run_exerciser("8080PRE.COM");
}

#[test]
#[ignore]
fn run_8080exm() {
    run_exerciser("8080EXM.COM");
}
