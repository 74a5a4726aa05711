use super::super::{Bus8080, Cpu8080, RunState};

impl Cpu8080 {
    pub(super) fn exec_nop(&mut self) -> u32 {
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_hlt(&mut self) -> u32 {
        self.advance_pc(1);
        self.state = RunState::Halted;
        log::info!("8080 halted at pc=0x{:04X}", self.regs.pc);
        7
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        self.interrupts.enable();
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.interrupts.disable();
        self.advance_pc(1);
        4
    }

    pub(super) fn exec_in<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let port = self.immediate(bus, 1);
        self.regs.a = bus.io_read(port);
        self.advance_pc(2);
        10
    }

    pub(super) fn exec_out<B: Bus8080>(&mut self, bus: &mut B) -> u32 {
        let port = self.immediate(bus, 1);
        bus.io_write(port, self.regs.a);
        self.advance_pc(2);
        10
    }
}
