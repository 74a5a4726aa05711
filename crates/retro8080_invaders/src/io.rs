use std::collections::VecDeque;

use bitflags::bitflags;

bitflags! {
    /// Input port 1 (IN 1): coin slot, start buttons and player 1 controls.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Port1: u8 {
        const COIN = 0b0000_0001;
        const P2_START = 0b0000_0010;
        const P1_START = 0b0000_0100;
        const ALWAYS_ONE = 0b0000_1000;
        const P1_SHOOT = 0b0001_0000;
        const P1_LEFT = 0b0010_0000;
        const P1_RIGHT = 0b0100_0000;
    }
}

bitflags! {
    /// Input port 2 (IN 2): DIP switches, tilt and player 2 controls.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Port2: u8 {
        /// Ships per game, encoded as `ships - 3`.
        const SHIPS = 0b0000_0011;
        const TILT = 0b0000_0100;
        /// Set: extra ship at 1000 points. Clear: at 1500.
        const BONUS_LIFE_1000 = 0b0000_1000;
        const P2_SHOOT = 0b0001_0000;
        const P2_LEFT = 0b0010_0000;
        const P2_RIGHT = 0b0100_0000;
        /// Set: hide the coin info line in attract mode.
        const HIDE_COIN_INFO = 0b1000_0000;
    }
}

/// Logical inputs wired to ports 1 and 2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Input {
    Coin,
    P1Start,
    P2Start,
    P1Shoot,
    P1Left,
    P1Right,
    P2Shoot,
    P2Left,
    P2Right,
    Tilt,
}

/// DIP switch settings read by the game through port 2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DipConfig {
    /// Ships per game, 3 to 6.
    pub ships_per_game: u8,
    pub bonus_life_at_1000: bool,
    pub show_coin_info: bool,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            ships_per_game: 3,
            bonus_life_at_1000: false,
            show_coin_info: true,
        }
    }
}

impl DipConfig {
    fn apply_to_port2(&self, port2: &mut Port2) {
        port2.remove(Port2::SHIPS | Port2::BONUS_LIFE_1000 | Port2::HIDE_COIN_INFO);

        let ships = self.ships_per_game.clamp(3, 6) - 3;
        *port2 |= Port2::from_bits_truncate(ships) & Port2::SHIPS;
        port2.set(Port2::BONUS_LIFE_1000, self.bonus_life_at_1000);
        port2.set(Port2::HIDE_COIN_INFO, !self.show_coin_info);
    }
}

/// Discrete sound effects triggered through output ports 3 and 5.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SoundEffect {
    Ufo,
    Shot,
    PlayerDie,
    InvaderDie,
    Fleet1,
    Fleet2,
    Fleet3,
    Fleet4,
    UfoHit,
}

struct SoundTrigger {
    port: u8,
    bit: u8,
    effect: SoundEffect,
}

/// Sound effects kept between drains; older ones are dropped first.
pub const SOUND_QUEUE_CAPACITY: usize = 64;

/// Port 0 bytes buffered before a line is flushed without a newline.
pub const DEBUG_LINE_LIMIT: usize = 256;

const SOUND_TRIGGERS: &[SoundTrigger] = &[
    SoundTrigger { port: 3, bit: 0, effect: SoundEffect::Ufo },
    SoundTrigger { port: 3, bit: 1, effect: SoundEffect::Shot },
    SoundTrigger { port: 3, bit: 2, effect: SoundEffect::PlayerDie },
    SoundTrigger { port: 3, bit: 3, effect: SoundEffect::InvaderDie },
    SoundTrigger { port: 5, bit: 0, effect: SoundEffect::Fleet1 },
    SoundTrigger { port: 5, bit: 1, effect: SoundEffect::Fleet2 },
    SoundTrigger { port: 5, bit: 2, effect: SoundEffect::Fleet3 },
    SoundTrigger { port: 5, bit: 3, effect: SoundEffect::Fleet4 },
    SoundTrigger { port: 5, bit: 4, effect: SoundEffect::UfoHit },
];

/// The Space Invaders port device.
///
/// Reads: port 1 and 2 input latches, port 3 shift register result.
/// Writes: port 0 debug text, port 2 shift offset, ports 3/5 sound, port 4
/// shift data, port 6 watchdog. Every other port is inert.
pub struct InvadersIo {
    port1: Port1,
    port2: Port2,
    dip: DipConfig,
    /// `shift1:shift0`; port 4 writes enter at the high byte.
    shift_register: u16,
    shift_offset: u8,
    out_port3: u8,
    out_port5: u8,
    sounds: VecDeque<SoundEffect>,
    /// Unfinished port 0 line.
    debug_line: String,
    watchdog_writes: u64,
}

impl InvadersIo {
    pub fn new(dip: DipConfig) -> Self {
        let mut port2 = Port2::empty();
        dip.apply_to_port2(&mut port2);
        Self {
            port1: Port1::ALWAYS_ONE,
            port2,
            dip,
            shift_register: 0,
            shift_offset: 0,
            out_port3: 0,
            out_port5: 0,
            sounds: VecDeque::with_capacity(SOUND_QUEUE_CAPACITY),
            debug_line: String::new(),
            watchdog_writes: 0,
        }
    }

    /// Return to power-on state, keeping the DIP configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.dip);
    }

    pub fn dip_config(&self) -> DipConfig {
        self.dip
    }

    pub fn set_dip_config(&mut self, dip: DipConfig) {
        self.dip = dip;
        self.dip.apply_to_port2(&mut self.port2);
    }

    pub fn set_input(&mut self, input: Input, pressed: bool) {
        match input {
            Input::Coin => self.port1.set(Port1::COIN, pressed),
            Input::P1Start => self.port1.set(Port1::P1_START, pressed),
            Input::P2Start => self.port1.set(Port1::P2_START, pressed),
            Input::P1Shoot => self.port1.set(Port1::P1_SHOOT, pressed),
            Input::P1Left => self.port1.set(Port1::P1_LEFT, pressed),
            Input::P1Right => self.port1.set(Port1::P1_RIGHT, pressed),
            Input::P2Shoot => self.port2.set(Port2::P2_SHOOT, pressed),
            Input::P2Left => self.port2.set(Port2::P2_LEFT, pressed),
            Input::P2Right => self.port2.set(Port2::P2_RIGHT, pressed),
            Input::Tilt => self.port2.set(Port2::TILT, pressed),
        }
    }

    pub fn press(&mut self, input: Input) {
        self.set_input(input, true);
    }

    pub fn release(&mut self, input: Input) {
        self.set_input(input, false);
    }

    pub fn read(&mut self, port: u8) -> u8 {
        match port {
            1 => self.port1.bits(),
            2 => self.port2.bits(),
            3 => (self.shift_register >> (8 - self.shift_offset)) as u8,
            _ => 0,
        }
    }

    pub fn write(&mut self, port: u8, value: u8) {
        match port {
            0 => self.debug_print(value),
            2 => self.shift_offset = value & 0x07,
            3 => {
                self.trigger_sounds(3, self.out_port3, value);
                self.out_port3 = value;
            }
            4 => self.shift_register = (self.shift_register >> 8) | (u16::from(value) << 8),
            5 => {
                self.trigger_sounds(5, self.out_port5, value);
                self.out_port5 = value;
            }
            6 => {
                self.watchdog_writes += 1;
                log::debug!("watchdog write 0x{value:02X}");
            }
            _ => {}
        }
    }

    /// Last values written to the sound ports (OUT 3, OUT 5).
    pub fn outputs(&self) -> (u8, u8) {
        (self.out_port3, self.out_port5)
    }

    /// Take the sound effects triggered since the last call, oldest first.
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        self.sounds.drain(..).collect()
    }

    /// Debug port text written since the last newline.
    pub fn debug_text(&self) -> &str {
        &self.debug_line
    }

    pub fn watchdog_writes(&self) -> u64 {
        self.watchdog_writes
    }

    // A sound starts on the write that sets its bit; holding the bit does not
    // retrigger it.
    fn trigger_sounds(&mut self, port: u8, previous: u8, value: u8) {
        let rising = value & !previous;
        for trigger in SOUND_TRIGGERS.iter().filter(|t| t.port == port) {
            if rising & (1 << trigger.bit) != 0 {
                log::debug!("sound on: {:?}", trigger.effect);
                if self.sounds.len() == SOUND_QUEUE_CAPACITY {
                    self.sounds.pop_front();
                }
                self.sounds.push_back(trigger.effect);
            }
        }
    }

    // Completed lines go to the log; only the current line is kept.
    fn debug_print(&mut self, value: u8) {
        if value != b'\n' {
            self.debug_line.push(char::from(value));
            if self.debug_line.len() < DEBUG_LINE_LIMIT {
                return;
            }
        }
        log::debug!("port 0: {}", self.debug_line.trim_end());
        self.debug_line.clear();
    }
}

impl Default for InvadersIo {
    fn default() -> Self {
        Self::new(DipConfig::default())
    }
}
