use otgw_api::MessageType;

/// Frame-level parity bit, set so the frame has an even number of ones.
const PARITY_BIT: u32 = 0x8000_0000;

/// Data ids the simulated thermostat polls, in order.
const POLLED_IDS: [u8; 5] = [0, 1, 25, 17, 28];

pub fn compose_frame(message_type: MessageType, data_id: u8, value: u16) -> u32 {
    let frame = ((message_type.code() as u32) << 28) | ((data_id as u32) << 16) | value as u32;

    if frame.count_ones() % 2 == 1 {
        frame | PARITY_BIT
    } else {
        frame
    }
}

/// Encodes a temperature as signed 8.8 fixed point.
pub fn to_f88(value: f64) -> u16 {
    ((value * 256.0).round() as i16) as u16
}

/// Boiler flow temperature over one burner cycle: heats while the flame is
/// on for the first 40% of the cycle, then decays towards the return temperature.
pub fn simulated_flow_temperature(cycle_fraction: f64) -> f64 {
    const RETURN_TEMPERATURE: f64 = 35.0;
    const PEAK_TEMPERATURE: f64 = 62.0;
    const BURN_SHARE: f64 = 0.4;

    if cycle_fraction < BURN_SHARE {
        let radians = (cycle_fraction / BURN_SHARE) * std::f64::consts::FRAC_PI_2;
        RETURN_TEMPERATURE + radians.sin() * (PEAK_TEMPERATURE - RETURN_TEMPERATURE)
    } else {
        let decay = (cycle_fraction - BURN_SHARE) / (1.0 - BURN_SHARE);
        PEAK_TEMPERATURE - decay * (PEAK_TEMPERATURE - RETURN_TEMPERATURE)
    }
}

pub fn simulated_flame(cycle_fraction: f64) -> bool {
    cycle_fraction < 0.4
}

/// One thermostat request and the boiler's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub request: u32,
    pub response: u32,
}

/// Steps through a burner cycle, producing request/response frame pairs.
pub struct BoilerSimulator {
    step: u32,
    cycle_steps: u32,
    heating_enabled: bool,
}

impl BoilerSimulator {
    pub fn new(cycle_steps: u32) -> Self {
        Self {
            step: 0,
            cycle_steps: cycle_steps.max(1),
            heating_enabled: true,
        }
    }

    pub fn set_heating_enabled(&mut self, enabled: bool) {
        self.heating_enabled = enabled;
    }

    pub fn cycle_fraction(&self) -> f64 {
        (self.step % self.cycle_steps) as f64 / self.cycle_steps as f64
    }

    pub fn flow_temperature(&self) -> f64 {
        if self.heating_enabled {
            simulated_flow_temperature(self.cycle_fraction())
        } else {
            simulated_flow_temperature(1.0)
        }
    }

    pub fn flame_on(&self) -> bool {
        self.heating_enabled && simulated_flame(self.cycle_fraction())
    }

    pub fn next_exchange(&mut self) -> Exchange {
        let data_id = POLLED_IDS[self.step as usize % POLLED_IDS.len()];
        let flow = self.flow_temperature();

        let exchange = match data_id {
            0 => {
                let master = if self.heating_enabled { 0x01 } else { 0x00 };
                let slave = if self.flame_on() { 0x0A } else { 0x00 };
                Exchange {
                    request: compose_frame(MessageType::ReadData, 0, master << 8),
                    response: compose_frame(MessageType::ReadAck, 0, (master << 8) | slave),
                }
            }
            1 => {
                let setpoint = to_f88(if self.heating_enabled { 60.0 } else { 10.0 });
                Exchange {
                    request: compose_frame(MessageType::WriteData, 1, setpoint),
                    response: compose_frame(MessageType::WriteAck, 1, setpoint),
                }
            }
            17 => {
                let modulation = if self.flame_on() { 45.0 } else { 0.0 };
                Exchange {
                    request: compose_frame(MessageType::ReadData, 17, 0),
                    response: compose_frame(MessageType::ReadAck, 17, to_f88(modulation)),
                }
            }
            28 => Exchange {
                request: compose_frame(MessageType::ReadData, 28, 0),
                response: compose_frame(MessageType::ReadAck, 28, to_f88(flow - 8.0)),
            },
            id => Exchange {
                request: compose_frame(MessageType::ReadData, id, 0),
                response: compose_frame(MessageType::ReadAck, id, to_f88(flow)),
            },
        };

        self.step = self.step.wrapping_add(1);
        exchange
    }
}
