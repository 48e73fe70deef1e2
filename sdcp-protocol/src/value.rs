//! Data codes carried in item payloads.

use serde::Serialize;
use std::fmt;

/// Payload of a query; the device expects two placeholder bytes.
pub const QUERY_DATA: [u8; 2] = [0x00, 0x00];

/// Decodes a big-endian numeric setting.
pub fn decode_u16(data: &[u8]) -> Option<u16> {
    match data {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

/// Encodes a numeric setting.
pub fn encode_u16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// On/off settings such as picture muting, overscan or xvColor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Switch {
    Off,
    On,
}

impl Switch {
    pub fn data_code(self) -> [u8; 2] {
        match self {
            Switch::Off => [0x00, 0x00],
            Switch::On => [0x00, 0x01],
        }
    }

    /// Anything other than the `On` code reads as `Off`.
    pub fn from_data_code(data: &[u8]) -> Self {
        if data == Switch::On.data_code() {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

/// Power state reported by the status power item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerStatus {
    Standby,
    StartUp,
    StartUpLamp,
    PowerOn,
    Cooling1,
    Cooling2,
    SavingCooling1,
    SavingCooling2,
    SavingStandby,
}

impl PowerStatus {
    const ALL: [PowerStatus; 9] = [
        PowerStatus::Standby,
        PowerStatus::StartUp,
        PowerStatus::StartUpLamp,
        PowerStatus::PowerOn,
        PowerStatus::Cooling1,
        PowerStatus::Cooling2,
        PowerStatus::SavingCooling1,
        PowerStatus::SavingCooling2,
        PowerStatus::SavingStandby,
    ];

    pub fn data_code(self) -> [u8; 2] {
        match self {
            PowerStatus::Standby => [0x00, 0x00],
            PowerStatus::StartUp => [0x00, 0x01],
            PowerStatus::StartUpLamp => [0x00, 0x02],
            PowerStatus::PowerOn => [0x00, 0x03],
            PowerStatus::Cooling1 => [0x00, 0x04],
            PowerStatus::Cooling2 => [0x00, 0x05],
            PowerStatus::SavingCooling1 => [0x00, 0x06],
            PowerStatus::SavingCooling2 => [0x00, 0x07],
            PowerStatus::SavingStandby => [0x00, 0x08],
        }
    }

    /// Returns `None` for codes the device is not known to send.
    pub fn from_data_code(data: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|s| data == s.data_code())
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerStatus::Standby => "Standby",
            PowerStatus::StartUp => "Start Up",
            PowerStatus::StartUpLamp => "Startup Lamp",
            PowerStatus::PowerOn => "Power On",
            PowerStatus::Cooling1 => "Cooling1",
            PowerStatus::Cooling2 => "Cooling2",
            PowerStatus::SavingCooling1 => "Saving Cooling1",
            PowerStatus::SavingCooling2 => "Saving Cooling2",
            PowerStatus::SavingStandby => "Saving Standby",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_codec() {
        assert_eq!(encode_u16(0x1234), [0x12, 0x34]);
        assert_eq!(decode_u16(&[0x12, 0x34]), Some(0x1234));
        assert_eq!(decode_u16(&[0x00, 0x32, 0xFF]), Some(50));
        assert_eq!(decode_u16(&[0xFF]), None);
    }

    #[test]
    fn test_switch() {
        assert_eq!(Switch::from_data_code(&[0x00, 0x01]), Switch::On);
        assert_eq!(Switch::from_data_code(&[0x00, 0x00]), Switch::Off);
        assert_eq!(Switch::from_data_code(&[0xFF]), Switch::Off);
        assert_eq!(Switch::from(true).data_code(), [0x00, 0x01]);
    }

    #[test]
    fn test_power_status() {
        for status in PowerStatus::ALL {
            assert_eq!(PowerStatus::from_data_code(&status.data_code()), Some(status));
        }
        assert_eq!(PowerStatus::from_data_code(&[0x00, 0x09]), None);
        assert_eq!(PowerStatus::from_data_code(&[0xFF]), None);
        assert_eq!(PowerStatus::PowerOn.to_string(), "Power On");
    }
}
