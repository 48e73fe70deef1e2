//! Addressable projector items.

use std::fmt;

/// A projector parameter addressed by a two-byte code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    pub code: [u8; 2],
    pub name: &'static str,
}

impl Item {
    pub const POWER: Item = Item::new([0x01, 0x30], "Power");
    pub const INPUT: Item = Item::new([0x00, 0x01], "Input");
    pub const CALIBRATION_PRESET: Item = Item::new([0x00, 0x02], "Calibration Preset");
    pub const CONTRAST: Item = Item::new([0x00, 0x10], "Contrast");
    pub const BRIGHTNESS: Item = Item::new([0x00, 0x11], "Brightness");
    pub const COLOR: Item = Item::new([0x00, 0x12], "Color");
    pub const HUE: Item = Item::new([0x00, 0x13], "Hue");
    pub const SHARPNESS: Item = Item::new([0x00, 0x14], "Sharpness");
    pub const COLOR_TEMP: Item = Item::new([0x00, 0x17], "Color Temperature");
    pub const LAMP_CONTROL: Item = Item::new([0x00, 0x1A], "Lamp Control");
    pub const CONTRAST_ENHANCER: Item = Item::new([0x00, 0x1C], "Contrast Enhancer");
    pub const IRIS_MODE: Item = Item::new([0x00, 0x1D], "Iris Mode");
    pub const FILM_MODE: Item = Item::new([0x00, 0x1F], "Film Mode");
    pub const ASPECT: Item = Item::new([0x00, 0x20], "Aspect");
    pub const GAMMA_CORRECTION: Item = Item::new([0x00, 0x22], "Gamma Correction");
    pub const OVERSCAN: Item = Item::new([0x00, 0x23], "Overscan");
    pub const NR: Item = Item::new([0x00, 0x25], "Noise Reduction");
    pub const BLOCK_NR: Item = Item::new([0x00, 0x26], "Block Noise Reduction");
    pub const MOSQUITO_NR: Item = Item::new([0x00, 0x27], "Mosquito Noise Reduction");
    pub const PICTURE_MUTING: Item = Item::new([0x00, 0x30], "Picture Muting");
    pub const COLOR_SPACE: Item = Item::new([0x00, 0x3B], "Color Space");
    pub const IRIS_SENSITIVITY: Item = Item::new([0x00, 0x56], "Iris Sensitivity");
    pub const IRIS_MANUAL: Item = Item::new([0x00, 0x57], "Iris Manual");
    pub const FILM_PROJECTION: Item = Item::new([0x00, 0x58], "Film Projection");
    pub const MOTION_ENHANCER: Item = Item::new([0x00, 0x59], "Motion Enhancer");
    pub const XVCOLOR: Item = Item::new([0x00, 0x5A], "xvColor");
    pub const PICTURE_POSITION: Item = Item::new([0x00, 0x66], "Picture Position");
    pub const MPEG_NR: Item = Item::new([0x00, 0x6C], "MPEG Noise Reduction");
    pub const STATUS_ERROR: Item = Item::new([0x01, 0x01], "Status Error");
    pub const STATUS_POWER: Item = Item::new([0x01, 0x02], "Status Power");
    pub const LAMP_USE_TIME: Item = Item::new([0x01, 0x13], "Lamp Use Time");
    pub const IR_POWER_ON: Item = Item::new([0x17, 0x2E], "IR Power On");
    pub const IR_POWER_OFF: Item = Item::new([0x17, 0x2F], "IR Power Off");

    pub const ALL: [Item; 33] = [
        Item::POWER,
        Item::INPUT,
        Item::CALIBRATION_PRESET,
        Item::CONTRAST,
        Item::BRIGHTNESS,
        Item::COLOR,
        Item::HUE,
        Item::SHARPNESS,
        Item::COLOR_TEMP,
        Item::LAMP_CONTROL,
        Item::CONTRAST_ENHANCER,
        Item::IRIS_MODE,
        Item::FILM_MODE,
        Item::ASPECT,
        Item::GAMMA_CORRECTION,
        Item::OVERSCAN,
        Item::NR,
        Item::BLOCK_NR,
        Item::MOSQUITO_NR,
        Item::PICTURE_MUTING,
        Item::COLOR_SPACE,
        Item::IRIS_SENSITIVITY,
        Item::IRIS_MANUAL,
        Item::FILM_PROJECTION,
        Item::MOTION_ENHANCER,
        Item::XVCOLOR,
        Item::PICTURE_POSITION,
        Item::MPEG_NR,
        Item::STATUS_ERROR,
        Item::STATUS_POWER,
        Item::LAMP_USE_TIME,
        Item::IR_POWER_ON,
        Item::IR_POWER_OFF,
    ];

    pub const fn new(code: [u8; 2], name: &'static str) -> Self {
        Self { code, name }
    }

    /// Looks up an item by its code.
    pub fn from_code(code: [u8; 2]) -> Option<Item> {
        Self::ALL.into_iter().find(|item| item.code == code)
    }

    /// Looks up an item by name, ignoring case, spaces, `-` and `_`.
    ///
    /// `"lamp-use-time"`, `"LAMP_USE_TIME"` and `"Lamp Use Time"` all match.
    pub fn from_name(name: &str) -> Option<Item> {
        let wanted = normalize(name);
        Self::ALL
            .into_iter()
            .find(|item| normalize(item.name) == wanted)
    }

    /// Whether this item is an infrared remote code (no response expected).
    pub fn is_ir(&self) -> bool {
        self.code[0] == 0x17
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<[u8; 2]> = Item::ALL.iter().map(|i| i.code).collect();
        assert_eq!(codes.len(), Item::ALL.len());
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Item::from_code([0x00, 0x01]), Some(Item::INPUT));
        assert_eq!(Item::from_code([0x01, 0x02]), Some(Item::STATUS_POWER));
        assert_eq!(Item::from_code([0xEE, 0xEE]), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Item::from_name("lamp-use-time"), Some(Item::LAMP_USE_TIME));
        assert_eq!(Item::from_name("LAMP_USE_TIME"), Some(Item::LAMP_USE_TIME));
        assert_eq!(Item::from_name("Lamp Use Time"), Some(Item::LAMP_USE_TIME));
        assert_eq!(Item::from_name("xvcolor"), Some(Item::XVCOLOR));
        assert_eq!(Item::from_name("volume"), None);
    }

    #[test]
    fn test_is_ir() {
        assert!(Item::IR_POWER_ON.is_ir());
        assert!(Item::IR_POWER_OFF.is_ir());
        assert!(!Item::POWER.is_ir());
    }
}
