/// Instantaneous logic level of the serial line.
///
/// A UART line idles high; a frame starts with a falling edge into the
/// low start bit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Level {
    Low,
    #[default]
    High,
}

impl Level {
    /// Level of an idle line.
    pub const IDLE: Level = Level::High;

    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Any non-zero sample value reads as high.
impl From<u8> for Level {
    #[inline]
    fn from(value: u8) -> Self {
        Level::from(value != 0)
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> Self {
        level.is_high()
    }
}
