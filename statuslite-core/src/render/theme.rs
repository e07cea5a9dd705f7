use image::Rgba;

use crate::models::BotStatus;

pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba<u8>,
    pub card: Rgba<u8>,
    pub title: Rgba<u8>,
    pub text: Rgba<u8>,
    pub value: Rgba<u8>,
    pub bar_track: Rgba<u8>,
    pub brand: Rgba<u8>,
    pub success: Rgba<u8>,
    pub warning: Rgba<u8>,
    pub danger: Rgba<u8>,
    pub cyan: Rgba<u8>,
    pub purple: Rgba<u8>,
}

impl Palette {
    pub const fn dark() -> Self {
        Self {
            background: rgb(22, 22, 28),
            card: rgb(32, 32, 40),
            title: rgb(255, 255, 255),
            text: rgb(170, 170, 180),
            value: rgb(235, 235, 245),
            bar_track: rgb(50, 50, 58),
            brand: rgb(99, 132, 255),
            success: rgb(72, 199, 142),
            warning: rgb(255, 193, 69),
            danger: rgb(255, 99, 99),
            cyan: rgb(69, 199, 227),
            purple: rgb(167, 139, 250),
        }
    }

    /// Green below 60%, amber below 85%, red otherwise.
    pub fn usage_color(&self, percent: f64) -> Rgba<u8> {
        if percent < 60.0 {
            self.success
        } else if percent < 85.0 {
            self.warning
        } else {
            self.danger
        }
    }

    pub fn status_color(&self, status: BotStatus) -> Rgba<u8> {
        if status.is_running() {
            self.success
        } else {
            self.danger
        }
    }

    pub fn running_color(&self, running: bool) -> Rgba<u8> {
        if running {
            self.success
        } else {
            self.danger
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

pub fn usage_color(percent: f64) -> Rgba<u8> {
    Palette::dark().usage_color(percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_color_boundaries() {
        let palette = Palette::dark();
        assert_eq!(usage_color(0.0), palette.success);
        assert_eq!(usage_color(59.9), palette.success);
        assert_eq!(usage_color(60.0), palette.warning);
        assert_eq!(usage_color(84.9), palette.warning);
        assert_eq!(usage_color(85.0), palette.danger);
        assert_eq!(usage_color(100.0), palette.danger);
    }

    #[test]
    fn test_status_color() {
        let palette = Palette::dark();
        assert_eq!(palette.status_color(BotStatus::Running), palette.success);
        assert_eq!(palette.status_color(BotStatus::Unknown), palette.danger);
    }
}
