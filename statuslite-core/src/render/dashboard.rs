use image::RgbaImage;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::StatusResult;
use crate::metrics::{format_duration, DurationUnits};
use crate::models::{MetricsSnapshot, NOT_AVAILABLE};

use super::canvas::{encode_png, Painter, Weight, FONT_HEADER, FONT_MAIN, FONT_SMALL, FONT_VALUE};
use super::fonts::FontSet;
use super::theme::Palette;

pub const CANVAS_WIDTH: u32 = 1100;
pub const BASE_HEIGHT: u32 = 920;
pub const MAX_DISK_ROWS: usize = 5;

const DISK_ROW_HEIGHT: u32 = 35;
const BASE_DISK_ROWS: usize = 3;
const CARD_MARGIN: i32 = 25;
const CARD_GAP: i32 = 12;
const CARDS_TOP: i32 = 80;

/// Turns a snapshot into encoded image bytes.
pub trait DashboardRenderer: Send + Sync {
    fn render(&self, snapshot: &MetricsSnapshot) -> StatusResult<Vec<u8>>;
}

/// Canvas height for the given number of disks. The canvas grows with every
/// disk past the third even though only the first [`MAX_DISK_ROWS`] are drawn.
pub fn canvas_height(disk_count: usize) -> u32 {
    BASE_HEIGHT + disk_count.saturating_sub(BASE_DISK_ROWS) as u32 * DISK_ROW_HEIGHT
}

pub fn disk_card_height(disk_count: usize) -> i32 {
    let shown = disk_count.min(MAX_DISK_ROWS) as i32;
    (35 * shown + 55).max(90)
}

/// A vertical stack of cards sharing one x position and width.
struct Column {
    x: i32,
    width: i32,
    y: i32,
}

impl Column {
    fn new(x: i32, width: i32) -> Self {
        Self {
            x,
            width,
            y: CARDS_TOP,
        }
    }

    fn card<F>(&mut self, painter: &mut Painter<'_>, title: &str, height: i32, content: F)
    where
        F: FnOnce(&mut Painter<'_>, i32, i32, i32),
    {
        let bottom = painter.card(title, self.x, self.y, self.width, height);
        content(painter, self.x + 18, self.y + 42, self.width - 36);
        self.y = bottom + CARD_GAP;
    }
}

/// Two-column card layout of a [`MetricsSnapshot`].
pub struct Dashboard {
    fonts: FontSet,
    palette: Palette,
    title: String,
    units: DurationUnits,
}

impl Dashboard {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            fonts: FontSet::load(config),
            palette: Palette::default(),
            title: config.title.clone(),
            units: DurationUnits::default(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_units(mut self, units: DurationUnits) -> Self {
        self.units = units;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn compose(&self, snapshot: &MetricsSnapshot) -> StatusResult<RgbaImage> {
        let disk_count = snapshot.overview.disks.len();
        let height = canvas_height(disk_count);
        let mut painter = Painter::new(CANVAS_WIDTH, height, &self.fonts, self.palette)?;

        self.draw_header(&mut painter, snapshot);

        let card_width = (CANVAS_WIDTH as i32 - CARD_MARGIN * 3) / 2;

        let mut left = Column::new(CARD_MARGIN, card_width);
        left.card(&mut painter, "System Info", 180, |p, x, y, w| {
            self.draw_system_info(p, x, y, w, snapshot)
        });
        left.card(&mut painter, "Resource Usage", 165, |p, x, y, w| {
            self.draw_resources(p, x, y, w, snapshot)
        });
        left.card(&mut painter, "Monitor Stats", 195, |p, x, y, w| {
            self.draw_monitor(p, x, y, w, snapshot)
        });
        left.card(&mut painter, "Message Stats (24h)", 105, |p, x, y, w| {
            self.draw_messages(p, x, y, w, snapshot)
        });

        let mut right = Column::new(CARD_MARGIN * 2 + card_width, card_width);
        right.card(&mut painter, "Bot Status", 195, |p, x, y, w| {
            self.draw_bot(p, x, y, w, snapshot)
        });
        right.card(&mut painter, "Disk Space", disk_card_height(disk_count), |p, x, y, w| {
            self.draw_disks(p, x, y, w, snapshot)
        });
        right.card(&mut painter, "Plugin Info", 105, |p, x, y, w| {
            self.draw_plugins(p, x, y, w, snapshot)
        });

        debug!(width = CANVAS_WIDTH, height, disks = disk_count, "Dashboard composed");

        Ok(painter.into_image())
    }

    fn draw_header(&self, painter: &mut Painter<'_>, snapshot: &MetricsSnapshot) {
        let palette = self.palette;
        painter.text(30, 22, FONT_HEADER, Weight::Bold, palette.title, &self.title);

        let timestamp = snapshot.taken_at.format("%Y-%m-%d %H:%M:%S").to_string();
        painter.text(
            CANVAS_WIDTH as i32 - 165,
            32,
            FONT_SMALL,
            Weight::Regular,
            palette.text,
            &timestamp,
        );
    }

    fn draw_system_info(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        _width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let system = &snapshot.overview.system;
        let os = format!("{} {}", system.os_name, system.os_version);
        let rows = [
            ("OS", os.trim()),
            ("Version", system.os_full_version.as_str()),
            ("Runtime", system.runtime_version.as_str()),
            ("Uptime", system.boot_elapsed.as_str()),
        ];

        for (i, (label, value)) in rows.iter().enumerate() {
            painter.info_row(label, value, x, y + i as i32 * 30, None);
        }
    }

    fn draw_resources(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let resources = &snapshot.overview.resources;

        painter.progress_bar("CPU", resources.cpu_percent as f64, x, y, width - 15, None);

        let detail = format!("{:.1}G / {:.1}G", resources.ram_used_gb, resources.ram_total_gb);
        painter.progress_bar("RAM", resources.ram_percent, x, y + 45, width - 15, Some(&detail));

        let bot_memory = format!("{:.1} MB", snapshot.bot.memory_mb());
        painter.info_row("Bot RSS", &bot_memory, x, y + 95, None);
    }

    fn draw_monitor(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        _width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let palette = self.palette;
        let monitor = snapshot.monitor_or_default();
        let status = if monitor.running { "Running" } else { "Not running" };

        painter.text(x, y, FONT_MAIN, Weight::Regular, palette.text, "Monitor");
        painter.text(
            x + 85,
            y,
            FONT_VALUE,
            Weight::Bold,
            palette.running_color(monitor.running),
            status,
        );

        let duration = monitor
            .duration_secs
            .map(|secs| format_duration(secs as i64, &self.units))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let rows = [
            ("Duration", duration),
            ("Restarts", monitor.total_restarts.to_string()),
            ("Mem restart", monitor.memory_leak_restarts.to_string()),
            ("Crashes", monitor.crash_count.to_string()),
            ("Scheduled", monitor.auto_restart_label()),
        ];

        for (i, (label, value)) in rows.iter().enumerate() {
            painter.info_row(label, value, x, y + 28 + i as i32 * 28, None);
        }
    }

    fn draw_messages(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        _width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let palette = self.palette;
        let messages = snapshot.messages_or_default();

        painter.info_row("Received", &messages.received_24h.to_string(), x, y, Some(palette.cyan));
        painter.info_row("Sent", &messages.sent_24h.to_string(), x, y + 28, Some(palette.purple));
    }

    fn draw_bot(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        _width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let palette = self.palette;
        let bot = &snapshot.bot;
        let rows = [
            ("Status", bot.status.to_string(), palette.status_color(bot.status)),
            ("PID", bot.pid_label(), palette.value),
            ("Uptime", bot.uptime_label(&self.units), palette.value),
            ("Threads", bot.threads_label(), palette.value),
            ("Account", bot.identifier.clone(), palette.cyan),
        ];

        for (i, (label, value, color)) in rows.iter().enumerate() {
            painter.info_row(label, value, x, y + i as i32 * 28, Some(*color));
        }
    }

    fn draw_disks(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let palette = self.palette;
        let disks = &snapshot.overview.disks;

        if disks.is_empty() {
            painter.text(
                x,
                y,
                FONT_MAIN,
                Weight::Regular,
                palette.text,
                "No disk information available",
            );
            return;
        }

        for (i, disk) in disks.iter().take(MAX_DISK_ROWS).enumerate() {
            let label = disk.mount_point.replace('\\', "");
            let detail = format!("{:.0}G / {:.0}G", disk.used_gb, disk.total_gb);
            let row_y = y + i as i32 * 32;
            painter.mini_progress_bar(&label, disk.percent, x, row_y, width - 15, &detail);
        }
    }

    fn draw_plugins(
        &self,
        painter: &mut Painter<'_>,
        x: i32,
        y: i32,
        _width: i32,
        snapshot: &MetricsSnapshot,
    ) {
        let palette = self.palette;
        let plugins = snapshot.plugins;

        painter.info_row(
            "Loaded",
            &format!("{} plugins", plugins.loaded),
            x,
            y,
            Some(palette.success),
        );
        painter.info_row("Enabled", &plugins.enabled.to_string(), x, y + 28, Some(palette.cyan));
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl DashboardRenderer for Dashboard {
    fn render(&self, snapshot: &MetricsSnapshot) -> StatusResult<Vec<u8>> {
        let image = self.compose(snapshot)?;
        encode_png(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_height() {
        assert_eq!(canvas_height(0), 920);
        assert_eq!(canvas_height(3), 920);
        assert_eq!(canvas_height(4), 955);
        assert_eq!(canvas_height(5), 990);
        assert_eq!(canvas_height(8), 1095);
        assert_eq!(canvas_height(12), 1235);
    }

    #[test]
    fn test_disk_card_height() {
        assert_eq!(disk_card_height(0), 90);
        assert_eq!(disk_card_height(1), 90);
        assert_eq!(disk_card_height(2), 125);
        assert_eq!(disk_card_height(5), 230);
        assert_eq!(disk_card_height(9), 230);
    }

    #[test]
    fn test_tallest_layout_fits_canvas() {
        // right column: bot + disks + plugins, with gaps, below the header
        let bottom = CARDS_TOP + 195 + CARD_GAP + disk_card_height(5) + CARD_GAP + 105;
        assert!(bottom <= canvas_height(5) as i32);

        let left = CARDS_TOP + 180 + 165 + 195 + 105 + 3 * CARD_GAP;
        assert!(left <= canvas_height(0) as i32);
    }
}
