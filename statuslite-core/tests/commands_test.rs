use async_trait::async_trait;
use base64::Engine;
use statuslite_core::commands::StatusServices;
use statuslite_core::error::{StatusError, StatusResult};
use statuslite_core::host::{
    ChatContext, HostServices, Invocation, MessageStatsSource, Messenger, MonitorStatsSource,
    PermissionChecker, PluginDirectory, PluginEntry,
};
use statuslite_core::metrics::{MemoryHistory, MemoryProbe, MemorySampler, MemorySamplerConfig};
use statuslite_core::models::{MessageStats, MetricsSnapshot, MonitorStats};
use statuslite_core::plugin::{Plugin, StatusLitePlugin};
use statuslite_core::render::{Dashboard, DashboardRenderer, FontSet};
use statuslite_core::StatusLiteConfig;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text(String),
    Image(String),
}

#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    rejects_images: bool,
}

impl RecordingMessenger {
    fn text_only() -> Self {
        Self {
            rejects_images: true,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(t) => Some(t),
                Sent::Image(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, _chat: &ChatContext, text: &str) -> StatusResult<()> {
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_image(&self, _chat: &ChatContext, base64_png: &str) -> StatusResult<()> {
        if self.rejects_images {
            return Err(StatusError::MessagingFailed("images unsupported".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Image(base64_png.to_string()));
        Ok(())
    }
}

struct FixedPermissions(bool);

#[async_trait]
impl PermissionChecker for FixedPermissions {
    async fn has_permission(&self, _user_id: &str, _plugin: &str, _node: &str) -> bool {
        self.0
    }
}

struct StaticPlugins;

#[async_trait]
impl PluginDirectory for StaticPlugins {
    async fn list_plugins(&self) -> Vec<PluginEntry> {
        vec![
            PluginEntry::new("monitor_status_lite", true),
            PluginEntry::new("weather", true),
            PluginEntry::new("echo", false),
        ]
    }
}

struct FixedMonitor;

#[async_trait]
impl MonitorStatsSource for FixedMonitor {
    async fn monitor_stats(&self) -> Option<MonitorStats> {
        Some(MonitorStats {
            running: true,
            duration_secs: Some(7_200),
            total_restarts: 3,
            memory_leak_restarts: 1,
            crash_count: 2,
            auto_restart_interval_secs: 3_600,
        })
    }
}

struct FixedMessages;

#[async_trait]
impl MessageStatsSource for FixedMessages {
    async fn message_stats(&self) -> Option<MessageStats> {
        Some(MessageStats {
            received_24h: 120,
            sent_24h: 45,
        })
    }
}

struct FailingRenderer;

impl DashboardRenderer for FailingRenderer {
    fn render(&self, _snapshot: &MetricsSnapshot) -> StatusResult<Vec<u8>> {
        Err(StatusError::Render("no canvas".to_string()))
    }
}

struct FixedProbe(f64);

#[async_trait]
impl MemoryProbe for FixedProbe {
    async fn resident_memory_mb(&self) -> StatusResult<f64> {
        Ok(self.0)
    }
}

struct BrokenProbe;

#[async_trait]
impl MemoryProbe for BrokenProbe {
    async fn resident_memory_mb(&self) -> StatusResult<f64> {
        Err(StatusError::ProcessNotFound("1".to_string()))
    }
}

fn config() -> StatusLiteConfig {
    let mut config = StatusLiteConfig::default();
    config.bot.identifier = "123456".to_string();
    config
}

fn host(messenger: Arc<RecordingMessenger>, allowed: bool) -> HostServices {
    HostServices::new(
        messenger,
        Arc::new(FixedPermissions(allowed)),
        Arc::new(StaticPlugins),
    )
}

fn plugin(messenger: Arc<RecordingMessenger>, allowed: bool) -> StatusLitePlugin {
    StatusLitePlugin::new(&config(), host(messenger, allowed)).unwrap()
}

async fn plugin_with_history(
    messenger: Arc<RecordingMessenger>,
    probe: Arc<dyn MemoryProbe>,
    samples: &[f64],
) -> (StatusLitePlugin, MemoryHistory) {
    let config = config();
    let history = MemoryHistory::new(config.sampler.capacity);
    for mb in samples {
        history.push(*mb).await;
    }

    let sampler = MemorySampler::with_history(
        probe,
        history.clone(),
        MemorySamplerConfig::from(&config.sampler),
    );
    let services =
        StatusServices::new(host(messenger, true), &config).with_sampler(Arc::new(sampler));

    (StatusLitePlugin::with_services(services).unwrap(), history)
}

fn invoke(command: &str) -> Invocation {
    Invocation::new("10001", ChatContext::group("20002"), command)
}

mod status_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_sends_png_image() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), true)
            .with_renderer(Arc::new(Dashboard::default().with_fonts(FontSet::bitmap())));

        let outcome = plugin.handle(&invoke("status")).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.notable);
        assert_eq!(outcome.message.as_deref(), Some("status image sent"));

        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        let Sent::Image(encoded) = &sent[0] else {
            panic!("expected an image, got {:?}", sent[0]);
        };
        let png = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_status_falls_back_to_text() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), true).with_renderer(Arc::new(FailingRenderer));

        let outcome = plugin.handle(&invoke("status")).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.notable);
        assert_eq!(outcome.message.as_deref(), Some("status text sent"));

        let texts = messenger.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("❌ Image generation failed:"));
        assert!(texts[0].ends_with("Sending text report..."));

        let report = &texts[1];
        assert!(report.contains("Account: 123456"));
        assert!(report.contains("Memory:"));
        assert!(report.contains("MB"));
        assert!(report.contains("CPU:"));
        assert!(report.contains("Plugins: 2/3 enabled"));
    }

    #[tokio::test]
    async fn test_status_falls_back_to_text_when_image_rejected() {
        let messenger = Arc::new(RecordingMessenger::text_only());
        let plugin = plugin(messenger.clone(), true)
            .with_renderer(Arc::new(Dashboard::default().with_fonts(FontSet::bitmap())));

        let outcome = plugin.handle(&invoke("status")).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("status text sent"));

        let texts = messenger.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("images unsupported"));
        assert!(texts[1].contains("Account: 123456"));
    }

    #[tokio::test]
    async fn test_status_aliases() {
        for alias in ["状态", "about", "关于", "INFO", "status_image", "状态图", "/status"] {
            let messenger = Arc::new(RecordingMessenger::default());
            let plugin = plugin(messenger.clone(), true).with_renderer(Arc::new(FailingRenderer));

            let outcome = plugin.handle(&invoke(alias)).await.unwrap();
            assert_eq!(outcome.message.as_deref(), Some("status text sent"), "{}", alias);
        }
    }

    #[tokio::test]
    async fn test_snapshot_includes_host_feeds() {
        let messenger = Arc::new(RecordingMessenger::default());
        let host = host(messenger, true)
            .with_monitor(Arc::new(FixedMonitor))
            .with_messages(Arc::new(FixedMessages));
        let services = StatusServices::new(host, &config());

        let snapshot = services.snapshot().await;
        assert_eq!(snapshot.plugins.loaded, 3);
        assert_eq!(snapshot.plugins.enabled, 2);
        assert_eq!(snapshot.monitor.unwrap().total_restarts, 3);
        assert_eq!(snapshot.messages.unwrap().received_24h, 120);
        assert!(snapshot.bot.status.is_running());
    }
}

mod sysinfo_tests {
    use super::*;

    #[tokio::test]
    async fn test_sysinfo_text() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), true);

        let outcome = plugin.handle(&invoke("状态文")).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("system info sent"));

        let texts = messenger.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("System Overview"));
        assert!(texts[0].contains("Disks"));
        assert!(texts[0].contains("Boot:"));
    }
}

mod memory_tests {
    use super::*;

    #[tokio::test]
    async fn test_mem_with_equal_samples_is_stable() {
        let messenger = Arc::new(RecordingMessenger::default());
        let (plugin, _history) =
            plugin_with_history(messenger.clone(), Arc::new(FixedProbe(1.0)), &[100.0; 5]).await;

        let outcome = plugin.handle(&invoke("mem")).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.notable);
        assert_eq!(outcome.message.as_deref(), Some("memory analysis sent"));

        let texts = messenger.texts();
        assert_eq!(texts.len(), 1);
        let report = &texts[0];
        assert!(report.contains("last 5 samples"));
        assert!(report.contains("Current: 100.0 MB"));
        assert!(report.contains("Average: 100.0 MB"));
        assert!(report.contains("Peak: 100.0 MB"));
        assert!(report.contains("Low: 100.0 MB"));
        assert!(report.contains("stable"));
    }

    #[tokio::test]
    async fn test_mem_samples_lazily() {
        let messenger = Arc::new(RecordingMessenger::default());
        let (plugin, history) =
            plugin_with_history(messenger.clone(), Arc::new(FixedProbe(256.0)), &[]).await;

        let outcome = plugin.handle(&invoke("memory")).await.unwrap();

        assert_eq!(outcome.message.as_deref(), Some("memory analysis sent"));
        assert_eq!(history.samples().await, vec![256.0]);
        assert!(messenger.texts()[0].contains("collecting data"));
    }

    #[tokio::test]
    async fn test_mem_without_data() {
        let messenger = Arc::new(RecordingMessenger::default());
        let (plugin, _history) =
            plugin_with_history(messenger.clone(), Arc::new(BrokenProbe), &[]).await;

        let outcome = plugin.handle(&invoke("内存分析")).await.unwrap();

        assert!(outcome.success);
        assert!(!outcome.notable);
        assert_eq!(outcome.message.as_deref(), Some("no memory data"));
        assert_eq!(messenger.texts(), vec!["❌ No memory data yet".to_string()]);
    }

    #[tokio::test]
    async fn test_mem_reports_marked_increase() {
        let messenger = Arc::new(RecordingMessenger::default());
        let mut samples = vec![135.0; 5];
        samples.extend([150.0; 5]);
        let (plugin, _history) =
            plugin_with_history(messenger.clone(), Arc::new(FixedProbe(1.0)), &samples).await;

        plugin.handle(&invoke("mem")).await.unwrap();
        assert!(messenger.texts()[0].contains("marked increase (possible leak)"));
    }
}

mod routing_tests {
    use super::*;

    #[tokio::test]
    async fn test_permission_denied() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), false);

        let outcome = plugin.handle(&invoke("sysinfo")).await.unwrap();

        assert!(!outcome.success);
        assert!(!outcome.notable);
        let deny = outcome.message.unwrap();
        assert!(deny.starts_with("❌"));
        assert_eq!(messenger.texts(), vec![deny]);
    }

    #[tokio::test]
    async fn test_help_needs_no_permission() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), false);

        let outcome = plugin.handle(&invoke("监控帮助")).await.unwrap();

        assert!(outcome.success);
        let texts = messenger.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("/status"));
        assert!(texts[0].contains("/mem"));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let messenger = Arc::new(RecordingMessenger::default());
        let plugin = plugin(messenger.clone(), true);

        let err = plugin.handle(&invoke("reboot")).await.unwrap_err();
        assert_eq!(err.error_code(), "E10001");
        assert!(messenger.sent().is_empty());
    }
}

mod plugin_tests {
    use super::*;

    #[tokio::test]
    async fn test_registration_metadata() {
        let plugin = plugin(Arc::new(RecordingMessenger::default()), true);

        assert_eq!(plugin.info().name, "monitor_status_lite");

        let nodes = plugin.permission_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "access");
        assert!(!nodes[0].description.is_empty());

        let commands = plugin.commands();
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(commands.len(), 4);
        for name in ["status", "sysinfo", "mem", "mhelp"] {
            assert!(names.contains(&name), "{}", name);
        }

        let status = commands.iter().find(|c| c.name == "status").unwrap();
        assert_eq!(status.priority, 10);
        assert_eq!(status.aliases.len(), 6);

        let help = commands.iter().find(|c| c.name == "mhelp").unwrap();
        assert!(help.permission.is_none());
    }

    #[tokio::test]
    async fn test_init_and_shutdown() {
        let mut plugin = plugin(Arc::new(RecordingMessenger::default()), true);

        plugin.init().await.unwrap();
        assert!(plugin.is_initialized());
        assert!(plugin.services().sampler.is_running());

        plugin.shutdown().await.unwrap();
        assert!(!plugin.is_initialized());
        assert!(!plugin.services().sampler.is_running());
    }

    #[tokio::test]
    async fn test_shutdown_without_init() {
        let mut plugin = plugin(Arc::new(RecordingMessenger::default()), true);
        plugin.shutdown().await.unwrap();
    }
}
