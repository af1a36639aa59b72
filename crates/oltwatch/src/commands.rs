// ── Command handlers ──

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use oltwatch_core::{
    BroadcastNotifier, MemoryAlarmStore, MemoryInventory, MemoryMetricStore, MonitorService,
    OltClient,
};
use oltwatch_snmp::{SnmpCredentials, SnmpTarget, SnmpVersion};

use crate::cli::{GlobalOpts, ProbeArgs};
use crate::error::CliError;

/// Run the monitoring daemon until ctrl-c.
pub async fn run_daemon(global: &GlobalOpts) -> Result<(), CliError> {
    let config = oltwatch_config::load(global.config.as_deref())?;
    let resolved = config.resolve()?;

    if resolved.devices.is_empty() {
        warn!("no devices configured -- the daemon will idle");
    }

    let inventory = Arc::new(MemoryInventory::new());
    for device in resolved.devices {
        info!(device = %device.id, host = %device.host, "device registered");
        inventory.add_device(device);
    }

    let metrics = Arc::new(MemoryMetricStore::new());
    let alarms = Arc::new(MemoryAlarmStore::new());
    let notifier = Arc::new(BroadcastNotifier::default());

    // Event log: each published event as one JSON line at info level.
    let mut events = notifier.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(event.as_ref()) {
                Ok(json) => info!(target: "oltwatch::events", "{json}"),
                Err(err) => warn!(error = %err, "event serialization failed"),
            }
        }
    });

    let service = MonitorService::new(
        resolved.monitor,
        resolved.thresholds,
        inventory,
        metrics,
        alarms,
        notifier,
    );
    service.start().await;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "signal handler failed; shutting down");
    }
    info!("shutting down");
    service.stop().await;

    Ok(())
}

/// One-shot probe: liveness test plus device discovery, printed to
/// stdout.
pub async fn probe(args: &ProbeArgs) -> Result<(), CliError> {
    let version: SnmpVersion = args.version.parse()?;
    let target = SnmpTarget {
        host: args.host.clone(),
        port: args.port,
        version,
        credentials: SnmpCredentials::community(args.community.clone()),
        timeout: Duration::from_secs(args.timeout),
        retries: args.retries,
    };

    let client = OltClient::connect(target).await?;

    if !client.test_connection().await {
        println!("{}: no response", args.host);
        return Ok(());
    }
    println!("{}: reachable", args.host);

    let info = client.discover_device_info().await?;
    println!("  system name:  {}", info.system_name);
    println!("  description:  {}", info.system_description);
    println!("  firmware:     {}", info.firmware_version);
    println!("  hardware:     {}", info.hardware_version);
    println!("  serial:       {}", info.serial_number);
    println!("  cpu usage:    {:.1} %", info.cpu_usage);
    println!("  memory usage: {:.1} %", info.memory_usage);
    println!("  temperature:  {:.1} °C", info.temperature);

    let ports = client.discover_all_ports().await?;
    println!("  ports:        {}", ports.len());
    for port in &ports {
        println!(
            "    {}/{}  admin={} oper={} rx={:.2} dBm tx={:.2} dBm onts={}",
            port.slot,
            port.port,
            if port.admin_enabled { "enabled" } else { "disabled" },
            port.oper_status,
            port.optical_power_rx_dbm,
            port.optical_power_tx_dbm,
            port.ont_count,
        );
    }

    Ok(())
}
