#![allow(clippy::unwrap_used)]
// Integration tests for the C320 adapter against the scripted UDP agent.

mod common;

use common::AgentBuilder;

use oltwatch_core::adapter::OltClient;
use oltwatch_core::model::{OntStatus, PortStatus};

async fn connect(agent: &common::MockAgent) -> OltClient {
    let device = agent.device("olt-1");
    OltClient::connect(device.snmp_target()).await.unwrap()
}

fn lab_shelf() -> AgentBuilder {
    AgentBuilder::new()
        .system("olt-lab-01", "ZXA10 C320", "V2.1.0P3", "C320A1B2C3")
        .performance(42, 61, 48)
}

#[tokio::test]
async fn discover_device_info_decodes_identity_and_performance() {
    let agent = lab_shelf().spawn().await;
    let client = connect(&agent).await;

    let info = client.discover_device_info().await.unwrap();
    assert_eq!(info.system_name, "olt-lab-01");
    assert_eq!(info.system_description, "ZXA10 C320");
    assert_eq!(info.firmware_version, "V2.1.0P3");
    assert_eq!(info.serial_number, "C320A1B2C3");
    assert_eq!(info.cpu_usage, 42.0);
    assert_eq!(info.memory_usage, 61.0);
    assert_eq!(info.temperature, 48.0);
}

#[tokio::test]
async fn port_info_applies_fixed_point_scaling() {
    let agent = lab_shelf().port(1, 2, -2550).spawn().await;
    let client = connect(&agent).await;

    let port = client.get_port_info(1, 2).await.unwrap().unwrap();
    assert_eq!(port.optical_power_rx_dbm, -25.50);
    assert_eq!(port.optical_power_tx_dbm, 2.50);
    assert_eq!(port.temperature_c, 41.50);
    assert_eq!(port.voltage_v, 3.3);
    assert_eq!(port.bias_current_ma, 12.5);
    assert!(port.admin_enabled);
    assert_eq!(port.oper_status, PortStatus::Up);
    assert_eq!(port.rx_bytes, 1_000_000);
}

#[tokio::test]
async fn port_info_for_unknown_index_is_none() {
    let agent = lab_shelf().port(1, 2, -2000).spawn().await;
    let client = connect(&agent).await;

    assert!(client.get_port_info(9, 9).await.unwrap().is_none());
}

#[tokio::test]
async fn ont_status_codes_decode_to_closed_enum() {
    let agent = lab_shelf()
        .port(1, 1, -2000)
        .ont(1, 1, 1, 1, "ZTEG0001")
        .ont(1, 1, 2, 3, "ZTEG0002")
        .ont(1, 1, 3, 77, "ZTEG0003")
        .spawn()
        .await;
    let client = connect(&agent).await;

    let online = client.get_ont_info(1, 1, 1).await.unwrap().unwrap();
    assert_eq!(online.status, OntStatus::Online);
    assert_eq!(online.serial_number, "ZTEG0001");
    assert_eq!(online.rx_power_dbm, -22.10);

    let gasp = client.get_ont_info(1, 1, 2).await.unwrap().unwrap();
    assert_eq!(gasp.status, OntStatus::DyingGasp);

    // Unrecognized vendor code maps to Unknown, never an error.
    let odd = client.get_ont_info(1, 1, 3).await.unwrap().unwrap();
    assert_eq!(odd.status, OntStatus::Unknown);
}

#[tokio::test]
async fn discover_all_ports_walks_the_index() {
    let agent = lab_shelf()
        .port(1, 1, -2000)
        .port(1, 2, -2100)
        .port(2, 1, -2200)
        .spawn()
        .await;
    let client = connect(&agent).await;

    let ports = client.discover_all_ports().await.unwrap();
    assert_eq!(ports.len(), 3);
    let indices: Vec<(u32, u32)> = ports.iter().map(|p| (p.slot, p.port)).collect();
    assert_eq!(indices, vec![(1, 1), (1, 2), (2, 1)]);
}

#[tokio::test]
async fn ont_discovery_isolates_a_failing_fetch() {
    // Three ONTs on the port; the detail fetch for #2 is poisoned so its
    // bulk GET fails. Discovery must still return the other two.
    let poisoned = common::oid(common::ONT_SERIAL).extend(&[1, 1, 2]);
    let agent = lab_shelf()
        .port(1, 1, -2000)
        .ont(1, 1, 1, 1, "ZTEG0001")
        .ont(1, 1, 2, 1, "ZTEG0002")
        .ont(1, 1, 3, 2, "ZTEG0003")
        .poison(poisoned)
        .spawn()
        .await;
    let client = connect(&agent).await;

    let onts = client.discover_all_onts(1, 1).await.unwrap();
    assert_eq!(onts.len(), 2);
    let ids: Vec<u32> = onts.iter().map(|o| o.ont_id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_connection_reflects_liveness() {
    let live = lab_shelf().spawn().await;
    let client = connect(&live).await;
    assert!(client.test_connection().await);

    // An agent with no sysName answers, but the probe value is absent.
    let empty = AgentBuilder::new().spawn().await;
    let device = empty.device("olt-2");
    let client = OltClient::connect(device.snmp_target()).await.unwrap();
    assert!(!client.test_connection().await);
}

#[tokio::test]
async fn provisioning_writes_report_success() {
    let agent = lab_shelf().port(1, 1, -2000).spawn().await;
    let client = connect(&agent).await;

    assert!(client.provision_ont(1, 1, 4, "ZTEG0099").await);
    assert!(client.reboot_ont(1, 1, 4).await);
    assert!(client.set_port_enabled(1, 1, false).await);
}

#[tokio::test]
async fn rejected_write_reports_failure() {
    let locked = common::oid(common::ONT_REBOOT).extend(&[1, 1, 4]);
    let agent = lab_shelf().poison(locked).spawn().await;
    let client = connect(&agent).await;

    assert!(!client.reboot_ont(1, 1, 4).await);
}

#[tokio::test]
async fn unreachable_device_surfaces_as_transport_error() {
    let agent = lab_shelf().silent().spawn().await;
    let device = agent.device("olt-3");
    let client = OltClient::connect(device.snmp_target()).await.unwrap();

    let result = client.discover_device_info().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn v3_device_is_rejected_at_session_setup() {
    let agent = lab_shelf().spawn().await;
    let mut device = agent.device("olt-4");
    device.snmp.version = oltwatch_snmp::SnmpVersion::V3;

    let result = OltClient::connect(device.snmp_target()).await;
    assert!(result.is_err());
}
