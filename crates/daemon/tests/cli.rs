use flightmap_common::protocol::DEFAULT_HOST;
use flightmap_common::{Address, Port};
use flightmap_core::RegistryClient;
use std::io::Write;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time::{sleep, timeout, Instant};

const BINARY: &str = env!("CARGO_BIN_EXE_flightmap");

/// A server process and the rest of its stdout after the announced port
struct Server {
    _child: Child,
    port: u16,
    stdout: Lines<BufReader<ChildStdout>>,
}

async fn spawn_server(args: &[&str]) -> Server {
    let mut child = Command::new(BINARY)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stdout = BufReader::new(child.stdout.take().unwrap()).lines();
    let first = timeout(Duration::from_secs(10), stdout.next_line())
        .await
        .expect("server never announced a port")
        .unwrap()
        .unwrap();

    Server {
        _child: child,
        port: first.parse().unwrap(),
        stdout,
    }
}

async fn run(args: &[&str]) -> Output {
    timeout(
        Duration::from_secs(20),
        Command::new(BINARY).args(args).kill_on_drop(true).output(),
    )
    .await
    .unwrap()
    .unwrap()
}

fn address(port: u16) -> Address {
    Address::from(Port::new(port).unwrap())
}

fn dead_port() -> u16 {
    let listener = std::net::TcpListener::bind((DEFAULT_HOST, 0)).unwrap();
    listener.local_addr().unwrap().port()
}

/// Poll until `name` shows up in the registry
async fn wait_for_mapping(mapper: u16, name: &str) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let mut client = RegistryClient::connect(DEFAULT_HOST, &address(mapper))
            .await
            .unwrap();
        if client.query(name).await.unwrap().is_some() {
            return;
        }
        assert!(Instant::now() < deadline, "{} was never registered", name);
        sleep(Duration::from_millis(50)).await;
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test]
async fn test_mapper_announces_port_once() {
    let mut mapper = spawn_server(&["mapper"]).await;
    assert_ne!(mapper.port, 0);

    let mut client = RegistryClient::connect(DEFAULT_HOST, &address(mapper.port))
        .await
        .unwrap();
    assert_eq!(client.query("BNE").await.unwrap(), None);

    let more = timeout(Duration::from_millis(300), mapper.stdout.next_line()).await;
    assert!(more.is_err(), "mapper printed more than its port");
}

#[tokio::test]
async fn test_roc_prints_results_before_failing() {
    let mapper = spawn_server(&["mapper"]).await;
    let mapper_port = mapper.port.to_string();
    let _control = spawn_server(&["control", "BNE", "Brisbane", &mapper_port]).await;
    wait_for_mapping(mapper.port, "BNE").await;

    let dead = dead_port().to_string();
    let output = run(&["roc", "QF1", &mapper_port, "BNE", &dead]).await;

    assert_eq!(stdout(&output), "Brisbane\n");
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("Failed to connect to at least one destination"));
}

#[tokio::test]
async fn test_roc_unresolved_name() {
    let mapper = spawn_server(&["mapper"]).await;
    let mapper_port = mapper.port.to_string();

    let output = run(&["roc", "QF1", &mapper_port, "NOWHERE"]).await;

    assert_eq!(stdout(&output), "");
    assert_eq!(output.status.code(), Some(5));
}

#[tokio::test]
async fn test_roc_needs_a_mapper_for_names() {
    let output = run(&["roc", "QF1", "-", "BNE"]).await;
    assert_eq!(output.status.code(), Some(3));

    let output = run(&["roc", "QF1", "0", "BNE"]).await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_control_rejects_ids_before_any_traffic() {
    let mapper = spawn_server(&["mapper"]).await;
    let mapper_port = mapper.port.to_string();

    for id in ["A\tB", "", "B:NE"] {
        let output = run(&["control", id, "Brisbane", &mapper_port]).await;

        assert_eq!(output.status.code(), Some(2), "id {:?}", id);
        assert_eq!(stdout(&output), "", "id {:?}", id);
        assert!(stderr(&output).contains("Invalid char in parameter"));
    }

    let client = RegistryClient::connect(DEFAULT_HOST, &address(mapper.port))
        .await
        .unwrap();
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_control_cannot_reach_mapper() {
    let dead = dead_port().to_string();
    let output = run(&["control", "BNE", "Brisbane", &dead]).await;

    assert_eq!(output.status.code(), Some(4));
    // The port is announced before registering
    assert_eq!(stdout(&output).lines().count(), 1);
    assert!(stderr(&output).contains("Can not connect to map"));
}

#[tokio::test]
async fn test_unreadable_config_is_a_usage_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"listen_port = \"north\"\n").unwrap();
    let path = file.path().to_str().unwrap();

    let output = run(&["mapper", "--config", path]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Cannot load config"));
}
